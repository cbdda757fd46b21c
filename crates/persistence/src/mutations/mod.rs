// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft mutations.

pub mod drafts;

pub use drafts::{delete_draft, upsert_draft};
