// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only draft queries.

pub mod drafts;

pub use drafts::{get_draft, get_draft_version};
