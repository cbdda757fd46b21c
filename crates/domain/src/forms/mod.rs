// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One module per form kind.

pub mod inspection;
pub mod invoice;
pub mod project;
pub mod requisition;
