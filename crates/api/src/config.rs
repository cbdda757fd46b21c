// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use erp_forms_domain::FormKind;
use std::time::Duration;

/// Default upper bound on one submission attempt.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-page tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    /// Quiet period before a draft snapshot is written.
    pub debounce: Duration,
    /// How long a submission may take before it is reported as failed.
    pub submit_timeout: Duration,
    /// Whether drafts are written at all.
    pub autosave: bool,
}

impl PageConfig {
    /// The defaults for a form kind.
    #[must_use]
    pub const fn for_kind(kind: FormKind) -> Self {
        Self {
            debounce: Duration::from_millis(kind.default_debounce_millis()),
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            autosave: true,
        }
    }

    #[must_use]
    pub const fn with_debounce(self, debounce: Duration) -> Self {
        Self { debounce, ..self }
    }

    #[must_use]
    pub const fn with_submit_timeout(self, submit_timeout: Duration) -> Self {
        Self {
            submit_timeout,
            ..self
        }
    }

    #[must_use]
    pub const fn without_autosave(self) -> Self {
        Self {
            autosave: false,
            ..self
        }
    }
}
