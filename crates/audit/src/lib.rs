// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Immutable records of form session transitions.
//!
//! Every successful transition of a form session produces exactly one
//! `AuditEvent` naming who acted, why, what was done, and a summary of the
//! session before and after.

use erp_forms_domain::FormKind;
use serde::Serialize;

/// Who performed a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: String,
    /// e.g. `user`, `script`, `system`.
    pub actor_type: String,
}

impl Actor {
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Why a transition happened (the triggering input event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cause {
    pub id: String,
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// What was done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub name: String,
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact description of a session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Summarises a session position.
    ///
    /// # Arguments
    ///
    /// * `step_index` - Zero-based current step
    /// * `step_count` - Number of steps in the wizard
    /// * `error_count` - Fields currently failing validation
    /// * `completion` - Completion percentage
    #[must_use]
    pub fn describe(
        step_index: usize,
        step_count: usize,
        error_count: usize,
        completion: u8,
    ) -> Self {
        Self::new(format!(
            "step={}/{step_count} errors={error_count} completion={completion}%",
            step_index + 1
        ))
    }
}

/// One recorded transition of a form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub form: FormKind,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
}

impl AuditEvent {
    #[must_use]
    pub const fn new(
        form: FormKind,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            form,
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event() -> AuditEvent {
        AuditEvent::new(
            FormKind::Invoice,
            Actor::new(String::from("clerk-7"), String::from("user")),
            Cause::new(String::from("evt-1"), String::from("Next button")),
            Action::new(String::from("Advance"), None),
            StateSnapshot::describe(0, 4, 0, 50),
            StateSnapshot::describe(1, 4, 0, 50),
        )
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("SetField"),
            Some(String::from("field=customer")),
        );

        assert_eq!(action.name, "SetField");
        assert_eq!(action.details, Some(String::from("field=customer")));
    }

    #[test]
    fn test_state_snapshot_describe_is_one_based() {
        let snapshot: StateSnapshot = StateSnapshot::describe(0, 5, 3, 27);
        assert_eq!(snapshot.data, "step=1/5 errors=3 completion=27%");
    }

    #[test]
    fn test_audit_event_creation_requires_all_fields() {
        let event: AuditEvent = create_test_event();

        assert_eq!(event.form, FormKind::Invoice);
        assert_eq!(event.actor.id, "clerk-7");
        assert_eq!(event.cause.description, "Next button");
        assert_eq!(event.action.name, "Advance");
        assert_eq!(event.before.data, "step=1/4 errors=0 completion=50%");
        assert_eq!(event.after.data, "step=2/4 errors=0 completion=50%");
    }

    #[test]
    fn test_audit_event_equality() {
        let event1: AuditEvent = create_test_event();
        let event2: AuditEvent = create_test_event();
        assert_eq!(event1, event2);

        let mut event3: AuditEvent = create_test_event();
        event3.actor = Actor::new(String::from("clerk-8"), String::from("user"));
        assert_ne!(event1, event3);
    }
}
