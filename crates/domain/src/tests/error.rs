// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::UnknownFormKind(String::from("timesheet"));
    assert_eq!(format!("{err}"), "Unknown form kind 'timesheet'");

    let err: DomainError = DomainError::UnknownField {
        form: "invoice",
        key: String::from("billingAddress.country"),
    };
    assert_eq!(
        format!("{err}"),
        "Form 'invoice' has no field 'billingAddress.country'"
    );

    let err: DomainError = DomainError::FieldTypeMismatch {
        field: String::from("termsAccepted"),
        expected: "boolean",
    };
    assert_eq!(
        format!("{err}"),
        "Field 'termsAccepted' expects a boolean value"
    );

    let err: DomainError = DomainError::ItemNotFound {
        collection: "items",
        id: String::from("item-9"),
    };
    assert_eq!(format!("{err}"), "No item with id 'item-9' in 'items'");

    let err: DomainError = DomainError::LastItemRemoval {
        collection: "lineItems",
    };
    assert_eq!(format!("{err}"), "'lineItems' must keep at least one item");

    let err: DomainError = DomainError::ReferenceNotFound {
        kind: "customer",
        key: String::from("CUST-404"),
    };
    assert_eq!(format!("{err}"), "No customer found for 'CUST-404'");
}

#[test]
fn test_domain_error_is_std_error() {
    let err: DomainError = DomainError::UnsupportedOperation(String::from("noop"));
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert_eq!(boxed.to_string(), "Unsupported operation: noop");
}
