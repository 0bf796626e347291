//! Assertions for `POST /payments/:id/confirm` responses of a payment using
//! the deprecated Sofort method through the Stripe connector.
use log::*;
use serde_json::{Map, Value};

use crate::{
    config::ConfirmExpectations,
    validator::{
        assertion::{TestRun, expect_eql, expect_true},
        response::HttpResponse,
        variables::VariableStore,
    },
};

/// Prefix applied to every assertion name.
pub const TEST_PREFIX: &str = "[POST]::/payments/:id/confirm - ";

/// Body fields copied into the variable store when present.
pub const EXTRACTED_FIELDS: [&str; 3] =
    ["payment_id", "mandate_id", "client_secret"];

/// Whether a body field is set: `null`, `false`, `0` and `""` count as
/// unset.
pub fn is_present(body: &Map<String, Value>, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Render a JSON value the way it is stored and compared: strings without
/// quotes, everything else as JSON text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Run the confirm response checklist. Every assertion is recorded in the
/// returned [`TestRun`]; none aborts the ones after it.
pub fn validate_confirm_response(
    response: &HttpResponse,
    expectations: &ConfirmExpectations,
    variables: &mut VariableStore,
) -> TestRun {
    let mut run = TestRun::new(TEST_PREFIX);

    run.test("Status code is 2xx", || {
        expect_true(
            response.is_success(),
            format!("expected status {} to be in 2xx range", response.status),
        )
    });

    run.test("Content-Type is application/json", || {
        let content_type = response.content_type().unwrap_or_default();
        expect_true(
            content_type.contains("application/json"),
            format!(
                "expected Content-Type '{content_type}' to include 'application/json'"
            ),
        )
    });

    run.test("Response has JSON Body", || {
        response
            .json()
            .map(|_| ())
            .map_err(|e| format!("response body is not valid JSON: {e}"))
    });

    let body = response.json_object_or_empty();

    extract_variables(&body, variables);

    content_check(&mut run, &body, "status", &expectations.status);

    run.test("Content check if 'next_action' exists", || {
        expect_true(
            body.contains_key("next_action"),
            "expected 'next_action' to be defined",
        )
    });

    let checks = [
        ("payment_method_type", &expectations.payment_method_type),
        ("error_code", &expectations.error_code),
        ("error_message", &expectations.error_message),
        ("connector", &expectations.connector),
    ];

    for (field, expected) in checks {
        content_check(&mut run, &body, field, expected);
    }

    run
}

/// Compare `field` against `expected`, skipped when the field is unset.
fn content_check(
    run: &mut TestRun,
    body: &Map<String, Value>,
    field: &str,
    expected: &str,
) {
    if !is_present(body, field) {
        debug!("{field} is undefined: skipping content check");
        return;
    }

    let name =
        format!("Content check if value for '{field}' matches '{expected}'");

    run.test(&name, || {
        let actual = body.get(field).map(value_text).unwrap_or_default();
        expect_eql(actual.as_str(), expected)
    });
}

fn extract_variables(body: &Map<String, Value>, variables: &mut VariableStore) {
    for field in EXTRACTED_FIELDS {
        match body.get(field) {
            Some(value) if is_present(body, field) => {
                let value = value_text(value);
                info!(
                    "- use {{{{{field}}}}} as collection variable for value {value}"
                );
                variables.set(field, value);
            }
            _ => {
                info!(
                    "INFO - Unable to assign variable {{{{{field}}}}}, as jsonData.{field} is undefined."
                );
            }
        }
    }
}
