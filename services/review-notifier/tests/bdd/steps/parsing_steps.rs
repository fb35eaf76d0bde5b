//! BDD step definitions for response validation and status parsing

use cucumber::{given, then, when};
use serde_json::{json, Value};

use review_notifier::homework::{check_response, parse_status};
use review_notifier::NotifierError;

use crate::world::NotifierWorld;

#[given(expr = "the API response body {string}")]
fn response_body(world: &mut NotifierWorld, body: String) {
    let value: Value = serde_json::from_str(&body).expect("scenario body must be JSON");
    world.response = Some(value);
}

#[given(expr = "a submission {string} with status {string}")]
fn submission_with_status(world: &mut NotifierWorld, name: String, status: String) {
    world.record = Some(json!({"homework_name": name, "status": status}));
}

#[given(expr = "a submission record {string}")]
fn submission_record(world: &mut NotifierWorld, body: String) {
    let value: Value = serde_json::from_str(&body).expect("scenario record must be JSON");
    world.record = Some(value);
}

#[when("the response is validated")]
fn response_validated(world: &mut NotifierWorld) {
    let response = world.response.as_ref().expect("response not set");
    world.check_result = Some(
        check_response(response)
            .map(|snapshot| snapshot.current_date)
            .map_err(|e| e.to_string()),
    );
}

#[when("the status is parsed")]
fn status_parsed(world: &mut NotifierWorld) {
    let record = world.record.as_ref().expect("record not set");
    world.parse_result = Some(parse_status(record));
}

#[then(expr = "the response should be accepted with current date {int}")]
fn response_accepted_with_date(world: &mut NotifierWorld, current_date: i64) {
    let result = world.check_result.as_ref().expect("no result");
    assert_eq!(result, &Ok(Some(current_date)));
}

#[then("the response should be accepted without a current date")]
fn response_accepted_without_date(world: &mut NotifierWorld) {
    let result = world.check_result.as_ref().expect("no result");
    assert_eq!(result, &Ok(None));
}

#[then(expr = "the response should be rejected with {string}")]
fn response_rejected(world: &mut NotifierWorld, message: String) {
    let result = world.check_result.as_ref().expect("no result");
    match result {
        Err(e) => assert!(e.contains(&message), "'{e}' does not contain '{message}'"),
        Ok(_) => panic!("expected rejection containing '{message}'"),
    }
}

#[then(expr = "the status message should be {string}")]
fn status_message_is(world: &mut NotifierWorld, expected: String) {
    let result = world.parse_result.as_ref().expect("no result");
    assert_eq!(result.as_ref().unwrap(), &expected);
}

#[then(expr = "parsing should fail for missing field {string}")]
fn parsing_fails_missing_field(world: &mut NotifierWorld, field: String) {
    let result = world.parse_result.as_ref().expect("no result");
    match result {
        Err(NotifierError::MissingField(name)) => assert_eq!(*name, field),
        other => panic!("expected MissingField({field}), got {other:?}"),
    }
}

#[then(expr = "parsing should fail for unknown status {string}")]
fn parsing_fails_unknown_status(world: &mut NotifierWorld, status: String) {
    let result = world.parse_result.as_ref().expect("no result");
    match result {
        Err(NotifierError::UnknownStatus(s)) => assert_eq!(s, &status),
        other => panic!("expected UnknownStatus({status}), got {other:?}"),
    }
}
