use msutils_core::{
    GeneralMessage, Messages, Outcome, Reply, ResponseHandler, UserMessage,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn error_replies() -> Vec<Reply> {
    vec![
        ResponseHandler::error("Test error"),
        ResponseHandler::error_default(),
        ResponseHandler::not_found("User"),
        ResponseHandler::forbidden(),
        ResponseHandler::unauthorized(),
        ResponseHandler::bad_request(),
        ResponseHandler::conflict(),
        ResponseHandler::server_error(),
    ]
}

#[test]
fn every_error_reply_is_a_failure_with_a_message() {
    for reply in error_replies() {
        let status = reply.status_code();
        assert!((400..600).contains(&status), "unexpected status {}", status);

        let value = reply.envelope().to_value().unwrap();
        assert_eq!(value["success"], json!(false));
        assert!(!value["message"].as_str().unwrap().is_empty());
        assert!(value["error"].is_string());
        assert!(value.get("data").is_none());
    }
}

#[test]
fn success_never_carries_an_error() {
    let replies = [
        ResponseHandler::success(json!({"id": 1})),
        ResponseHandler::success_empty(),
        ResponseHandler::created(json!({"id": 2})),
    ];
    for reply in replies {
        let value = reply.envelope().to_value().unwrap();
        assert_eq!(value["success"], json!(true));
        assert!(value.get("error").is_none());
        assert!(value.get("data").is_some());
    }
}

#[test]
fn not_found_names_the_resource() {
    let reply = ResponseHandler::not_found("User");
    assert_eq!(reply.status_code(), 404);
    assert_eq!(
        reply.envelope().to_value().unwrap(),
        json!({"success": false, "message": "User not found", "error": "Not Found"})
    );
}

#[test]
fn statuses_of_named_constructors() {
    assert_eq!(ResponseHandler::success(1).status_code(), 200);
    assert_eq!(ResponseHandler::created(1).status_code(), 201);
    assert_eq!(ResponseHandler::error("x").status_code(), 400);
    assert_eq!(ResponseHandler::bad_request().status_code(), 400);
    assert_eq!(ResponseHandler::unauthorized().status_code(), 401);
    assert_eq!(ResponseHandler::forbidden().status_code(), 403);
    assert_eq!(ResponseHandler::conflict().status_code(), 409);
    assert_eq!(ResponseHandler::server_error().status_code(), 500);
}

#[test]
fn from_result_maps_service_outcomes() {
    let found = ResponseHandler::from_result(Outcome::Value(json!({"name": "Ana"})), "User");
    assert_eq!(found.status_code(), 200);
    assert_eq!(found.envelope().data(), Some(&json!({"name": "Ana"})));

    let missing: Reply = ResponseHandler::from_result(
        Outcome::Message("no rows".to_string(), 404),
        "User",
    );
    assert_eq!(missing.status_code(), 404);
    assert_eq!(missing.envelope().message(), "User not found");

    let duplicate: Reply<Value> =
        ResponseHandler::from_result(Outcome::Status(Value::Null, 409), "Role");
    assert_eq!(duplicate.envelope().message(), "Role already exists");

    let crashed: Reply =
        ResponseHandler::from_result(Outcome::Message("db down".to_string(), 500), "User");
    assert_eq!(crashed.status_code(), 500);
    assert_eq!(crashed.envelope().message(), "db down");
    assert_eq!(crashed.envelope().error(), Some("Internal Server Error"));

    let blank: Reply =
        ResponseHandler::from_result(Outcome::Message(String::new(), 403), "User");
    assert_eq!(blank.envelope().message(), GeneralMessage::Forbidden.message());

    let accepted: Reply =
        ResponseHandler::from_result(Outcome::Message("queued".to_string(), 202), "Job");
    assert_eq!(accepted.status_code(), 202);
    assert_eq!(accepted.envelope().message(), "Success");

    let created = ResponseHandler::from_result(Outcome::Status(json!({"id": 9}), 201), "User");
    assert_eq!(created.status_code(), 201);
    assert!(created.is_success());
}

#[test]
fn catalog_messages_plug_into_replies() {
    let reply = ResponseHandler::success(json!({"id": 3}))
        .with_message(UserMessage::UserCreated.message())
        .with_status(201);
    assert_eq!(reply.status_code(), 201);
    assert_eq!(reply.envelope().message(), UserMessage::UserCreated.message());

    let reply = ResponseHandler::error(Messages::get_by_code(403, None));
    assert_eq!(reply.envelope().message(), GeneralMessage::Forbidden.message());
}
