use msutils_core::{Envelope, ResponseHandler};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
}

#[test]
fn typed_payload_survives_json() {
    let user = User {
        id: 7,
        name: "José".to_string(),
    };
    let reply = ResponseHandler::success(user.clone());
    let json = reply.to_json().unwrap();
    assert!(json.contains("José"));

    let parsed: Envelope<User> = Envelope::from_json(&json).unwrap();
    assert_eq!(&parsed, reply.envelope());
    assert_eq!(parsed.into_data(), Some(user));
}

#[test]
fn error_envelope_survives_json() {
    let (envelope, status) = ResponseHandler::conflict()
        .with_details("email already registered")
        .into_parts();
    assert_eq!(status, 409);

    let json = ResponseHandler::to_json(&envelope).unwrap();
    let parsed: Envelope = Envelope::from_json(&json).unwrap();
    assert_eq!(parsed, envelope);
    assert_eq!(parsed.error(), Some("email already registered"));
}

#[test]
fn status_code_stays_out_of_the_body() {
    let value: Value = serde_json::from_str(&ResponseHandler::not_found("Report").to_json().unwrap())
        .unwrap();
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["error", "message", "success"]);
}

#[test]
fn empty_success_emits_null_data() {
    let value = ResponseHandler::success_empty().envelope().to_value().unwrap();
    assert_eq!(
        value,
        json!({"success": true, "message": "Operación completada con éxito", "data": null})
    );
}

#[test]
fn unparsable_body_is_an_error() {
    let err = Envelope::<Value>::from_json("{\"success\": true}").unwrap_err();
    assert!(!err.is_io());
}

#[test]
fn null_payload_survives_json() {
    let (envelope, _) = ResponseHandler::success(Value::Null).into_parts();
    let parsed: Envelope = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(parsed, envelope);
    assert_eq!(parsed.data(), Some(&Value::Null));
}
