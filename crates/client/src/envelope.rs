//! Gateway response envelope.
//!
//! Every gateway reply is a JSON document `{message, error, payload, _links}`
//! whose double quotes arrive HTML-escaped as `&#34;`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entity the gateway's HTML sanitiser substitutes for `"`.
pub const ESCAPED_QUOTE: &str = "&#34;";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub payload: serde_json::Value,

    /// Hypermedia links keyed by relation name.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("gateway response is not valid JSON: {0}")]
    Parse(String),
}

impl ResponseEnvelope {
    pub fn new(message: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            payload,
            ..Self::default()
        }
    }

    /// Deserialize the payload into a concrete type.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

/// Un-escape and parse a gateway body. Unknown top-level fields are dropped.
pub fn decode_envelope(body: &str) -> Result<ResponseEnvelope, EnvelopeError> {
    let unescaped = body.replace(ESCAPED_QUOTE, "\"");
    serde_json::from_str(&unescaped).map_err(|e| EnvelopeError::Parse(e.to_string()))
}

/// Render an envelope the way the gateway sends it.
pub fn encode_envelope(envelope: &ResponseEnvelope) -> String {
    // Serializing a map of JSON values cannot fail.
    serde_json::to_string(envelope)
        .unwrap_or_default()
        .replace('"', ESCAPED_QUOTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn decodes_escaped_body() {
        let body = "{&#34;message&#34;:&#34;ok&#34;,&#34;payload&#34;:{&#34;idUser&#34;:5}}";
        let env = decode_envelope(body).unwrap();
        assert_eq!(env.message, "ok");
        assert_eq!(env.error, None);
        assert_eq!(env.payload["idUser"], 5);
        assert_eq!(env.links, None);
    }

    #[test]
    fn plain_json_and_unknown_fields() {
        let env = decode_envelope(
            r#"{"message":"m","error":"e","payload":null,"_links":{"self":{"href":"/api/users"}},"extra":1}"#,
        )
        .unwrap();
        assert_eq!(env.error.as_deref(), Some("e"));
        assert!(env.payload.is_null());
        assert_eq!(env.links.unwrap()["self"]["href"], "/api/users");
    }

    #[test]
    fn malformed_bodies_fail() {
        assert!(matches!(decode_envelope(""), Err(EnvelopeError::Parse(_))));
        assert!(matches!(
            decode_envelope("<html>502</html>"),
            Err(EnvelopeError::Parse(_))
        ));
        assert!(matches!(
            decode_envelope("&#34;just a string&#34;"),
            Err(EnvelopeError::Parse(_))
        ));
    }

    #[test]
    fn typed_payload() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Created {
            id_user: i64,
        }
        let env = ResponseEnvelope::new("created", json!({"idUser": 12}));
        assert_eq!(env.payload_as::<Created>().unwrap().id_user, 12);
        assert!(env.payload_as::<Vec<i64>>().is_err());
    }

    fn text() -> impl Strategy<Value = String> {
        "[^&]{0,24}"
    }

    fn payload() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            Just(serde_json::Value::Null),
            any::<i64>().prop_map(|n| json!({ "idUser": n })),
            text().prop_map(|s| json!({ "username": s, "tags": [s] })),
            proptest::collection::vec(any::<i32>(), 0..5).prop_map(|v| json!(v)),
        ]
    }

    proptest! {
        #[test]
        fn escaped_envelopes_round_trip(
            message in text(),
            error in proptest::option::of(text()),
            payload in payload(),
            href in proptest::option::of(text()),
        ) {
            let links = href.map(|h| {
                let mut m = serde_json::Map::new();
                m.insert("self".into(), json!({ "href": h }));
                m
            });
            let original = ResponseEnvelope { message, error, payload, links };
            let wire = encode_envelope(&original);
            prop_assert!(!wire.contains('"'));
            prop_assert_eq!(decode_envelope(&wire).unwrap(), original);
        }
    }
}
