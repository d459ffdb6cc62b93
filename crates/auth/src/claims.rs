use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::Role;

/// Claims carried in the payload segment of a session token.
///
/// Decoded, never verified: the client holds no key material. The gateway
/// re-verifies every token it receives, so these claims only decide what the
/// UI offers, never what the backend allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity-service user id, as text.
    #[serde(
        default,
        deserialize_with = "subject_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub: Option<String>,

    /// A role claim that is not a string is dropped, so the guard denies it.
    #[serde(
        default,
        deserialize_with = "role_claim",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,

    /// Expiry, unix seconds.
    #[serde(
        default,
        deserialize_with = "expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,

    /// Issued-at, unix seconds. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token has no payload segment")]
    MissingSegment,

    #[error("payload segment is not valid base64: {0}")]
    Base64(String),

    #[error("payload is not valid UTF-8")]
    Utf8,

    #[error("payload is not a JSON claims object: {0}")]
    Json(String),
}

/// Standard alphabet, padding optional, matching browser `atob` leniency.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the claims of a `header.payload.signature` token.
///
/// The payload is base64url; URL-safe characters are mapped back to the
/// standard alphabet before decoding, so tokens mixing both alphabets decode
/// the same way a browser would decode them.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let payload = token
        .trim()
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(DecodeError::MissingSegment)?;

    let standard: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE
        .decode(standard)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| DecodeError::Utf8)?;

    serde_json::from_str(&text).map_err(|e| DecodeError::Json(e.to_string()))
}

/// Issuers have emitted `sub` both as a string and as a bare number.
///
/// Any other JSON value is kept as its JSON text; it never parses as a user
/// id, so the session validator rejects it as an invalid subject.
fn subject_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| match v {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }))
}

fn role_claim<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(Role::new(name)),
        Some(other) => {
            tracing::warn!(role = %other, "role claim is not a string; ignoring it");
            None
        }
    })
}

/// Fractional expiries are truncated. An expiry that is not a number reads
/// as the epoch, so the token is treated as expired.
fn expiry<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(
            n.as_i64()
                .unwrap_or_else(|| n.as_f64().map_or(0, |f| f.floor() as i64)),
        ),
        Some(other) => {
            tracing::warn!(exp = %other, "expiry claim is not a number; treating token as expired");
            Some(0)
        }
    })
}
