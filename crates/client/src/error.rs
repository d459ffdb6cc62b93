use thiserror::Error;

use crate::envelope::EnvelopeError;

/// Failure of a gateway call.
///
/// Status-keyed variants carry the envelope's `message`; their display text is
/// `"<Kind>: <message>"`, falling back to a generic description when the
/// gateway sent no message.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Bad Request: {}", or_generic(.0, "the request was rejected"))]
    BadRequest(String),

    #[error("Unauthorized: {}", or_generic(.0, "authentication is required"))]
    Unauthorized(String),

    #[error("Forbidden: {}", or_generic(.0, "access to this resource is denied"))]
    Forbidden(String),

    #[error("Not Found: {}", or_generic(.0, "the resource does not exist"))]
    NotFound(String),

    #[error("Unprocessable: {}", or_generic(.0, "the data could not be processed"))]
    Unprocessable(String),

    #[error("Internal Server Error: {}", or_generic(.0, "the server failed to handle the request"))]
    Internal(String),

    #[error("Bad Gateway: {}", or_generic(.0, "an upstream service is unavailable"))]
    BadGateway(String),

    #[error("Unhandled ({status}): {}", or_generic(.message, "unexpected response status"))]
    Unhandled { status: u16, message: String },

    #[error(transparent)]
    Parse(#[from] EnvelopeError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected payload: {0}")]
    Payload(String),
}

fn or_generic<'a>(message: &'a str, generic: &'a str) -> &'a str {
    if message.trim().is_empty() { generic } else { message }
}

impl GatewayError {
    /// Select the failure kind for a non-success status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            422 => Self::Unprocessable(message),
            500 => Self::Internal(message),
            502 => Self::BadGateway(message),
            status => Self::Unhandled { status, message },
        }
    }

    /// HTTP status behind a status-keyed failure.
    pub fn status(&self) -> Option<u16> {
        Some(match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Unprocessable(_) => 422,
            Self::Internal(_) => 500,
            Self::BadGateway(_) => 502,
            Self::Unhandled { status, .. } => *status,
            Self::Parse(_) | Self::Network(_) | Self::Payload(_) => return None,
        })
    }

    /// The gateway's own message, when one was sent.
    pub fn gateway_message(&self) -> Option<&str> {
        let message = match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Unprocessable(m)
            | Self::Internal(m)
            | Self::BadGateway(m)
            | Self::Unhandled { message: m, .. } => m.as_str(),
            _ => return None,
        };
        (!message.trim().is_empty()).then_some(message)
    }

    /// One of the known 4xx kinds.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_)
                | Self::Unauthorized(_)
                | Self::Forbidden(_)
                | Self::NotFound(_)
                | Self::Unprocessable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_kind_then_message() {
        let err = GatewayError::from_status(401, "invalid credentials".into());
        assert_eq!(err.to_string(), "Unauthorized: invalid credentials");
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.gateway_message(), Some("invalid credentials"));
    }

    #[test]
    fn empty_message_uses_generic_text() {
        let err = GatewayError::from_status(404, String::new());
        assert_eq!(err.to_string(), "Not Found: the resource does not exist");
        assert_eq!(err.gateway_message(), None);
    }

    #[test]
    fn status_table() {
        for (status, kind) in [
            (400, "Bad Request"),
            (403, "Forbidden"),
            (422, "Unprocessable"),
            (500, "Internal Server Error"),
            (502, "Bad Gateway"),
        ] {
            let text = GatewayError::from_status(status, "x".into()).to_string();
            assert_eq!(text, format!("{kind}: x"));
        }
        let teapot = GatewayError::from_status(418, "short and stout".into());
        assert!(matches!(teapot, GatewayError::Unhandled { status: 418, .. }));
        assert_eq!(teapot.to_string(), "Unhandled (418): short and stout");
        assert!(!teapot.is_client_error());
        assert!(GatewayError::from_status(422, String::new()).is_client_error());
    }
}
