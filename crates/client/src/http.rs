//! HTTP response classification and request execution.

use reqwest::StatusCode;
use tracing::Instrument;

use crate::envelope::{ResponseEnvelope, decode_envelope};
use crate::error::GatewayError;

/// Turn a completed exchange into a decoded envelope or a typed failure.
///
/// The body is always decoded first; a body that is not an envelope is a
/// [`GatewayError::Parse`] whatever the status. Failures are logged before
/// they are returned.
pub fn classify(status: StatusCode, body: &str) -> Result<ResponseEnvelope, GatewayError> {
    let envelope = decode_envelope(body).inspect_err(|e| {
        tracing::error!(status = status.as_u16(), error = %e, "undecodable gateway response");
    })?;

    if status.is_success() {
        return Ok(envelope);
    }

    let err = GatewayError::from_status(status.as_u16(), envelope.message);
    if err.is_client_error() {
        tracing::warn!(status = status.as_u16(), detail = ?envelope.error, "{err}");
    } else {
        tracing::error!(status = status.as_u16(), detail = ?envelope.error, "{err}");
    }
    Err(err)
}

/// Execute a prepared request and classify the reply.
///
/// No retries; transport failures surface as [`GatewayError::Network`].
pub async fn execute(
    client: &reqwest::Client,
    request: reqwest::RequestBuilder,
) -> Result<ResponseEnvelope, GatewayError> {
    let request = request.build()?;
    let span = tracing::debug_span!(
        "gateway_call",
        method = %request.method(),
        url = %request.url()
    );

    async move {
        let response = client.execute(request).await.inspect_err(|e| {
            tracing::error!(error = %e, "gateway unreachable");
        })?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), "gateway replied");
        classify(status, &body)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(json: &str) -> String {
        json.replace('"', "&#34;")
    }

    #[test]
    fn unauthorized_carries_envelope_message() {
        let body = escaped(r#"{"message":"invalid credentials","error":"auth","payload":null}"#);
        let err = classify(StatusCode::UNAUTHORIZED, &body).unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
        assert_eq!(err.to_string(), "Unauthorized: invalid credentials");
    }

    #[test]
    fn success_returns_envelope() {
        let body = escaped(r#"{"message":"ok","payload":{"idUser":5}}"#);
        let env = classify(StatusCode::OK, &body).unwrap();
        assert_eq!(env.payload["idUser"], 5);

        let created = classify(StatusCode::CREATED, &body).unwrap();
        assert_eq!(created.message, "ok");
    }

    #[test]
    fn every_status_maps_to_a_kind() {
        let body = escaped(r#"{"message":"m"}"#);
        let kind = |code: u16| classify(StatusCode::from_u16(code).unwrap(), &body).unwrap_err();

        assert!(matches!(kind(400), GatewayError::BadRequest(_)));
        assert!(matches!(kind(403), GatewayError::Forbidden(_)));
        assert!(matches!(kind(404), GatewayError::NotFound(_)));
        assert!(matches!(kind(422), GatewayError::Unprocessable(_)));
        assert!(matches!(kind(500), GatewayError::Internal(_)));
        assert!(matches!(kind(502), GatewayError::BadGateway(_)));
        assert!(matches!(kind(503), GatewayError::Unhandled { status: 503, .. }));
        assert!(matches!(kind(302), GatewayError::Unhandled { status: 302, .. }));
    }

    #[test]
    fn undecodable_body_is_a_parse_error() {
        assert!(matches!(
            classify(StatusCode::OK, "not json"),
            Err(GatewayError::Parse(_))
        ));
        assert!(matches!(
            classify(StatusCode::BAD_GATEWAY, "<html></html>"),
            Err(GatewayError::Parse(_))
        ));
    }
}
