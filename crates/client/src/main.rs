use anyhow::Context;
use chrono::Utc;

use medportal_client::views;
use medportal_client::{ClientConfig, GatewayClient, Route, SessionContext, ViewContext};

const TOKEN_ENV: &str = "MEDPORTAL_TOKEN";

/// Render one page headlessly and print the outcome as JSON.
///
/// Usage: `medportal [PATH]` (default `/`). A token in `MEDPORTAL_TOKEN` is
/// installed as the session cookie first.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medportal_observability::init();

    let config = ClientConfig::from_env();
    tracing::info!(gateway = %config.gateway_url, queue = %config.queue_url, "starting");

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let route = Route::parse(&path);

    let now = Utc::now();
    let session = SessionContext::in_memory();
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        session.sign_in(token, now);
    }

    let gateway = GatewayClient::new(config);
    let cx = ViewContext::new(&session, &gateway, now);
    let outcome = views::render(&cx, &route).await;

    let json = serde_json::to_string_pretty(&outcome).context("serializing page outcome")?;
    println!("{json}");
    Ok(())
}
