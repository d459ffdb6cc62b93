//! `medportal-client`: gateway client and headless page controllers.
//!
//! Talks to the gateway over HTTP, keeps the session token in a cookie store
//! and turns each page load into a [`ViewOutcome`].

pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http;
pub mod notify;
pub mod routes;
pub mod session;
pub mod views;

pub use config::ClientConfig;
pub use envelope::{EnvelopeError, ResponseEnvelope, decode_envelope, encode_envelope};
pub use error::GatewayError;
pub use gateway::GatewayClient;
pub use http::classify;
pub use notify::{Level, Notification};
pub use routes::Route;
pub use session::{
    AccessDenied, Authorized, MemoryCookieStore, SessionContext, SessionCookie, SessionStore,
};
pub use views::{Page, ViewContext, ViewOutcome};
