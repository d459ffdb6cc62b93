use crate::notify::Notification;
use crate::routes::Route;

use super::{Page, ViewContext, ViewOutcome};

/// Doctor directory for patients.
pub async fn doctors(cx: &ViewContext<'_>) -> ViewOutcome {
    let auth = match cx.admit(Route::Doctors.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };

    match cx.gateway.list_doctors(&auth.token).await {
        Ok(doctors) => ViewOutcome::render_with(
            Page::Doctors(doctors),
            Notification::success("Doctors loaded successfully."),
        ),
        Err(e) => {
            tracing::error!(error = %e, "listing doctors failed");
            ViewOutcome::render_with(
                Page::Doctors(Vec::new()),
                Notification::error("Error fetching doctors. Please try again."),
            )
        }
    }
}
