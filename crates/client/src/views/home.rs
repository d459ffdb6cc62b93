use medportal_auth::Session;

use crate::notify::Notification;
use crate::routes::Route;

use super::{HomePage, Page, ViewContext, ViewOutcome};

/// Landing page: role-specific navigation, or the visitor page.
pub fn home(cx: &ViewContext<'_>) -> ViewOutcome {
    let session = match cx.session.session(cx.now) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "stored session token rejected");
            return ViewOutcome::redirect(
                Route::Login,
                Some(Notification::error("Error decoding JWT. Please log in again.")),
            );
        }
    };

    let links = match &session {
        Session::Admin(_) => vec![Route::Profile, Route::RegisterDoctor, Route::Users],
        Session::Doctor(_) => vec![
            Route::Profile,
            Route::RegisterPatient,
            Route::Appointments,
            Route::Consultations,
        ],
        Session::Patient(_) => vec![
            Route::Profile,
            Route::Appointments,
            Route::Consultations,
            Route::Doctors,
        ],
        Session::Anonymous if cx.session.token(cx.now).is_some() => {
            // Signed in, but with a role the portal has no pages for.
            return ViewOutcome::render_with(
                Page::Home(HomePage {
                    role: None,
                    links: Vec::new(),
                }),
                Notification::info("Your account role has no pages in this portal."),
            );
        }
        Session::Anonymous => vec![Route::RegisterAdmin, Route::Login],
    };

    ViewOutcome::render(Page::Home(HomePage {
        role: session.account_role(),
        links,
    }))
}
