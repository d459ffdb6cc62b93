//! Account administration.

use medportal_core::UserId;

use crate::notify::Notification;
use crate::routes::Route;
use crate::session::Authorized;

use super::{Page, UsersPage, ViewContext, ViewOutcome};

pub async fn users(cx: &ViewContext<'_>) -> ViewOutcome {
    match cx.admit(Route::Users.access()) {
        Ok(auth) => load(cx, &auth).await,
        Err(outcome) => outcome,
    }
}

async fn load(cx: &ViewContext<'_>, auth: &Authorized) -> ViewOutcome {
    let current_user = auth.principal.user_id();
    match cx.gateway.list_users(&auth.token).await {
        Ok(users) => ViewOutcome::render_with(
            Page::Users(UsersPage {
                users,
                current_user,
            }),
            Notification::success("Users loaded successfully."),
        ),
        Err(e) => {
            tracing::error!(error = %e, "listing users failed");
            ViewOutcome::render_with(
                Page::Users(UsersPage {
                    users: Vec::new(),
                    current_user,
                }),
                Notification::error("Error fetching users. Please try again."),
            )
        }
    }
}

/// Delete an account through the queue publisher.
///
/// Deleting one's own account also ends the session.
pub async fn delete_user(cx: &ViewContext<'_>, id: UserId) -> ViewOutcome {
    let auth = match cx.admit(Route::Users.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    let is_self = id == auth.principal.user_id();

    match cx.gateway.publish_user_deletion(&auth.token, id).await {
        Ok(_) if is_self => {
            tracing::info!(user_id = %id, "own account deleted; signing out");
            cx.session.sign_out();
            ViewOutcome::redirect(Route::Home, Some(Notification::success("Your account was deleted.")))
        }
        Ok(_) => {
            tracing::info!(user_id = %id, "account deletion published");
            ViewOutcome::redirect(Route::Users, Some(Notification::success("User deleted.")))
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %id, "account deletion failed");
            let mut outcome = load(cx, &auth).await;
            if let ViewOutcome::Render { notifications, .. } = &mut outcome {
                notifications.push(Notification::error("Error deleting user. Please try again."));
            }
            outcome
        }
    }
}
