//! Profile and password change.

use medportal_auth::Session;
use medportal_core::{PasswordChange, Validate};

use crate::notify::Notification;
use crate::routes::Route;

use super::{Page, ProfilePage, ViewContext, ViewOutcome};

pub async fn profile(cx: &ViewContext<'_>) -> ViewOutcome {
    let auth = match cx.admit(Route::Profile.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    let user_id = auth.principal.user_id();
    let gateway = cx.gateway;

    let loaded = async {
        let user = gateway.get_user(&auth.token, user_id).await?;
        Ok::<_, crate::GatewayError>(match &auth.session {
            Session::Doctor(_) => ProfilePage::Doctor {
                doctor: gateway.get_doctor_by_user(&auth.token, user_id).await?,
                user,
            },
            Session::Patient(_) => ProfilePage::Patient {
                patient: gateway.get_patient_by_user(&auth.token, user_id).await?,
                user,
            },
            Session::Admin(_) | Session::Anonymous => ProfilePage::Admin { user },
        })
    }
    .await;

    match loaded {
        Ok(page) => ViewOutcome::render(Page::Profile(Some(page))),
        Err(e) => {
            tracing::error!(error = %e, %user_id, "profile load failed");
            ViewOutcome::render_with(
                Page::Profile(None),
                Notification::error(format!("Error getting profile: {e}")),
            )
        }
    }
}

pub fn change_password_page(cx: &ViewContext<'_>) -> ViewOutcome {
    match cx.admit(Route::ChangePassword.access()) {
        Ok(_) => ViewOutcome::render(Page::ChangePassword),
        Err(outcome) => outcome,
    }
}

pub async fn change_password(cx: &ViewContext<'_>, form: &PasswordChange) -> ViewOutcome {
    let auth = match cx.admit(Route::ChangePassword.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    if let Err(errors) = form.validate() {
        return ViewOutcome::invalid(Page::ChangePassword, &errors);
    }

    let update = form.clone().into_update();
    match cx
        .gateway
        .update_password(&auth.token, auth.principal.user_id(), &update)
        .await
    {
        Ok(envelope) => ViewOutcome::redirect(Route::Profile, Some(Notification::success(envelope.message))),
        Err(e) => ViewOutcome::render_with(Page::ChangePassword, Notification::error(e.to_string())),
    }
}
