//! Login, logout and registration pages.

use medportal_auth::Access;
use medportal_core::{AccountRole, BlacklistEntry, LoginRequest, Validate};

use crate::notify::Notification;
use crate::routes::Route;

use super::forms::{AccountForm, DoctorForm, PatientForm};
use super::{Page, ViewContext, ViewOutcome};

pub fn login_page(_cx: &ViewContext<'_>) -> ViewOutcome {
    ViewOutcome::render(Page::Login)
}

pub async fn login(cx: &ViewContext<'_>, credentials: &LoginRequest) -> ViewOutcome {
    if let Err(errors) = credentials.validate() {
        return ViewOutcome::invalid(Page::Login, &errors);
    }

    match cx.gateway.login(credentials).await {
        Ok(token) => {
            cx.session.sign_in(token, cx.now);
            tracing::info!(username = %credentials.username, "signed in");
            ViewOutcome::redirect(Route::Home, Some(Notification::success("Login successful")))
        }
        Err(e) => ViewOutcome::render_with(Page::Login, Notification::error(format!("Login failed: {e}"))),
    }
}

/// Revoke the token (best effort), drop the cookie and go home.
pub async fn logout(cx: &ViewContext<'_>) -> ViewOutcome {
    if let Some(token) = cx.session.token(cx.now) {
        match cx.session.session(cx.now) {
            Ok(session) => {
                if let Some(principal) = session.principal() {
                    let entry = BlacklistEntry {
                        id_user: principal.user_id(),
                        token: token.clone(),
                    };
                    if let Err(e) = cx.gateway.blacklist_token(&token, &entry).await {
                        tracing::warn!(error = %e, "token revocation failed; clearing session anyway");
                    }
                }
            }
            Err(e) => tracing::debug!(error = %e, "logging out an invalid session"),
        }
    }

    cx.session.sign_out();
    ViewOutcome::redirect(Route::Home, Some(Notification::success("Log Out successful")))
}

pub fn register_page(cx: &ViewContext<'_>, role: AccountRole) -> ViewOutcome {
    let access = register_route(role).access();
    if access != Access::Public {
        if let Err(outcome) = cx.admit(access) {
            return outcome;
        }
    }
    ViewOutcome::render(Page::Register(role))
}

fn register_route(role: AccountRole) -> Route {
    match role {
        AccountRole::Admin => Route::RegisterAdmin,
        AccountRole::Doctor => Route::RegisterDoctor,
        AccountRole::Patient => Route::RegisterPatient,
    }
}

pub async fn register_admin(cx: &ViewContext<'_>, form: &AccountForm) -> ViewOutcome {
    let page = Page::Register(AccountRole::Admin);
    let registration = form.registration(AccountRole::Admin);
    if let Err(errors) = registration.validate() {
        return ViewOutcome::invalid(page, &errors);
    }

    match cx.gateway.register_user(&registration).await {
        Ok(created) => {
            tracing::info!(user_id = %created.id_user, "admin account registered");
            ViewOutcome::redirect(Route::Home, Some(Notification::success("Registration successful")))
        }
        Err(e) => registration_failed(page, e),
    }
}

/// Create the doctor's account, then the doctor record bound to it.
pub async fn register_doctor(cx: &ViewContext<'_>, form: &DoctorForm) -> ViewOutcome {
    let page = Page::Register(AccountRole::Doctor);
    let auth = match cx.admit(Route::RegisterDoctor.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    if let Err(errors) = form.validate() {
        return ViewOutcome::invalid(page, &errors);
    }

    let registration = form.account.registration(AccountRole::Doctor);
    let created = match cx.gateway.register_user(&registration).await {
        Ok(created) => created,
        Err(e) => return registration_failed(page, e),
    };
    let doctor = match form.doctor(created.id_user) {
        Ok(doctor) => doctor,
        Err(errors) => return ViewOutcome::invalid(page, &errors),
    };

    match cx.gateway.create_doctor(&auth.token, &doctor).await {
        Ok(_) => {
            tracing::info!(user_id = %created.id_user, "doctor registered");
            ViewOutcome::redirect(Route::Home, Some(Notification::success("Registration successful")))
        }
        Err(e) => registration_failed(page, e),
    }
}

/// Create the patient's account, then the patient record bound to it.
pub async fn register_patient(cx: &ViewContext<'_>, form: &PatientForm) -> ViewOutcome {
    let page = Page::Register(AccountRole::Patient);
    let auth = match cx.admit(Route::RegisterPatient.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    if let Err(errors) = form.validate() {
        return ViewOutcome::invalid(page, &errors);
    }

    let registration = form.account.registration(AccountRole::Patient);
    let created = match cx.gateway.register_user(&registration).await {
        Ok(created) => created,
        Err(e) => return registration_failed(page, e),
    };
    let patient = match form.patient(created.id_user) {
        Ok(patient) => patient,
        Err(errors) => return ViewOutcome::invalid(page, &errors),
    };

    match cx.gateway.create_patient(&auth.token, &patient).await {
        Ok(_) => {
            tracing::info!(user_id = %created.id_user, "patient registered");
            ViewOutcome::redirect(Route::Home, Some(Notification::success("Registration successful")))
        }
        Err(e) => registration_failed(page, e),
    }
}

fn registration_failed(page: Page, err: crate::GatewayError) -> ViewOutcome {
    ViewOutcome::render_with(
        page,
        Notification::error(format!("Error during registration: {err}")),
    )
}
