//! Consultation history and the doctor's consultation form.

use medportal_auth::Session;
use medportal_core::{ConsultationId, Validate, ValidationErrors};

use crate::envelope::ResponseEnvelope;
use crate::error::GatewayError;
use crate::notify::Notification;
use crate::routes::Route;
use crate::session::Authorized;

use super::appointments::own_doctor_id;
use super::forms::ConsultationForm;
use super::{HistoryPage, Page, ViewContext, ViewOutcome};

pub async fn history(cx: &ViewContext<'_>) -> ViewOutcome {
    match cx.admit(Route::Consultations.access()) {
        Ok(auth) => load_history(cx, &auth).await,
        Err(outcome) => outcome,
    }
}

async fn load_history(cx: &ViewContext<'_>, auth: &Authorized) -> ViewOutcome {
    let can_edit = matches!(auth.session, Session::Doctor(_));
    let (entries, notification) = match cx.gateway.list_consultations(&auth.token).await {
        Ok(entries) => (
            entries,
            Notification::success("Consultations loaded successfully."),
        ),
        Err(e) => {
            tracing::error!(error = %e, "listing consultations failed");
            (
                Vec::new(),
                Notification::error("Error loading consultations. Please try again."),
            )
        }
    };
    ViewOutcome::render_with(
        Page::Consultations(HistoryPage::new(entries, can_edit, |id| {
            Route::EditConsultation(id.clone())
        })),
        notification,
    )
}

pub async fn form(cx: &ViewContext<'_>, id: Option<&ConsultationId>) -> ViewOutcome {
    let auth = match cx.admit(Route::NewConsultation.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    let Some(id) = id else {
        return ViewOutcome::render(Page::ConsultationForm(None));
    };

    match cx.gateway.get_consultation(&auth.token, id).await {
        Ok(consultation) => ViewOutcome::render(Page::ConsultationForm(Some(consultation))),
        Err(e) => ViewOutcome::render_with(
            Page::ConsultationForm(None),
            Notification::error(format!("Error during data fetching: {e}")),
        ),
    }
}

/// Create (`id == None`) or update a consultation, investigations included.
pub async fn save(
    cx: &ViewContext<'_>,
    id: Option<&ConsultationId>,
    input: &ConsultationForm,
) -> ViewOutcome {
    let auth = match cx.admit(Route::NewConsultation.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    let page = || Page::ConsultationForm(None);
    if let Err(errors) = input.validate() {
        return ViewOutcome::invalid(page(), &errors);
    }

    match persist(cx, &auth, id, input).await {
        Ok(Ok(envelope)) => ViewOutcome::redirect(
            Route::Consultations,
            Some(Notification::success(envelope.message)),
        ),
        Ok(Err(errors)) => ViewOutcome::invalid(page(), &errors),
        Err(e) => {
            tracing::error!(error = %e, "saving consultation failed");
            ViewOutcome::render_with(
                page(),
                Notification::error(format!("Error saving consultation: {e}")),
            )
        }
    }
}

async fn persist(
    cx: &ViewContext<'_>,
    auth: &Authorized,
    id: Option<&ConsultationId>,
    input: &ConsultationForm,
) -> Result<Result<ResponseEnvelope, ValidationErrors>, GatewayError> {
    let doctor = own_doctor_id(cx, auth).await?;
    let consultation = match input.consultation(doctor, id.cloned()) {
        Ok(consultation) => consultation,
        Err(errors) => return Ok(Err(errors)),
    };
    let envelope = match id {
        Some(id) => {
            cx.gateway
                .update_consultation(&auth.token, id, &consultation)
                .await?
        }
        None => cx.gateway.create_consultation(&auth.token, &consultation).await?,
    };
    Ok(Ok(envelope))
}

pub async fn delete(cx: &ViewContext<'_>, id: &ConsultationId) -> ViewOutcome {
    let auth = match cx.admit(Route::NewConsultation.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };

    match cx.gateway.delete_consultation(&auth.token, id).await {
        Ok(envelope) => ViewOutcome::redirect(
            Route::Consultations,
            Some(Notification::success(envelope.message)),
        ),
        Err(e) => {
            tracing::error!(error = %e, consultation_id = %id, "consultation deletion failed");
            let mut outcome = load_history(cx, &auth).await;
            if let ViewOutcome::Render { notifications, .. } = &mut outcome {
                notifications.push(Notification::error(format!("Error deleting consultation: {e}")));
            }
            outcome
        }
    }
}
