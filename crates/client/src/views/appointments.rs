//! Appointment history and the doctor's create/edit form.

use medportal_auth::Session;
use medportal_core::{AppointmentId, DoctorId, Entity, Validate, ValidationErrors};

use crate::envelope::ResponseEnvelope;
use crate::error::GatewayError;
use crate::notify::Notification;
use crate::routes::Route;
use crate::session::Authorized;

use super::forms::AppointmentForm;
use super::{HistoryPage, Page, ViewContext, ViewOutcome};

pub async fn history(cx: &ViewContext<'_>) -> ViewOutcome {
    match cx.admit(Route::Appointments.access()) {
        Ok(auth) => load_history(cx, &auth).await,
        Err(outcome) => outcome,
    }
}

async fn load_history(cx: &ViewContext<'_>, auth: &Authorized) -> ViewOutcome {
    let can_edit = matches!(auth.session, Session::Doctor(_));
    match cx.gateway.list_appointments(&auth.token).await {
        Ok(entries) => ViewOutcome::render_with(
            Page::Appointments(HistoryPage::new(entries, can_edit, |id| {
                Route::EditAppointment(*id)
            })),
            Notification::success("Appointments loaded successfully."),
        ),
        Err(e) => {
            tracing::error!(error = %e, "listing appointments failed");
            ViewOutcome::render_with(
                Page::Appointments(HistoryPage::empty(can_edit)),
                Notification::error("Error loading appointments. Please try again."),
            )
        }
    }
}

/// Empty form, or the stored appointment when editing.
pub async fn form(cx: &ViewContext<'_>, id: Option<AppointmentId>) -> ViewOutcome {
    let auth = match cx.admit(Route::NewAppointment.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    let Some(id) = id else {
        return ViewOutcome::render(Page::AppointmentForm(None));
    };

    match cx.gateway.get_appointment(&auth.token, id).await {
        Ok(appointment) => ViewOutcome::render(Page::AppointmentForm(Some(appointment))),
        Err(e) => ViewOutcome::render_with(
            Page::AppointmentForm(None),
            Notification::error(format!("Error during data fetching: {e}")),
        ),
    }
}

/// The signed-in doctor's own doctor id.
pub(crate) async fn own_doctor_id(
    cx: &ViewContext<'_>,
    auth: &Authorized,
) -> Result<DoctorId, GatewayError> {
    let doctor = cx
        .gateway
        .get_doctor_by_user(&auth.token, auth.principal.user_id())
        .await?;
    doctor
        .id()
        .copied()
        .ok_or_else(|| GatewayError::Payload("doctor record has no idDoctor".into()))
}

/// Create (`id == None`) or update an appointment owned by the signed-in doctor.
pub async fn save(
    cx: &ViewContext<'_>,
    id: Option<AppointmentId>,
    input: &AppointmentForm,
) -> ViewOutcome {
    let auth = match cx.admit(Route::NewAppointment.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };
    let page = || Page::AppointmentForm(None);
    if let Err(errors) = input.validate() {
        return ViewOutcome::invalid(page(), &errors);
    }

    match persist(cx, &auth, id, input).await {
        Ok(Ok(envelope)) => ViewOutcome::redirect(
            Route::Appointments,
            Some(Notification::success(envelope.message)),
        ),
        Ok(Err(errors)) => ViewOutcome::invalid(page(), &errors),
        Err(e) => {
            tracing::error!(error = %e, "saving appointment failed");
            ViewOutcome::render_with(
                page(),
                Notification::error(format!("Error saving appointment: {e}")),
            )
        }
    }
}

async fn persist(
    cx: &ViewContext<'_>,
    auth: &Authorized,
    id: Option<AppointmentId>,
    input: &AppointmentForm,
) -> Result<Result<ResponseEnvelope, ValidationErrors>, GatewayError> {
    let doctor = own_doctor_id(cx, auth).await?;
    let appointment = match input.appointment(doctor, id) {
        Ok(appointment) => appointment,
        Err(errors) => return Ok(Err(errors)),
    };
    let envelope = match id {
        Some(id) => cx.gateway.update_appointment(&auth.token, id, &appointment).await?,
        None => cx.gateway.create_appointment(&auth.token, &appointment).await?,
    };
    Ok(Ok(envelope))
}

pub async fn delete(cx: &ViewContext<'_>, id: AppointmentId) -> ViewOutcome {
    let auth = match cx.admit(Route::NewAppointment.access()) {
        Ok(auth) => auth,
        Err(outcome) => return outcome,
    };

    match cx.gateway.delete_appointment(&auth.token, id).await {
        Ok(envelope) => ViewOutcome::redirect(
            Route::Appointments,
            Some(Notification::success(envelope.message)),
        ),
        Err(e) => {
            tracing::error!(error = %e, appointment_id = %id, "appointment deletion failed");
            let mut outcome = load_history(cx, &auth).await;
            if let ViewOutcome::Render { notifications, .. } = &mut outcome {
                notifications.push(Notification::error(format!("Error deleting appointment: {e}")));
            }
            outcome
        }
    }
}
