//! Headless page controllers.
//!
//! A page load or form submission produces a [`ViewOutcome`]: either a page to
//! render (with any notifications) or a redirect. Protected pages validate the
//! session before issuing any gateway call.

pub mod appointments;
pub mod auth;
pub mod consultations;
pub mod doctors;
pub mod forms;
pub mod home;
pub mod profile;
pub mod users;

use chrono::{DateTime, Utc};
use serde::Serialize;

use medportal_auth::Access;
use medportal_core::{
    AccountRole, Appointment, Consultation, Doctor, Entity, Patient, User, ValidationErrors,
};

use crate::gateway::GatewayClient;
use crate::notify::Notification;
use crate::routes::Route;
use crate::session::{Authorized, SessionContext};

/// Everything a page controller needs.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub session: &'a SessionContext,
    pub gateway: &'a GatewayClient,
    pub now: DateTime<Utc>,
}

impl<'a> ViewContext<'a> {
    pub fn new(session: &'a SessionContext, gateway: &'a GatewayClient, now: DateTime<Utc>) -> Self {
        Self {
            session,
            gateway,
            now,
        }
    }

    /// Admit the current session to a page, or send it to the login page.
    pub(crate) fn admit(&self, access: Access) -> Result<Authorized, ViewOutcome> {
        self.session.require(access, self.now).map_err(|denied| {
            tracing::warn!(error = %denied, ?access, "page access denied");
            ViewOutcome::redirect(
                Route::Login,
                Some(Notification::error(format!("Authentication error: {denied}"))),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ViewOutcome {
    Render {
        page: Page,
        notifications: Vec<Notification>,
    },
    Redirect {
        to: Route,
        notification: Option<Notification>,
    },
}

impl ViewOutcome {
    pub fn render(page: Page) -> Self {
        Self::Render {
            page,
            notifications: Vec::new(),
        }
    }

    pub fn render_with(page: Page, notification: Notification) -> Self {
        Self::Render {
            page,
            notifications: vec![notification],
        }
    }

    /// Re-render a form with one error notification per failing field.
    pub fn invalid(page: Page, errors: &ValidationErrors) -> Self {
        Self::Render {
            page,
            notifications: errors
                .fields()
                .iter()
                .map(|e| Notification::error(e.to_string()))
                .collect(),
        }
    }

    pub fn redirect(to: Route, notification: Option<Notification>) -> Self {
        Self::Redirect { to, notification }
    }

    pub fn page(&self) -> Option<&Page> {
        match self {
            Self::Render { page, .. } => Some(page),
            Self::Redirect { .. } => None,
        }
    }

    pub fn notifications(&self) -> Vec<&Notification> {
        match self {
            Self::Render { notifications, .. } => notifications.iter().collect(),
            Self::Redirect { notification, .. } => notification.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", content = "data", rename_all = "snake_case")]
pub enum Page {
    Home(HomePage),
    Login,
    Register(AccountRole),
    /// `None` when the profile could not be loaded.
    Profile(Option<ProfilePage>),
    ChangePassword,
    Users(UsersPage),
    Doctors(Vec<Doctor>),
    Appointments(HistoryPage<Appointment>),
    Consultations(HistoryPage<Consultation>),
    AppointmentForm(Option<Appointment>),
    ConsultationForm(Option<Consultation>),
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    /// `None` for visitors without a session.
    pub role: Option<AccountRole>,
    pub links: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfilePage {
    Admin { user: User },
    Doctor { user: User, doctor: Doctor },
    Patient { user: User, patient: Patient },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub current_user: medportal_core::UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage<T> {
    pub entries: Vec<T>,
    /// Doctors may create and edit entries.
    pub can_edit: bool,
    /// One edit link per stored entry, in entry order; empty unless `can_edit`.
    pub edit_links: Vec<Route>,
}

impl<T: Entity> HistoryPage<T> {
    pub fn new(entries: Vec<T>, can_edit: bool, edit: impl Fn(&T::Id) -> Route) -> Self {
        let edit_links = if can_edit {
            entries.iter().filter_map(|e| e.id().map(&edit)).collect()
        } else {
            Vec::new()
        };
        Self {
            entries,
            can_edit,
            edit_links,
        }
    }

    pub fn empty(can_edit: bool) -> Self {
        Self {
            entries: Vec::new(),
            can_edit,
            edit_links: Vec::new(),
        }
    }
}

/// Load the page behind `route`.
pub async fn render(cx: &ViewContext<'_>, route: &Route) -> ViewOutcome {
    tracing::info!(route = %route, "rendering page");
    match route {
        Route::Home => home::home(cx),
        Route::Login => auth::login_page(cx),
        Route::Logout => auth::logout(cx).await,
        Route::RegisterAdmin => auth::register_page(cx, AccountRole::Admin),
        Route::RegisterDoctor => auth::register_page(cx, AccountRole::Doctor),
        Route::RegisterPatient => auth::register_page(cx, AccountRole::Patient),
        Route::Profile => profile::profile(cx).await,
        Route::ChangePassword => profile::change_password_page(cx),
        Route::Users => users::users(cx).await,
        Route::Doctors => doctors::doctors(cx).await,
        Route::Appointments => appointments::history(cx).await,
        Route::NewAppointment => appointments::form(cx, None).await,
        Route::EditAppointment(id) => appointments::form(cx, Some(*id)).await,
        Route::Consultations => consultations::history(cx).await,
        Route::NewConsultation => consultations::form(cx, None).await,
        Route::EditConsultation(id) => consultations::form(cx, Some(id)).await,
        Route::NotFound(path) => not_found(path),
    }
}

pub fn not_found(path: &str) -> ViewOutcome {
    tracing::debug!(path, "no route");
    ViewOutcome::render(Page::NotFound(path.to_string()))
}
