//! Typed client for the gateway's REST API.
//!
//! Every call goes through [`crate::http::execute`], so callers only ever see
//! a decoded envelope (or its typed payload) or a [`GatewayError`].

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use medportal_core::{
    Appointment, AppointmentId, BlacklistEntry, Consultation, ConsultationId, CreatedUser, Doctor,
    DoctorId, LoginRequest, LoginResult, Patient, PatientId, PasswordUpdate, Registration, User,
    UserId,
};

use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use crate::error::GatewayError;
use crate::http;

const USERS: &str = "/api/users";
const LOGIN: &str = "/api/login";
const BLACKLIST: &str = "/api/blacklist";
const APPOINTMENTS: &str = "/api/appointments";
const CONSULTATIONS: &str = "/api/consultations";
const DOCTORS: &str = "/api/doctors";
const PATIENTS: &str = "/api/patients";
const QUEUE_PUBLISH: &str = "/api/rabbit/publish";

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn gateway(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let req = self
            .http
            .request(method, format!("{}{}", self.config.gateway_url, path));
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<ResponseEnvelope, GatewayError> {
        http::execute(&self.http, req).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let envelope = self.send(req).await?;
        envelope
            .payload_as()
            .map_err(|e| GatewayError::Payload(e.to_string()))
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.send(self.gateway(Method::POST, path, token).json(body)).await
    }

    // ── identity ──────────────────────────────────────────────────────────

    pub async fn register_user(&self, registration: &Registration) -> Result<CreatedUser, GatewayError> {
        self.fetch(self.gateway(Method::POST, USERS, None).json(registration))
            .await
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<String, GatewayError> {
        let result: LoginResult = self
            .fetch(self.gateway(Method::POST, LOGIN, None).json(credentials))
            .await?;
        Ok(result.into_token())
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, GatewayError> {
        self.fetch(self.gateway(Method::GET, USERS, Some(token))).await
    }

    pub async fn get_user(&self, token: &str, id: UserId) -> Result<User, GatewayError> {
        self.fetch(self.gateway(Method::GET, &format!("{USERS}/{id}"), Some(token)))
            .await
    }

    pub async fn update_password(
        &self,
        token: &str,
        id: UserId,
        update: &PasswordUpdate,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.post(&format!("{USERS}/{id}/update-password"), Some(token), update)
            .await
    }

    /// Revoke a token at logout.
    pub async fn blacklist_token(
        &self,
        token: &str,
        entry: &BlacklistEntry,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.post(BLACKLIST, Some(token), entry).await
    }

    /// Ask the queue publisher to delete an account across all services.
    pub async fn publish_user_deletion(
        &self,
        token: &str,
        id: UserId,
    ) -> Result<ResponseEnvelope, GatewayError> {
        let req = self
            .http
            .post(format!("{}{}", self.config.queue_url, QUEUE_PUBLISH))
            .bearer_auth(token)
            .json(&json!({ "userID": id }));
        self.send(req).await
    }

    // ── appointments ──────────────────────────────────────────────────────

    pub async fn create_appointment(
        &self,
        token: &str,
        appointment: &Appointment,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.post(APPOINTMENTS, Some(token), appointment).await
    }

    pub async fn list_appointments(&self, token: &str) -> Result<Vec<Appointment>, GatewayError> {
        self.fetch(self.gateway(Method::GET, APPOINTMENTS, Some(token)))
            .await
    }

    pub async fn get_appointment(
        &self,
        token: &str,
        id: AppointmentId,
    ) -> Result<Appointment, GatewayError> {
        self.fetch(self.gateway(Method::GET, &format!("{APPOINTMENTS}/{id}"), Some(token)))
            .await
    }

    pub async fn update_appointment(
        &self,
        token: &str,
        id: AppointmentId,
        appointment: &Appointment,
    ) -> Result<ResponseEnvelope, GatewayError> {
        let path = format!("{APPOINTMENTS}/{id}");
        self.send(self.gateway(Method::PUT, &path, Some(token)).json(appointment))
            .await
    }

    pub async fn delete_appointment(
        &self,
        token: &str,
        id: AppointmentId,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.send(self.gateway(Method::DELETE, &format!("{APPOINTMENTS}/{id}"), Some(token)))
            .await
    }

    // ── consultations ─────────────────────────────────────────────────────

    pub async fn create_consultation(
        &self,
        token: &str,
        consultation: &Consultation,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.post(CONSULTATIONS, Some(token), consultation).await
    }

    pub async fn list_consultations(&self, token: &str) -> Result<Vec<Consultation>, GatewayError> {
        self.fetch(self.gateway(Method::GET, CONSULTATIONS, Some(token)))
            .await
    }

    pub async fn get_consultation(
        &self,
        token: &str,
        id: &ConsultationId,
    ) -> Result<Consultation, GatewayError> {
        self.fetch(self.gateway(Method::GET, &format!("{CONSULTATIONS}/{id}"), Some(token)))
            .await
    }

    pub async fn update_consultation(
        &self,
        token: &str,
        id: &ConsultationId,
        consultation: &Consultation,
    ) -> Result<ResponseEnvelope, GatewayError> {
        let path = format!("{CONSULTATIONS}/{id}");
        self.send(self.gateway(Method::PUT, &path, Some(token)).json(consultation))
            .await
    }

    pub async fn delete_consultation(
        &self,
        token: &str,
        id: &ConsultationId,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.send(self.gateway(Method::DELETE, &format!("{CONSULTATIONS}/{id}"), Some(token)))
            .await
    }

    // ── doctors ───────────────────────────────────────────────────────────

    pub async fn create_doctor(
        &self,
        token: &str,
        doctor: &Doctor,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.post(DOCTORS, Some(token), doctor).await
    }

    pub async fn list_doctors(&self, token: &str) -> Result<Vec<Doctor>, GatewayError> {
        self.fetch(self.gateway(Method::GET, DOCTORS, Some(token))).await
    }

    pub async fn get_doctor(&self, token: &str, id: DoctorId) -> Result<Doctor, GatewayError> {
        self.fetch(self.gateway(Method::GET, &format!("{DOCTORS}/{id}"), Some(token)))
            .await
    }

    pub async fn get_doctor_by_user(&self, token: &str, user: UserId) -> Result<Doctor, GatewayError> {
        self.fetch(self.gateway(Method::GET, &format!("{DOCTORS}/users/{user}"), Some(token)))
            .await
    }

    // ── patients ──────────────────────────────────────────────────────────

    pub async fn create_patient(
        &self,
        token: &str,
        patient: &Patient,
    ) -> Result<ResponseEnvelope, GatewayError> {
        self.post(PATIENTS, Some(token), patient).await
    }

    pub async fn list_patients(&self, token: &str) -> Result<Vec<Patient>, GatewayError> {
        self.fetch(self.gateway(Method::GET, PATIENTS, Some(token))).await
    }

    pub async fn get_patient(&self, token: &str, id: PatientId) -> Result<Patient, GatewayError> {
        self.fetch(self.gateway(Method::GET, &format!("{PATIENTS}/{id}"), Some(token)))
            .await
    }

    pub async fn get_patient_by_user(
        &self,
        token: &str,
        user: UserId,
    ) -> Result<Patient, GatewayError> {
        self.fetch(self.gateway(Method::GET, &format!("{PATIENTS}/users/{user}"), Some(token)))
            .await
    }
}
