//! `medportal-core`: domain foundation building blocks.
//!
//! Entity models mirror the gateway's JSON shapes (camelCase). Every entity
//! that is submitted to the gateway carries one declarative validation schema
//! that must pass before any network call is issued.

pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod validation;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{AppointmentId, ConsultationId, DoctorId, InvestigationId, PatientId, UserId};
pub use model::{
    AccountRole, Appointment, AppointmentStatus, BlacklistEntry, Consultation, CreatedUser,
    Doctor, Investigation, LoginRequest, LoginResult, Patient, PasswordChange, PasswordUpdate,
    Registration, Specialization, User, gateway_date,
};
pub use validation::{FieldError, Schema, Validate, ValidationErrors};
pub use value_object::{Cnp, Email, Password, PhoneNumber, Username, ValueError, ValueObject};
