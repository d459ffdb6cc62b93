//! Strongly-typed identifiers used across the domain.
//!
//! Relational services (users, doctors, patients, appointments) key their
//! rows with integers; the consultation service stores documents keyed by a
//! 24-character hex object id.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of an account in the identity service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

/// Identifier of a doctor record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorId(i64);

/// Identifier of a patient record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(i64);

/// Identifier of an appointment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn get(&self) -> i64 {
                self.0
            }

            /// Upstream services never hand out ids below 1.
            pub fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(UserId, "UserId");
impl_int_newtype!(DoctorId, "DoctorId");
impl_int_newtype!(PatientId, "PatientId");
impl_int_newtype!(AppointmentId, "AppointmentId");

/// Identifier of a consultation document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultationId(String);

/// Identifier of an investigation embedded in a consultation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestigationId(String);

macro_rules! impl_object_id_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.len() != 24 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(DomainError::invalid_id(format!(
                        "{}: expected 24 hex characters, got '{}'",
                        $name, s
                    )));
                }
                Ok(Self(s.to_ascii_lowercase()))
            }
        }
    };
}

impl_object_id_newtype!(ConsultationId, "ConsultationId");
impl_object_id_newtype!(InvestigationId, "InvestigationId");
