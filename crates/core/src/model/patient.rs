use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{PatientId, UserId};
use crate::validation::{Schema, Validate, ValidationErrors};
use crate::value_object::{Cnp, Email, PhoneNumber};

/// Patient record owned by the patient service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_patient: Option<PatientId>,
    pub id_user: UserId,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub phone_number: String,
    pub cnp: String,
    pub birth_day: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
}

impl Validate for Patient {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .positive_id("idUser", self.id_user.get())
            .required("firstName", &self.first_name)
            .max_len("firstName", &self.first_name, 50)
            .required("secondName", &self.second_name)
            .max_len("secondName", &self.second_name, 50)
            .parses::<Email>("email", &self.email)
            .parses::<PhoneNumber>("phoneNumber", &self.phone_number)
            .parses::<Cnp>("cnp", &self.cnp)
            .finish()
    }
}
