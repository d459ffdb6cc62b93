use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainError;
use crate::id::{DoctorId, UserId};
use crate::validation::{Schema, Validate, ValidationErrors};
use crate::value_object::{Email, PhoneNumber};

/// Medical specializations accepted by the doctor service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    Cardiology,
    Neurology,
    Orthopedics,
    Pediatrics,
    Dermatology,
    Radiology,
    Surgery,
}

impl Specialization {
    pub const ALL: [Specialization; 7] = [
        Self::Cardiology,
        Self::Neurology,
        Self::Orthopedics,
        Self::Pediatrics,
        Self::Dermatology,
        Self::Radiology,
        Self::Surgery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardiology => "Cardiology",
            Self::Neurology => "Neurology",
            Self::Orthopedics => "Orthopedics",
            Self::Pediatrics => "Pediatrics",
            Self::Dermatology => "Dermatology",
            Self::Radiology => "Radiology",
            Self::Surgery => "Surgery",
        }
    }
}

impl core::fmt::Display for Specialization {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialization {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sp| sp.as_str() == s)
            .ok_or_else(|| DomainError::unknown_variant("specialization", s))
    }
}

/// Doctor record owned by the doctor service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_doctor: Option<DoctorId>,
    pub id_user: UserId,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: Specialization,
    #[serde(default)]
    pub is_active: bool,
}

impl Entity for Doctor {
    type Id = DoctorId;

    fn id(&self) -> Option<&DoctorId> {
        self.id_doctor.as_ref()
    }
}

impl Validate for Doctor {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .positive_id("idUser", self.id_user.get())
            .required("firstName", &self.first_name)
            .max_len("firstName", &self.first_name, 50)
            .required("secondName", &self.second_name)
            .max_len("secondName", &self.second_name, 50)
            .parses::<Email>("email", &self.email)
            .parses::<PhoneNumber>("phoneNumber", &self.phone_number)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> Doctor {
        Doctor {
            id_doctor: None,
            id_user: UserId::new(4),
            first_name: "Gregory".into(),
            second_name: "House".into(),
            email: "house@ppth.org".into(),
            phone_number: "0712345678".into(),
            specialization: Specialization::Neurology,
            is_active: true,
        }
    }

    #[test]
    fn valid_doctor_passes() {
        assert!(doctor().validate().is_ok());
    }

    #[test]
    fn invalid_fields_are_all_reported() {
        let mut d = doctor();
        d.first_name = "".into();
        d.email = "house".into();
        d.phone_number = "12".into();
        let errs = d.validate().unwrap_err();
        let fields: Vec<_> = errs.fields().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["firstName", "email", "phoneNumber"]);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let json = serde_json::to_value(doctor()).unwrap();
        assert!(json.get("idDoctor").is_none());
        assert_eq!(json["idUser"], 4);
        assert_eq!(json["specialization"], "Neurology");
        assert_eq!(json["phoneNumber"], "0712345678");

        let back: Doctor = serde_json::from_str(
            r#"{"idDoctor":9,"idUser":4,"firstName":"G","secondName":"H","email":"a@b.c","phoneNumber":"0712345678","specialization":"Surgery","isActive":false}"#,
        )
        .unwrap();
        assert_eq!(back.id(), Some(&DoctorId::new(9)));
        assert_eq!(back.specialization, Specialization::Surgery);
    }

    #[test]
    fn specialization_closed_set() {
        assert_eq!("Radiology".parse::<Specialization>().unwrap(), Specialization::Radiology);
        assert!("radiology".parse::<Specialization>().is_err());
    }
}
