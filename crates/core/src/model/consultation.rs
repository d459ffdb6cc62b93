use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::{ConsultationId, DoctorId, InvestigationId, PatientId};
use crate::validation::{Schema, Validate, ValidationErrors};

/// Investigation ordered during a consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investigation {
    #[serde(rename = "idInvestigation", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<InvestigationId>,
    pub name: String,
    /// Days until the result is expected.
    pub processing_time: i64,
    pub result: String,
}

impl Validate for Investigation {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .required("investigations.name", &self.name)
            .non_negative("investigations.processingTime", self.processing_time)
            .required("investigations.result", &self.result)
            .finish()
    }
}

/// Consultation document owned by the consultation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(rename = "idConsultation", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ConsultationId>,
    pub id_patient: PatientId,
    pub id_doctor: DoctorId,
    pub date: DateTime<Utc>,
    pub diagnostic: String,
    #[serde(default)]
    pub investigations: Vec<Investigation>,
}

impl Entity for Consultation {
    type Id = ConsultationId;

    fn id(&self) -> Option<&ConsultationId> {
        self.id.as_ref()
    }
}

impl Validate for Consultation {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.investigations.iter().fold(
            Schema::new()
                .positive_id("idPatient", self.id_patient.get())
                .positive_id("idDoctor", self.id_doctor.get())
                .required("diagnostic", &self.diagnostic),
            |schema, inv| schema.nested(inv.validate()),
        )
        .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consultation() -> Consultation {
        serde_json::from_str(
            r#"{
                "idConsultation": "65a1f0c2b3d4e5f601234567",
                "idPatient": 1,
                "idDoctor": 2,
                "date": "2024-05-01T00:00:00Z",
                "diagnostic": "migraine",
                "investigations": [
                    {"idInvestigation": "65a1f0c2b3d4e5f601234568", "name": "MRI", "processingTime": 3, "result": "clear"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn decodes_document_ids() {
        let c = consultation();
        assert_eq!(c.id().unwrap().as_str(), "65a1f0c2b3d4e5f601234567");
        assert_eq!(c.investigations[0].processing_time, 3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn investigation_errors_surface_once() {
        let mut c = consultation();
        c.diagnostic = " ".into();
        c.investigations.push(Investigation {
            id: None,
            name: "".into(),
            processing_time: -1,
            result: "".into(),
        });
        c.investigations.push(Investigation {
            id: None,
            name: "".into(),
            processing_time: 0,
            result: "x".into(),
        });
        let errs = c.validate().unwrap_err();
        let fields: Vec<_> = errs.fields().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "diagnostic",
                "investigations.name",
                "investigations.processingTime",
                "investigations.result"
            ]
        );
    }

    #[test]
    fn missing_investigations_default_to_empty() {
        let c: Consultation = serde_json::from_str(
            r#"{"idPatient":1,"idDoctor":2,"date":"2024-05-01T00:00:00Z","diagnostic":"ok"}"#,
        )
        .unwrap();
        assert!(c.investigations.is_empty());
        assert!(c.id.is_none());
    }
}
