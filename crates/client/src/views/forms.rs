//! Raw form input and its validation schemas.
//!
//! Forms hold what the user typed. Each one validates as a whole, collecting
//! every failing field, before anything is sent to the gateway.

use chrono::NaiveDate;

use medportal_core::{
    AccountRole, Appointment, AppointmentId, AppointmentStatus, Cnp, Consultation, ConsultationId,
    Doctor, DoctorId, Email, Investigation, Patient, PatientId, PhoneNumber, Registration, Schema,
    Specialization, UserId, Validate, ValidationErrors, ValueError, gateway_date,
};

const NAME_MAX: usize = 50;

/// Username and password, shared by every registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    pub username: String,
    pub password: String,
}

impl AccountForm {
    pub fn registration(&self, role: AccountRole) -> Registration {
        Registration::new(self.username.trim(), self.password.clone(), role)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorForm {
    pub account: AccountForm,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: String,
    pub is_active: bool,
}

impl DoctorForm {
    /// Doctor record bound to a freshly created account.
    ///
    /// Call only after [`Validate::validate`] succeeded.
    pub fn doctor(&self, id_user: UserId) -> Result<Doctor, ValidationErrors> {
        let specialization = self
            .specialization
            .trim()
            .parse::<Specialization>()
            .map_err(|_| ValidationErrors::single("specialization", ValueError::NotAllowed))?;
        Ok(Doctor {
            id_doctor: None,
            id_user,
            first_name: self.first_name.trim().to_string(),
            second_name: self.second_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            specialization,
            is_active: self.is_active,
        })
    }
}

impl Validate for DoctorForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let specializations = Specialization::ALL.map(|s| s.as_str());
        person_schema(
            Schema::new().nested(self.account.registration(AccountRole::Doctor).validate()),
            &self.first_name,
            &self.second_name,
            &self.email,
            &self.phone_number,
        )
        .one_of("specialization", self.specialization.trim(), &specializations)
        .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub account: AccountForm,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub phone_number: String,
    pub cnp: String,
    pub birth_day: Option<NaiveDate>,
    pub is_active: bool,
}

impl PatientForm {
    pub fn patient(&self, id_user: UserId) -> Result<Patient, ValidationErrors> {
        let birth_day = self
            .birth_day
            .ok_or_else(|| ValidationErrors::single("birthDay", ValueError::Required))?;
        Ok(Patient {
            id_patient: None,
            id_user,
            first_name: self.first_name.trim().to_string(),
            second_name: self.second_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            cnp: self.cnp.trim().to_string(),
            birth_day: gateway_date(birth_day),
            is_active: self.is_active,
        })
    }
}

impl Validate for PatientForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        person_schema(
            Schema::new().nested(self.account.registration(AccountRole::Patient).validate()),
            &self.first_name,
            &self.second_name,
            &self.email,
            &self.phone_number,
        )
        .parses::<Cnp>("cnp", &self.cnp)
        .present("birthDay", self.birth_day.as_ref())
        .finish()
    }
}

fn person_schema(
    schema: Schema,
    first_name: &str,
    second_name: &str,
    email: &str,
    phone_number: &str,
) -> Schema {
    schema
        .required("firstName", first_name)
        .max_len("firstName", first_name, NAME_MAX)
        .required("secondName", second_name)
        .max_len("secondName", second_name, NAME_MAX)
        .parses::<Email>("email", email)
        .parses::<PhoneNumber>("phoneNumber", phone_number)
}

fn positive_id(raw: &str) -> Result<i64, ValueError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValueError::Required);
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValueError::Identifier),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentForm {
    pub id_patient: String,
    pub date: Option<NaiveDate>,
    pub status: String,
}

impl AppointmentForm {
    /// Prefill from an existing appointment.
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            id_patient: appointment.id_patient.to_string(),
            date: Some(appointment.date.date_naive()),
            status: appointment.status.as_str().to_string(),
        }
    }

    /// Appointment for `doctor`; `id` is set when editing.
    pub fn appointment(
        &self,
        doctor: DoctorId,
        id: Option<AppointmentId>,
    ) -> Result<Appointment, ValidationErrors> {
        self.validate()?;
        let id_patient = positive_id(&self.id_patient)
            .map_err(|e| ValidationErrors::single("idPatient", e))?;
        let date = self
            .date
            .ok_or_else(|| ValidationErrors::single("date", ValueError::Required))?;
        let status = self
            .status
            .trim()
            .parse::<AppointmentStatus>()
            .map_err(|_| ValidationErrors::single("status", ValueError::NotAllowed))?;

        let appointment = Appointment {
            id,
            id_patient: PatientId::new(id_patient),
            id_doctor: doctor,
            date: gateway_date(date),
            status,
        };
        appointment.validate()?;
        Ok(appointment)
    }
}

impl Validate for AppointmentForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let statuses = AppointmentStatus::ALL.map(|s| s.as_str());
        Schema::new()
            .check("idPatient", positive_id(&self.id_patient))
            .present("date", self.date.as_ref())
            .one_of("status", self.status.trim(), &statuses)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationForm {
    pub id_patient: String,
    pub date: Option<NaiveDate>,
    pub diagnostic: String,
    pub investigations: Vec<Investigation>,
}

impl ConsultationForm {
    pub fn from_consultation(consultation: &Consultation) -> Self {
        Self {
            id_patient: consultation.id_patient.to_string(),
            date: Some(consultation.date.date_naive()),
            diagnostic: consultation.diagnostic.clone(),
            investigations: consultation.investigations.clone(),
        }
    }

    pub fn consultation(
        &self,
        doctor: DoctorId,
        id: Option<ConsultationId>,
    ) -> Result<Consultation, ValidationErrors> {
        self.validate()?;
        let id_patient = positive_id(&self.id_patient)
            .map_err(|e| ValidationErrors::single("idPatient", e))?;
        let date = self
            .date
            .ok_or_else(|| ValidationErrors::single("date", ValueError::Required))?;

        let consultation = Consultation {
            id,
            id_patient: PatientId::new(id_patient),
            id_doctor: doctor,
            date: gateway_date(date),
            diagnostic: self.diagnostic.trim().to_string(),
            investigations: self.investigations.clone(),
        };
        consultation.validate()?;
        Ok(consultation)
    }
}

impl Validate for ConsultationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.investigations
            .iter()
            .fold(
                Schema::new()
                    .check("idPatient", positive_id(&self.id_patient))
                    .present("date", self.date.as_ref())
                    .required("diagnostic", &self.diagnostic),
                |schema, inv| schema.nested(inv.validate()),
            )
            .finish()
    }
}
