//! Gateway entity models.
//!
//! Field names follow the gateway's JSON contract (camelCase). Dates travel as
//! RFC 3339 timestamps at UTC midnight.

mod appointment;
mod consultation;
mod doctor;
mod patient;
mod user;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub use appointment::{Appointment, AppointmentStatus};
pub use consultation::{Consultation, Investigation};
pub use doctor::{Doctor, Specialization};
pub use patient::Patient;
pub use user::{
    AccountRole, BlacklistEntry, CreatedUser, LoginRequest, LoginResult, PasswordChange,
    PasswordUpdate, Registration, User,
};

/// Calendar day as the gateway expects it: `yyyy-mm-ddT00:00:00Z`.
pub fn gateway_date(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_date_is_utc_midnight() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let json = serde_json::to_string(&gateway_date(day)).unwrap();
        assert_eq!(json, "\"2024-03-09T00:00:00Z\"");
    }
}
