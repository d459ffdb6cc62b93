//! Value objects: format-checked scalar fields shared by several forms.
//!
//! These checks are format-only. Uniqueness (email, CNP, username) and any
//! other business rule is enforced by the owning service behind the gateway.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by value; constructing one proves
/// the wrapped text passed its format check.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {
    /// Parse raw form input into the value object.
    fn parse(raw: &str) -> Result<Self, ValueError>
    where
        Self: Sized;

    fn as_str(&self) -> &str;
}

/// Why a raw field value was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    #[error("is required")]
    Required,

    #[error("must be at most {0} characters")]
    TooLong(usize),

    #[error("is not a valid email address")]
    Email,

    #[error("must be exactly {0} digits")]
    Digits(usize),

    #[error("must be 3-20 characters of letters, digits, '_' or '-'")]
    Username,

    #[error("must be at least 6 characters and include a letter and a digit")]
    Password,

    #[error("is not an accepted value")]
    NotAllowed,

    #[error("must be a positive identifier")]
    Identifier,

    #[error("must not be negative")]
    Negative,

    #[error("does not match")]
    Mismatch,
}

macro_rules! string_value_object {
    ($(#[$meta:meta])* $t:ident, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl ValueObject for $t {
            fn parse(raw: &str) -> Result<Self, ValueError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ValueError::Required);
                }
                let check: fn(&str) -> Result<(), ValueError> = $check;
                check(trimmed)?;
                Ok(Self(trimmed.to_string()))
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_value_object!(
    /// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the domain.
    Email,
    |s| {
        let (local, domain) = s.split_once('@').ok_or(ValueError::Email)?;
        let clean = |part: &str| !part.is_empty() && !part.contains('@') && !part.contains(char::is_whitespace);
        let dotted = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
        if clean(local) && clean(domain) && dotted {
            Ok(())
        } else {
            Err(ValueError::Email)
        }
    }
);

string_value_object!(
    /// Ten-digit phone number.
    PhoneNumber,
    |s| digits_exactly(s, 10)
);

string_value_object!(
    /// National personal identification number: thirteen digits.
    Cnp,
    |s| digits_exactly(s, 13)
);

string_value_object!(
    /// Login name: 3-20 of `[A-Za-z0-9_-]`.
    Username,
    |s| {
        let len = s.chars().count();
        let allowed = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if (3..=20).contains(&len) && allowed {
            Ok(())
        } else {
            Err(ValueError::Username)
        }
    }
);

/// Password accepted by the registration and password-change forms.
///
/// Not trimmed: surrounding whitespace is part of the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl ValueObject for Password {
    fn parse(raw: &str) -> Result<Self, ValueError> {
        if raw.is_empty() {
            return Err(ValueError::Required);
        }
        let long_enough = raw.chars().count() >= 6;
        let has_letter = raw.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        if long_enough && has_letter && has_digit {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValueError::Password)
        }
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Password(***)")
    }
}

fn digits_exactly(s: &str, n: usize) -> Result<(), ValueError> {
    if s.len() == n && s.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValueError::Digits(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn email_shapes() {
        assert!(Email::parse("ana@clinic.ro").is_ok());
        assert!(Email::parse("  ana@clinic.ro ").is_ok());
        assert_eq!(Email::parse(""), Err(ValueError::Required));
        assert_eq!(Email::parse("ana.clinic.ro"), Err(ValueError::Email));
        assert_eq!(Email::parse("ana@clinic"), Err(ValueError::Email));
        assert_eq!(Email::parse("ana@@clinic.ro"), Err(ValueError::Email));
        assert_eq!(Email::parse("a na@clinic.ro"), Err(ValueError::Email));
        assert_eq!(Email::parse("ana@.ro"), Err(ValueError::Email));
    }

    #[test]
    fn phone_and_cnp_need_exact_digit_counts() {
        assert!(PhoneNumber::parse("0712345678").is_ok());
        assert_eq!(PhoneNumber::parse("071234567"), Err(ValueError::Digits(10)));
        assert_eq!(PhoneNumber::parse("07123456a8"), Err(ValueError::Digits(10)));
        assert!(Cnp::parse("1960101123456").is_ok());
        assert_eq!(Cnp::parse("19601011234"), Err(ValueError::Digits(13)));
    }

    #[test]
    fn username_rules() {
        assert!(Username::parse("dr_house-1").is_ok());
        assert_eq!(Username::parse("ab"), Err(ValueError::Username));
        assert_eq!(Username::parse("has space"), Err(ValueError::Username));
        assert_eq!(Username::parse(&"x".repeat(21)), Err(ValueError::Username));
    }

    #[test]
    fn password_rules() {
        assert!(Password::parse("secret1").is_ok());
        assert_eq!(Password::parse("secret"), Err(ValueError::Password));
        assert_eq!(Password::parse("123456"), Err(ValueError::Password));
        assert_eq!(Password::parse("a1"), Err(ValueError::Password));
        assert_eq!(format!("{:?}", Password::parse("secret1").unwrap()), "Password(***)");
    }

    proptest! {
        #[test]
        fn any_ten_digits_is_a_phone_number(s in "[0-9]{10}") {
            prop_assert!(PhoneNumber::parse(&s).is_ok());
        }

        #[test]
        fn any_thirteen_digits_is_a_cnp(s in "[0-9]{13}") {
            prop_assert!(Cnp::parse(&s).is_ok());
        }
    }
}
