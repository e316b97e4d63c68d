//! # Marketplace Services
//!
//! One service per subsystem. Services own the request checks, password
//! hashing and error mapping; the store they wrap owns atomicity.

pub mod cart;
pub mod order;
pub mod restaurant;
pub mod user;

pub use cart::CartService;
pub use order::OrderService;
pub use restaurant::RestaurantService;
pub use user::UserService;

use crate::constants::ProfileField;
use crate::error::{SwiggyError, SwiggyResult};
use crate::password::hash_password;
use crate::validation::{validate_name, validate_password, validate_phone_number};
use validator::{ValidateEmail, ValidationError};

/// Check a single-field profile update and produce the value to store.
///
/// Passwords come back hashed.
pub(crate) fn profile_value(field: ProfileField, value: &str) -> SwiggyResult<String> {
    let checked = match field {
        ProfileField::Name => {
            let length = value.chars().count();
            if !(3..=21).contains(&length) {
                return Err(invalid(field, "must be between 3 and 21 characters"));
            }
            validate_name(value)
        }
        ProfileField::PhoneNumber => validate_phone_number(value),
        ProfileField::EmailId => {
            if !value.validate_email() || value.len() > 128 {
                return Err(invalid(field, "enter a valid email"));
            }
            Ok(())
        }
        ProfileField::Password => {
            validate_password(value).map_err(|error| describe_field(field, error))?;
            return hash_password(value);
        }
    };

    checked.map_err(|error| describe_field(field, error))?;
    Ok(value.to_string())
}

fn invalid(field: ProfileField, message: &str) -> SwiggyError {
    SwiggyError::Validation(format!("{field}: {message}"))
}

fn describe_field(field: ProfileField, error: ValidationError) -> SwiggyError {
    let message = error
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string());
    invalid(field, &message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;

    #[test]
    fn test_profile_value_checks_each_field() {
        assert_eq!(profile_value(ProfileField::Name, "Anjappar").unwrap(), "Anjappar");
        assert!(profile_value(ProfileField::Name, "A1").is_err());
        assert!(profile_value(ProfileField::PhoneNumber, "12345").is_err());
        assert!(profile_value(ProfileField::EmailId, "not-an-email").is_err());
        assert_eq!(
            profile_value(ProfileField::EmailId, "chef@example.com").unwrap(),
            "chef@example.com"
        );
    }

    #[test]
    fn test_profile_password_is_hashed() {
        let stored = profile_value(ProfileField::Password, "Secret@123").unwrap();
        assert_ne!(stored, "Secret@123");
        assert!(verify_password("Secret@123", &stored));

        let err = profile_value(ProfileField::Password, "weak").unwrap_err();
        assert_eq!(
            err,
            SwiggyError::Validation("password: enter a valid password".to_string())
        );
    }
}
