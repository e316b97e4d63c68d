//! Input checks shared by the request types.
//!
//! The field rules are expressed through `validator` derives on the request
//! structs; the functions here cover the rules that need more than a length or
//! range bound.

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

const PASSWORD_SYMBOLS: &[char] = &['@', '#', '$', '%', '^', '&', '+', '='];

/// Password policy: 8 to 15 characters, no whitespace, at least one digit,
/// one lowercase letter, one uppercase letter and one of `@#$%^&+=`.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    let ok = (8..=15).contains(&length)
        && !password.chars().any(char::is_whitespace)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c));

    if ok {
        Ok(())
    } else {
        Err(error_with_message("password", "enter a valid password"))
    }
}

/// Ten-digit mobile number starting with 6-9, optionally prefixed by `0` or `91`.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let number = phone
        .strip_prefix("91")
        .filter(|rest| rest.len() == 10)
        .or_else(|| phone.strip_prefix('0').filter(|rest| rest.len() == 10))
        .unwrap_or(phone);

    let ok = number.len() == 10
        && number.chars().all(|c| c.is_ascii_digit())
        && matches!(number.chars().next(), Some('6'..='9'));

    if ok {
        Ok(())
    } else {
        Err(error_with_message("phone_number", "enter a valid phone number"))
    }
}

/// Six-digit postal code that does not start with zero.
pub fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    let ok = pincode.len() == 6
        && pincode.chars().all(|c| c.is_ascii_digit())
        && !pincode.starts_with('0');

    if ok {
        Ok(())
    } else {
        Err(error_with_message("pincode", "enter a valid pincode"))
    }
}

/// Names start with a letter and contain only letters and spaces.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphabetic() || c == ' ');

    if ok {
        Ok(())
    } else {
        Err(error_with_message("name", "enter a valid name"))
    }
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Flatten validator output into a stable `field: message; ...` string.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts = Vec::new();
    collect(errors, "", &mut parts);
    parts.sort();
    parts.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, parts: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    parts.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, parts),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), parts);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Secret@123").is_ok());
        assert!(validate_password("secret@123").is_err()); // no uppercase
        assert!(validate_password("Secret1234").is_err()); // no symbol
        assert!(validate_password("Se@1").is_err()); // too short
        assert!(validate_password("Secret@123456789").is_err()); // too long
        assert!(validate_password("Sec ret@123").is_err());
    }

    #[test]
    fn test_phone_number() {
        assert!(validate_phone_number("9876543210").is_ok());
        assert!(validate_phone_number("919876543210").is_ok());
        assert!(validate_phone_number("09876543210").is_ok());
        assert!(validate_phone_number("5876543210").is_err());
        assert!(validate_phone_number("98765").is_err());
        assert!(validate_phone_number("98765x3210").is_err());
    }

    #[test]
    fn test_pincode() {
        assert!(validate_pincode("600020").is_ok());
        assert!(validate_pincode("060020").is_err());
        assert!(validate_pincode("60002").is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Adyar Bakery").is_ok());
        assert!(validate_name(" Adyar").is_err());
        assert!(validate_name("Cafe 9").is_err());
    }

    proptest! {
        #[test]
        fn passwords_with_whitespace_are_rejected(prefix in "[A-Z]{1,3}", suffix in "[a-z]{1,3}") {
            let candidate = format!("{prefix} {suffix}@1");
            prop_assert!(validate_password(&candidate).is_err());
        }

        #[test]
        fn well_formed_passwords_are_accepted(
            upper in "[A-Z]{2}",
            lower in "[a-z]{3}",
            digits in "[0-9]{2}",
        ) {
            let candidate = format!("{upper}{lower}#{digits}");
            prop_assert!(validate_password(&candidate).is_ok());
        }
    }
}
