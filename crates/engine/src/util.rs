//! Internal helpers for input validation and model conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so every operation enforces the same rules.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Validation(format!("id de {label} inválido")))
}

/// Trim a required text field, rejecting blank input.
pub(crate) fn normalize_required_text(value: &str, message: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank input becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Minimal e-mail shape check: one `@`, non-empty local part and a dotted
/// domain without whitespace.
pub(crate) fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Password rule for staff accounts: at least 8 characters and at least one
/// character that is neither a letter nor a digit.
pub(crate) fn validate_password(password: &str) -> ResultEngine<()> {
    if password.is_empty() {
        return Err(EngineError::Validation(
            "La contraseña es requerida".to_string(),
        ));
    }
    if password.chars().count() < 8 {
        return Err(EngineError::Validation(
            "La contraseña debe tener al menos 8 caracteres".to_string(),
        ));
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(EngineError::Validation(
            "La contraseña debe contener al menos un caracter especial".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("maria@email.com"));
        assert!(is_valid_email("a.b@clinic.mx"));
        assert!(!is_valid_email("maria"));
        assert!(!is_valid_email("maria@"));
        assert!(!is_valid_email("@email.com"));
        assert!(!is_valid_email("maria@email"));
        assert!(!is_valid_email("maria@@email.com"));
        assert!(!is_valid_email("ma ria@email.com"));
        assert!(!is_valid_email("maria@email..com"));
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("").is_err());
        assert!(validate_password("a!1").is_err());
        assert!(validate_password("abcdefgh1").is_err());
        assert!(validate_password("abcdefg!").is_ok());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" x ")), Some("x".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
