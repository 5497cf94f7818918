//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{NewContact, UpdateContact};

/// Validate display name
pub fn validate_display_name(display_name: &str) -> Result<(), String> {
    if display_name.is_empty() {
        return Err("Display name is required".to_string());
    }

    let length = display_name.chars().count();

    if length < 3 {
        return Err("Display name must be at least 3 characters long".to_string());
    }

    if length > 16 {
        return Err("Display name must be at most 16 characters long".to_string());
    }

    static DISPLAY_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DISPLAY_NAME_REGEX
        .get_or_init(|| Regex::new(r"^\w+$").expect("Failed to compile display name regex"));

    if !regex.is_match(display_name) {
        return Err("Display name can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();

    if length < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if length > 16 {
        return Err("Password must be at most 16 characters long".to_string());
    }

    Ok(())
}

/// Validate a first or last name: letters with at most one inner `-` or `'`
pub fn validate_name(label: &str, name: &str) -> Result<(), String> {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = WORD_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+[-']?[A-Za-z]+$").expect("Failed to compile name regex")
    });

    if !regex.is_match(name) {
        return Err(format!(
            "{} must contain only alphabet, ' or - characters",
            label
        ));
    }

    Ok(())
}

/// Validate phone number, e.g. `+972-555-123-456`
pub fn validate_phone(phone: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+[1-9]\d{0,2}-\d{3}-\d{3}-\d{3}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone) {
        return Err("Phone number must be in this pattern: +###-###-###-###".to_string());
    }

    Ok(())
}

/// Validate a full contact payload
pub fn validate_new_contact(contact: &NewContact) -> Result<(), String> {
    validate_name("First name", &contact.first_name)?;
    validate_name("Last name", &contact.last_name)?;
    validate_phone(&contact.phone)?;
    validate_email(&contact.email)
}

/// Validate the fields a partial update actually sets
pub fn validate_contact_update(update: &UpdateContact) -> Result<(), String> {
    fn provided(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    if let Some(first_name) = provided(&update.first_name) {
        validate_name("First name", first_name)?;
    }
    if let Some(last_name) = provided(&update.last_name) {
        validate_name("Last name", last_name)?;
    }
    if let Some(phone) = provided(&update.phone) {
        validate_phone(phone)?;
    }
    if let Some(email) = provided(&update.email) {
        validate_email(email)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert!(validate_display_name("ann_lee").is_ok());
        assert!(validate_display_name("ab").is_err());
        assert!(validate_display_name("a_very_long_display").is_err());
        assert!(validate_display_name("ann lee").is_err());
        assert!(validate_display_name("").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("ann@example.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());
        assert!(validate_email("ann@example").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("sixteen-chars-ok").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("seventeen-chars-x").is_err());
    }

    #[test]
    fn test_names() {
        assert!(validate_name("First name", "Ann").is_ok());
        assert!(validate_name("First name", "Mary-Jane").is_ok());
        assert!(validate_name("Last name", "O'Neil").is_ok());
        assert!(validate_name("First name", "A").is_err());
        assert!(validate_name("First name", "Ann-").is_err());
        assert!(validate_name("First name", "Jean--Luc").is_err());
        assert!(validate_name("First name", "Ann2").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+1-555-555-555").is_ok());
        assert!(validate_phone("+972-555-123-456").is_ok());
        assert!(validate_phone("+0-555-555-555").is_err());
        assert!(validate_phone("+1234-555-555-555").is_err());
        assert!(validate_phone("1-555-555-555").is_err());
        assert!(validate_phone("+1-55-555-555").is_err());
    }

    #[test]
    fn test_contact_update_only_checks_provided_fields() {
        let update = UpdateContact {
            first_name: Some(String::new()),
            phone: Some("+1-555-555-555".to_string()),
            ..Default::default()
        };
        assert!(validate_contact_update(&update).is_ok());

        let update = UpdateContact {
            email: Some("broken".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_contact_update(&update),
            Err("Invalid email format".to_string())
        );
    }

    #[test]
    fn test_contact_update_checks_each_field_with_its_own_rule() {
        let update = UpdateContact {
            last_name: Some("+1-555-555-555".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_contact_update(&update),
            Err("Last name must contain only alphabet, ' or - characters".to_string())
        );

        let update = UpdateContact {
            phone: Some("ann@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_contact_update(&update),
            Err("Phone number must be in this pattern: +###-###-###-###".to_string())
        );
    }
}
