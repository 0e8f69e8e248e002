use std::sync::LazyLock;

use regex::Regex;

use super::ApiError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"));

pub fn validate_visit_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid visit ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if trimmed.len() > 254 || !EMAIL_RE.is_match(trimmed) {
        return Err(ApiError::validation(format!("Invalid email: {trimmed}")));
    }
    Ok(trimmed)
}

pub fn validate_username(name: &str) -> Result<&str, ApiError> {
    if name.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if name.len() > 50 {
        return Err(ApiError::validation(
            "Username must be 50 characters or less",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(name)
}

pub fn validate_pass_id(pass_id: &str) -> Result<&str, ApiError> {
    let trimmed = pass_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Pass ID cannot be empty"));
    }
    if trimmed.len() > 32 {
        return Err(ApiError::validation("Pass ID is too long"));
    }
    Ok(trimmed)
}

pub fn validate_code(code: &str) -> Result<&str, ApiError> {
    if code.is_empty() {
        return Err(ApiError::validation("Code is required"));
    }
    if code.len() > 10 {
        return Err(ApiError::validation("Code is too long"));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_visit_id() {
        assert!(validate_visit_id(1).is_ok());
        assert!(validate_visit_id(12345).is_ok());
        assert!(validate_visit_id(0).is_err());
        assert!(validate_visit_id(-1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("host@example.com").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@@example.com").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("jsmith").is_ok());
        assert!(validate_username("j.smith-2_x").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("a".repeat(51).as_str()).is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_validate_pass_id() {
        assert!(validate_pass_id("VIS-1A2B3C4D").is_ok());
        assert!(validate_pass_id("").is_err());
        assert!(validate_pass_id("x".repeat(33).as_str()).is_err());
    }
}
