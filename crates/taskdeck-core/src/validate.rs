//! Local form validation, shared by the login and register screens.
//!
//! These checks run before any request is sent and the resulting messages
//! are displayed inline next to the offending field. The server performs
//! its own validation; this is only the first line.

/// Minimum username length accepted by the backend UI
const MIN_USERNAME_LEN: usize = 6;

/// Minimum password length accepted by the backend UI
const MIN_PASSWORD_LEN: usize = 8;

/// Validate a username. Returns an inline error message on failure.
pub fn validate_username(value: &str) -> Option<String> {
    if value.chars().count() < MIN_USERNAME_LEN {
        Some(format!(
            "Username must be at least {} characters long.",
            MIN_USERNAME_LEN
        ))
    } else {
        None
    }
}

/// Validate an email address shape: something@something.something with no
/// whitespace, matching the original form check.
pub fn validate_email(value: &str) -> Option<String> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && !domain.contains('@')
                && !domain.contains(char::is_whitespace)
                && matches!(domain.rsplit_once('.'), Some((host, tld)) if !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if valid {
        None
    } else {
        Some("Please enter a valid email address.".to_string())
    }
}

/// Validate a password. Returns an inline error message on failure.
pub fn validate_password(value: &str) -> Option<String> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        Some(format!(
            "Password must be at least {} characters long.",
            MIN_PASSWORD_LEN
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_username_is_rejected() {
        assert!(validate_username("bob").is_some());
        assert!(validate_username("").is_some());
        assert!(validate_username("alice1").is_none());
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("alice@example.com").is_none());
        assert!(validate_email("a@b.co").is_none());
        assert!(validate_email("").is_some());
        assert!(validate_email("alice").is_some());
        assert!(validate_email("alice@").is_some());
        assert!(validate_email("alice@example").is_some());
        assert!(validate_email("alice@.com").is_some());
        assert!(validate_email("alice@example.").is_some());
        assert!(validate_email("al ice@example.com").is_some());
        assert!(validate_email("alice@exa mple.com").is_some());
        assert!(validate_email("alice@ex@ample.com").is_some());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("seven77").is_some());
        assert!(validate_password("eight888").is_none());
    }
}
