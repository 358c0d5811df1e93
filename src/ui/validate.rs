use regex::Regex;

/// Visual validity of a form field as the user types. Empty input stays
/// unmarked; the same predicates gate the submit handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValidity {
    Unknown,
    Valid,
    Invalid,
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_ok_and(|re| re.is_match(email))
}

#[must_use]
pub fn email_validity(email: &str) -> FieldValidity {
    let email = email.trim();
    if email.is_empty() {
        FieldValidity::Unknown
    } else if valid_email(email) {
        FieldValidity::Valid
    } else {
        FieldValidity::Invalid
    }
}

#[must_use]
pub fn username_validity(username: &str) -> FieldValidity {
    let username = username.trim();
    if username.is_empty() {
        FieldValidity::Unknown
    } else if username.chars().count() >= 2 {
        FieldValidity::Valid
    } else {
        FieldValidity::Invalid
    }
}

#[must_use]
pub fn password_validity(password: &str) -> FieldValidity {
    if password.is_empty() {
        FieldValidity::Unknown
    } else if password.chars().count() >= 3 {
        FieldValidity::Valid
    } else {
        FieldValidity::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(valid_email("user@example.com"));
        assert!(valid_email("first.last@sub.example.org"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("user@example"));
        assert!(!valid_email("user @example.com"));
        assert!(!valid_email("@example.com"));
    }

    #[test]
    fn email_field_marking() {
        assert_eq!(email_validity(""), FieldValidity::Unknown);
        assert_eq!(email_validity("   "), FieldValidity::Unknown);
        assert_eq!(email_validity("user@example.com"), FieldValidity::Valid);
        assert_eq!(email_validity("nope"), FieldValidity::Invalid);
    }

    #[test]
    fn username_field_marking() {
        assert_eq!(username_validity(""), FieldValidity::Unknown);
        assert_eq!(username_validity("a"), FieldValidity::Invalid);
        assert_eq!(username_validity("ab"), FieldValidity::Valid);
        assert_eq!(username_validity("  admin  "), FieldValidity::Valid);
    }

    #[test]
    fn password_field_marking() {
        assert_eq!(password_validity(""), FieldValidity::Unknown);
        assert_eq!(password_validity("ab"), FieldValidity::Invalid);
        assert_eq!(password_validity("abc"), FieldValidity::Valid);
    }
}
