//! Email normalization.

/// Normalizes an email address for storage and lookup.
///
/// Surrounding whitespace is removed and the domain part is lowercased. The
/// local part is kept as typed, since mailbox names may be case sensitive.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_domain_only() {
        assert_eq!(normalize_email("Alice@Example.COM"), "Alice@example.com");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize_email("  a@x.com \n"), "a@x.com");
    }

    #[test]
    fn leaves_addresses_without_at_sign_alone() {
        assert_eq!(normalize_email("not-an-email"), "not-an-email");
    }
}
