//! Domain normalization and syntax validation for block-list entries.

use crate::error::ValidationError;

/// Normalize user input to a bare domain: strip scheme, a single leading
/// `www.`, and any path, then lowercase and validate.
///
/// # Errors
/// Returns an error when the remainder is not a valid domain name.
pub fn normalize_site(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim().to_ascii_lowercase();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(&trimmed);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    let domain = without_www.split('/').next().unwrap_or_default();

    validate_domain(domain)?;
    Ok(domain.to_string())
}

/// Labels are 1-63 alphanumeric-or-hyphen characters, may not start or
/// end with a hyphen, and the domain needs at least one dot separator.
fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    let invalid = |message: &str| ValidationError::InvalidDomain {
        domain: domain.to_string(),
        message: message.to_string(),
    };

    if domain.is_empty() {
        return Err(invalid("empty domain"));
    }
    if !domain.contains('.') {
        return Err(invalid("missing dot separator"));
    }
    for label in domain.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(invalid("labels must be 1-63 characters"));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(invalid("labels may only contain alphanumerics and hyphens"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("labels may not start or end with a hyphen"));
        }
    }
    Ok(())
}
