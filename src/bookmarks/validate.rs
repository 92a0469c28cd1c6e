//! Validation rules for bookmark input.
//!
//! The rules run as an explicit ordered list before the creation pipeline:
//! not-blank, URL syntax, then the allowed-domain check. The allowed-domain
//! check is a pure function over the URL string and the configured
//! allow-list; blank and unparsable values are left to the earlier rules.

use std::fmt;

use url::Url;

/// A failed allowed-domain check, carrying the parameters the response
/// message is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDomainViolation {
    pub domain: String,
    pub allowed_domains: String,
}

impl fmt::Display for AllowedDomainViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The domain \"{}\" is not allowed. Allowed domains are: {}.",
            self.domain, self.allowed_domains
        )
    }
}

#[derive(Debug)]
pub enum ValidationError {
    BlankUrl,
    InvalidUrl(String),
    DomainNotAllowed(AllowedDomainViolation),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValidationError::*;
        match self {
            BlankUrl => write!(f, "The URL must not be blank."),
            InvalidUrl(url) => write!(f, "The URL '{}' is not a valid URL.", url),
            DomainNotAllowed(violation) => write!(f, "{}", violation),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a URL's registrable domain against the allow-list.
///
/// Subdomains of an allowed domain pass ("sub.example.com" is fine when
/// "example.com" is allowed). Empty values and hosts without a registrable
/// domain are not this rule's concern and produce no violation.
pub fn allowed_domain_violation(
    value: &str,
    allowed_domains: &[String],
) -> Option<AllowedDomainViolation> {
    if value.is_empty() {
        return None;
    }

    let parsed = Url::parse(value).ok()?;
    let host = parsed.host_str()?;
    let registrable = psl::domain_str(host)?;

    if allowed_domains.iter().any(|d| d == registrable) {
        return None;
    }

    Some(AllowedDomainViolation {
        domain: registrable.to_string(),
        allowed_domains: allowed_domains.join(", "),
    })
}

/// Run the full rule list over a raw input URL.
pub fn validate_url(value: Option<&str>, allowed_domains: &[String]) -> Result<(), ValidationError> {
    let value = value.unwrap_or("");
    if value.trim().is_empty() {
        return Err(ValidationError::BlankUrl);
    }

    if Url::parse(value).is_err() {
        return Err(ValidationError::InvalidUrl(value.to_string()));
    }

    if let Some(violation) = allowed_domain_violation(value, allowed_domains) {
        return Err(ValidationError::DomainNotAllowed(violation));
    }

    Ok(())
}
