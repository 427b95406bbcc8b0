//! Per-kind value validation
//!
//! Pure functions only: validation never performs I/O and never fails
//! with an exception, it always resolves to an outcome. Semantic checks
//! beyond shape (does the URL resolve, is the text meaningful) are the
//! remote analyzer's job.

use crate::catalog::InputKind;

/// Error shown for blank values
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Error shown for malformed URLs
pub const URL_MESSAGE: &str = "Please enter a valid URL (including https://)";

/// Outcome of validating one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid { message: String },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    fn invalid(message: &str) -> Self {
        Validation::Invalid {
            message: message.to_string(),
        }
    }
}

/// Validate a raw value against its input kind
///
/// Blank values fail for every kind. URLs require a strict parse with
/// scheme and host; all other kinds accept any non-blank value (file
/// values are names, references are ids from the external catalog).
pub fn validate(kind: InputKind, raw_value: &str) -> Validation {
    if raw_value.trim().is_empty() {
        return Validation::invalid(REQUIRED_MESSAGE);
    }

    match kind {
        InputKind::Url => validate_url(raw_value),
        InputKind::Text | InputKind::Analytics | InputKind::File | InputKind::ProductReference => {
            Validation::Valid
        }
    }
}

fn validate_url(raw_value: &str) -> Validation {
    match url::Url::parse(raw_value.trim()) {
        Ok(parsed) if parsed.has_host() => Validation::Valid,
        _ => Validation::invalid(URL_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_value_invalid_for_every_kind() {
        for kind in [
            InputKind::Url,
            InputKind::Text,
            InputKind::File,
            InputKind::ProductReference,
            InputKind::Analytics,
        ] {
            let outcome = validate(kind, "   ");
            assert_eq!(
                outcome,
                Validation::Invalid {
                    message: REQUIRED_MESSAGE.to_string()
                }
            );
        }
    }

    #[test]
    fn url_without_scheme_invalid() {
        let outcome = validate(InputKind::Url, "example.com");
        assert_eq!(
            outcome,
            Validation::Invalid {
                message: URL_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn url_with_scheme_and_host_valid() {
        assert!(validate(InputKind::Url, "https://example.com/x").is_valid());
        assert!(validate(InputKind::Url, "http://shop.example.com").is_valid());
    }

    #[test]
    fn url_with_scheme_but_no_host_invalid() {
        assert!(!validate(InputKind::Url, "https://").is_valid());
        assert!(!validate(InputKind::Url, "mailto:someone@example.com").is_valid());
    }

    #[test]
    fn non_url_kinds_accept_any_non_blank_value() {
        assert!(validate(InputKind::Text, "great product, 30% off").is_valid());
        assert!(validate(InputKind::Analytics, "ctr: 2.4%").is_valid());
        assert!(validate(InputKind::File, "brand-guidelines.pdf").is_valid());
        assert!(validate(InputKind::ProductReference, "prod_8812").is_valid());
    }
}
