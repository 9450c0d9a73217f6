//! Version string parsing

use thiserror::Error;

use crate::version::{Identifier, Version};

/// Errors produced while parsing a version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,

    #[error("invalid numeric component {component:?} in version {input:?}")]
    InvalidComponent { input: String, component: String },

    #[error("version {0:?} has more than three numeric components")]
    TooManyComponents(String),

    #[error("invalid identifier {identifier:?} in version {input:?}")]
    InvalidIdentifier { input: String, identifier: String },
}

/// Parse `[v]MAJOR[.MINOR[.PATCH]][-PRE][+BUILD]`.
pub(crate) fn parse(input: &str) -> Result<Version, VersionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(VersionError::Empty);
    }

    let body = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if body.is_empty() {
        return Err(VersionError::Empty);
    }

    let (body, build) = match body.split_once('+') {
        Some((head, meta)) => (head, parse_build(input, meta)?),
        None => (body, Vec::new()),
    };

    let (core, pre) = match body.split_once('-') {
        Some((head, pre)) => (head, parse_pre(input, pre)?),
        None => (body, Vec::new()),
    };

    let mut numbers = Vec::with_capacity(3);
    for component in core.split('.') {
        if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionError::InvalidComponent {
                input: input.to_string(),
                component: component.to_string(),
            });
        }
        let value = component
            .parse::<u64>()
            .map_err(|_| VersionError::InvalidComponent {
                input: input.to_string(),
                component: component.to_string(),
            })?;
        numbers.push(value);
    }
    if numbers.len() > 3 {
        return Err(VersionError::TooManyComponents(input.to_string()));
    }

    let parts = numbers.len() as u8;
    let major = numbers[0];
    let minor = numbers.get(1).copied().unwrap_or(0);
    let patch = numbers.get(2).copied().unwrap_or(0);

    Ok(Version::from_parts(major, minor, patch, pre, build, parts))
}

fn parse_pre(input: &str, raw: &str) -> Result<Vec<Identifier>, VersionError> {
    raw.split('.')
        .map(|identifier| {
            if identifier.is_empty() || !is_identifier(identifier) {
                return Err(VersionError::InvalidIdentifier {
                    input: input.to_string(),
                    identifier: identifier.to_string(),
                });
            }
            if identifier.bytes().all(|b| b.is_ascii_digit()) {
                // Numeric identifiers compare numerically per semver.
                Ok(identifier
                    .parse::<u64>()
                    .map(Identifier::Numeric)
                    .unwrap_or_else(|_| Identifier::Text(identifier.to_string())))
            } else {
                Ok(Identifier::Text(identifier.to_string()))
            }
        })
        .collect()
}

fn parse_build(input: &str, raw: &str) -> Result<Vec<String>, VersionError> {
    raw.split('.')
        .map(|identifier| {
            if identifier.is_empty() || !is_identifier(identifier) {
                Err(VersionError::InvalidIdentifier {
                    input: input.to_string(),
                    identifier: identifier.to_string(),
                })
            } else {
                Ok(identifier.to_string())
            }
        })
        .collect()
}

fn is_identifier(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let v = parse("1.2.3").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 2, 3));
    }

    #[test]
    fn test_parse_short_forms() {
        let v = parse("1.2").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 2, 0));

        let v = parse("7").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (7, 0, 0));
    }

    #[test]
    fn test_parse_v_prefix() {
        assert_eq!(parse("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse("V0.9.0").unwrap(), Version::new(0, 9, 0));
    }

    #[test]
    fn test_parse_pre_and_build() {
        let v = parse("1.2.3-alpha.1+exp.sha.5114f85").unwrap();
        assert!(v.is_prerelease());
        assert_eq!(v.to_string(), "1.2.3-alpha.1+exp.sha.5114f85");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(VersionError::Empty));
        assert_eq!(parse("  "), Err(VersionError::Empty));
        assert!(matches!(
            parse("1.2.x"),
            Err(VersionError::InvalidComponent { .. })
        ));
        assert!(matches!(
            parse("1.2.3.4"),
            Err(VersionError::TooManyComponents(_))
        ));
        assert!(matches!(
            parse("1.0.0-"),
            Err(VersionError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            parse("1.0.0-al_pha"),
            Err(VersionError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(parse(" 1.0.0 ").unwrap(), Version::new(1, 0, 0));
    }
}
