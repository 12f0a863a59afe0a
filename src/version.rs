use std::fmt;
use std::str::FromStr;

use crate::error::{AppshipError, Result};

/// Marketing version as shown to end users (e.g. "2.3.1").
///
/// Ordering is lexicographic over (major, minor, patch), each compared as an
/// integer. The derived `Ord` gives exactly that law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from a dot-separated string (e.g. "1.2.3").
    ///
    /// Requires exactly three numeric components; anything else is an error,
    /// never a silently-defaulted value.
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(AppshipError::version(format!(
                "'{}' - expected X.Y.Z",
                text
            )));
        }

        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| AppshipError::version(format!("invalid major component: {}", parts[0])))?;
        let minor = parts[1]
            .parse::<u32>()
            .map_err(|_| AppshipError::version(format!("invalid minor component: {}", parts[1])))?;
        let patch = parts[2]
            .parse::<u32>()
            .map_err(|_| AppshipError::version(format!("invalid patch component: {}", parts[2])))?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = AppshipError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("a.2.3").is_err());
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1.2.x").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["0.0.0", "1.2.3", "10.20.30", "2.0.1"] {
            let v = Version::parse(s).unwrap();
            assert_eq!(v.to_string(), s);
            assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(Version::new(2, 0, 0) > Version::new(1, 9, 9));
        assert!(Version::new(1, 3, 0) > Version::new(1, 2, 9));
        assert!(Version::new(1, 2, 4) > Version::new(1, 2, 3));
        assert_eq!(Version::new(1, 2, 3), Version::new(1, 2, 3));
    }

    #[test]
    fn test_minor_comparison_not_shadowed_by_major() {
        // Same major, differing minor must decide the comparison.
        assert_eq!(
            Version::new(1, 1, 0).cmp(&Version::new(1, 2, 0)),
            Ordering::Less
        );
        assert_eq!(
            Version::new(1, 2, 0).cmp(&Version::new(1, 1, 5)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_ordering_is_total_and_transitive() {
        let versions = [
            Version::new(0, 0, 1),
            Version::new(0, 1, 0),
            Version::new(1, 0, 0),
            Version::new(1, 0, 1),
            Version::new(1, 1, 0),
            Version::new(2, 0, 0),
        ];

        for a in &versions {
            for b in &versions {
                // Exactly one of <, ==, > holds
                let cmps = [a < b, a == b, a > b];
                assert_eq!(cmps.iter().filter(|&&c| c).count(), 1);

                for c in &versions {
                    if a < b && b < c {
                        assert!(a < c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_from_str() {
        let v: Version = "3.1.4".parse().unwrap();
        assert_eq!(v, Version::new(3, 1, 4));
    }
}
