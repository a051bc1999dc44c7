use std::fmt;

use crate::error::{ReleaseError, Result};

/// Semantic version as stored in the project manifest.
///
/// Three non-negative integers, no pre-release or build metadata. The derived
/// ordering compares major, then minor, then patch.
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

    /// Parse a version string (e.g., "1.2.3" -> Version(1,2,3)).
    ///
    /// Accepts an optional leading 'v' or 'V' so tag-style input works.
    /// Anything other than exactly three dot-separated numbers is rejected,
    /// including pre-release suffixes like "1.2.3-rc1".
    pub fn parse(input: &str) -> Result<Self> {
        let re = regex::Regex::new(r"^[vV]?(\d+)\.(\d+)\.(\d+)$")
            .map_err(|e| ReleaseError::version(format!("Invalid version pattern: {}", e)))?;

        let caps = re.captures(input.trim()).ok_or_else(|| {
            ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                input
            ))
        })?;

        let major = caps[1]
            .parse::<u32>()
            .map_err(|_| ReleaseError::version(format!("Invalid major version: {}", &caps[1])))?;
        let minor = caps[2]
            .parse::<u32>()
            .map_err(|_| ReleaseError::version(format!("Invalid minor version: {}", &caps[2])))?;
        let patch = caps[3]
            .parse::<u32>()
            .map_err(|_| ReleaseError::version(format!("Invalid patch version: {}", &caps[3])))?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// The next patch version, used as the default prompt suggestion
    pub fn next_patch(&self) -> Self {
        Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch + 1,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_with_v_prefix() {
        assert_eq!(Version::parse("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(Version::parse("V0.1.0").unwrap(), Version::new(0, 1, 0));
    }

    #[test]
    fn test_version_parse_trims_whitespace() {
        assert_eq!(Version::parse(" 1.2.3\n").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("1.2.x").is_err());
        assert!(Version::parse("1.2.3-rc1").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1, 2, 3) > Version::new(1, 2, 2));
        assert!(!(Version::new(1, 2, 3) > Version::new(1, 2, 3)));
        assert!(Version::new(1, 10, 0) > Version::new(1, 9, 9));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
    }

    #[test]
    fn test_version_next_patch() {
        assert_eq!(Version::new(1, 2, 3).next_patch(), Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_display() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.to_string(), "1.2.3");
    }
}
