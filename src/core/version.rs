//! Toolkit version values.
//!
//! LLVM gates its C ABI at the major.minor level: `3.4.0` and `3.4.2`
//! export the same symbols. `Version` therefore orders, compares, and
//! hashes on `(major, minor)` only. The patch component is still carried
//! because library filenames and display strings want all three fields.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

/// Error parsing a dotted version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The input did not have two or three dot-separated components.
    #[error("expected 2 or 3 dot-separated components in `{text}`, found {count}")]
    ComponentCount { text: String, count: usize },

    /// A component was not an unsigned integer.
    #[error("`{component}` in `{text}` is not an unsigned integer")]
    BadComponent { text: String, component: String },
}

/// A toolkit version such as `3.4` or `3.4.2`.
///
/// All comparison traits use the `(major, minor)` pair exclusively, so
/// `3.4.1` and `3.4.9` are equal wherever a `Version` is compared or used
/// as a map key.
#[derive(Debug, Clone, Copy)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse `X.Y` or `X.Y.Z`. A missing patch component defaults to 0.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(VersionError::ComponentCount {
                text: text.to_string(),
                count: parts.len(),
            });
        }

        let mut components = [0u32; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| VersionError::BadComponent {
                text: text.to_string(),
                component: part.to_string(),
            })?;
        }

        Ok(Version::new(components[0], components[1], components[2]))
    }

    /// The pair every comparison is defined over.
    pub const fn key(self) -> (u32, u32) {
        (self.major, self.minor)
    }

    /// Substitute `{major}`, `{minor}`, and `{patch}` into a filename
    /// pattern such as `libLLVM-{major}.{minor}.so.1`.
    pub fn substitute(self, pattern: &str) -> String {
        pattern
            .replace("{major}", &self.major.to_string())
            .replace("{minor}", &self.minor.to_string())
            .replace("{patch}", &self.patch.to_string())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// The comparison impls are written by hand so that Eq, Ord, and Hash all
// agree on the (major, minor) key. Deriving them would drag `patch` in.

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialEq<(u32, u32)> for Version {
    fn eq(&self, other: &(u32, u32)) -> bool {
        self.key() == *other
    }
}

impl PartialOrd<(u32, u32)> for Version {
    fn partial_cmp(&self, other: &(u32, u32)) -> Option<Ordering> {
        Some(self.key().cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_components() {
        let v = Version::parse("3.4").unwrap();
        assert_eq!(v.major, 3);
        assert_eq!(v.minor, 4);
        assert_eq!(v.patch, 0);
    }

    #[test]
    fn test_parse_three_components() {
        let v = Version::parse("3.4.2").unwrap();
        assert_eq!(v.patch, 2);
    }

    #[test]
    fn test_parse_rejects_wrong_component_count() {
        assert!(matches!(
            Version::parse("3"),
            Err(VersionError::ComponentCount { count: 1, .. })
        ));
        assert!(matches!(
            Version::parse("3.4.5.6"),
            Err(VersionError::ComponentCount { count: 4, .. })
        ));
        assert!(matches!(
            Version::parse(""),
            Err(VersionError::ComponentCount { count: 1, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_integer_component() {
        let err = Version::parse("3.x").unwrap_err();
        assert!(matches!(err, VersionError::BadComponent { .. }));
        assert!(err.to_string().contains("3.x"));

        assert!(Version::parse("3.").is_err());
        assert!(Version::parse("-3.4").is_err());
    }

    #[test]
    fn test_patch_never_participates_in_ordering() {
        let a = Version::parse("3.4.1").unwrap();
        let b = Version::parse("3.4.99").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert!(a <= b && a >= b);

        let c = Version::parse("3.4").unwrap();
        let d = Version::parse("3.4.0").unwrap();
        assert_eq!(c, d);
        assert_eq!(c.patch, 0);
        assert_eq!(d.patch, 0);
    }

    #[test]
    fn test_ordering_is_lexicographic_on_major_minor() {
        let v31 = Version::new(3, 1, 0);
        let v34 = Version::new(3, 4, 9);
        let v35 = Version::new(3, 5, 0);
        let v210 = Version::new(2, 10, 0);

        assert!(v31 < v34);
        assert!(v34 < v35);
        assert!(v210 < v31);
        assert!(v35 > v31);
    }

    #[test]
    fn test_compare_against_tuple_literal() {
        let v = Version::parse("3.4.2").unwrap();
        assert!(v == (3, 4));
        assert!(v >= (3, 2));
        assert!(v < (3, 5));
        assert!(v > (2, 9));
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Version::parse("3.4.1").unwrap());
        assert!(set.contains(&Version::parse("3.4.7").unwrap()));
        assert!(!set.contains(&Version::parse("3.5.1").unwrap()));
    }

    #[test]
    fn test_substitute_fields() {
        let v = Version::new(3, 4, 2);
        assert_eq!(
            v.substitute("libLLVM-{major}.{minor}.so.1"),
            "libLLVM-3.4.so.1"
        );
        assert_eq!(v.substitute("{major}.{minor}.{patch}"), "3.4.2");
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::parse("3.4").unwrap().to_string(), "3.4.0");
        assert_eq!(Version::new(3, 5, 1).to_string(), "3.5.1");
    }
}
