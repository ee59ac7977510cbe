//! Canonical method identifiers.
//!
//! A [`MethodId`] collapses a `(package, service, method)` triple into one
//! comparable key:
//!
//! - `"{service}/{method}"` when the package is empty
//! - `"{package}.{service}/{method}"` otherwise
//!
//! Names are expected not to contain unescaped `.` or `/` of their own
//! beyond what a fully qualified service name carries; they are not
//! validated here.

use std::fmt;

use serde::Serialize;

/// Canonical key naming a `(package, service, method)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MethodId(String);

impl MethodId {
    /// Build the canonical identifier for a method.
    pub fn new(package: &str, service: &str, method: &str) -> Self {
        if package.is_empty() {
            Self(format!("{service}/{method}"))
        } else {
            Self(format!("{package}.{service}/{method}"))
        }
    }

    /// Get the canonical string form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MethodId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_without_package() {
        let id = MethodId::new("", "Greeter", "Hello");
        assert_eq!(id.as_str(), "Greeter/Hello");
        assert_eq!(id.to_string(), "Greeter/Hello");
    }

    #[test]
    fn test_with_package() {
        let id = MethodId::new("helloworld", "Greeter", "Hello");
        assert_eq!(id.as_str(), "helloworld.Greeter/Hello");
    }

    #[test]
    fn test_same_triple_same_key() {
        let a = MethodId::new("pkg", "Svc", "Call");
        let b = MethodId::new("pkg", "Svc", "Call");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_distinct_triples_distinct_keys() {
        let ids = [
            MethodId::new("", "Greeter", "Hello"),
            MethodId::new("", "Greeter", "Bye"),
            MethodId::new("", "Farewell", "Hello"),
            MethodId::new("pkg", "Greeter", "Hello"),
        ];
        let set: HashSet<_> = ids.iter().cloned().collect();
        assert_eq!(set.len(), ids.len());
    }

    #[test]
    fn test_qualified_service_matches_packaged_event() {
        // Descriptors carry the fully qualified service name.
        let registered = MethodId::new("", "helloworld.Greeter", "Hello");
        let requested = MethodId::new("helloworld", "Greeter", "Hello");
        assert_eq!(registered, requested);
    }

    #[test]
    fn test_serializes_as_string() {
        let id = MethodId::new("", "Greeter", "Hello");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""Greeter/Hello""#);
    }
}
