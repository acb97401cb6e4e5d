//! # Resource Location Module
//!
//! Namespaced identifiers of the form `namespace:path`, used to name block
//! types in configuration and tooling.
//!
//! ## Format
//!
//! * namespace: `[a-z0-9_.-]+`
//! * path: `[a-z0-9_.-/]+`
//!
//! A string without a `:` is a bare path in the default namespace, so
//! `"grass"` and `"mc:grass"` name the same thing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{WorldError, WorldResult};

/// Namespace of every built-in identifier.
pub const DEFAULT_NAMESPACE: &str = "mc";

/// A validated `namespace:path` identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

impl ResourceLocation {
    /// Builds a location from its parts, rejecting empty parts and
    /// characters outside the allowed sets.
    pub fn new(namespace: &str, path: &str) -> WorldResult<Self> {
        if !Self::is_valid_namespace(namespace) {
            return Err(invalid(namespace, path, "namespace must match [a-z0-9_.-]+"));
        }
        if !Self::is_valid_path(path) {
            return Err(invalid(namespace, path, "path must match [a-z0-9/._-]+"));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// A location in the `mc` namespace.
    pub fn with_default_namespace(path: &str) -> WorldResult<Self> {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    /// A built-in id whose path is known to be valid.
    pub(crate) fn builtin(path: &'static str) -> Self {
        debug_assert!(Self::is_valid_path(path));
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: path.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_default_namespace(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE
    }

    /// The location with `/` and `:` flattened to `_`, safe to use as a file name.
    pub fn to_debug_file_name(&self) -> String {
        self.to_string().replace(['/', ':'], "_")
    }

    pub fn is_valid_namespace(value: &str) -> bool {
        !value.is_empty() && value.chars().all(Self::valid_namespace_char)
    }

    pub fn is_valid_path(value: &str) -> bool {
        !value.is_empty() && value.chars().all(Self::valid_path_char)
    }

    pub fn valid_namespace_char(c: char) -> bool {
        matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
    }

    pub fn valid_path_char(c: char) -> bool {
        Self::valid_namespace_char(c) || c == '/'
    }
}

fn invalid(namespace: &str, path: &str, reason: &str) -> WorldError {
    WorldError::InvalidResourceLocation {
        location: format!("{}:{}", namespace, path),
        reason: reason.to_string(),
    }
}

impl FromStr for ResourceLocation {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::with_default_namespace(s),
        }
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for ResourceLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_paths_use_the_default_namespace() {
        let location: ResourceLocation = "grass".parse().unwrap();
        assert_eq!(location.namespace(), "mc");
        assert_eq!(location.path(), "grass");
        assert!(location.is_default_namespace());
        assert_eq!(location, "mc:grass".parse().unwrap());
    }

    #[test]
    fn display_round_trips() {
        for text in ["mc:stone", "mods.extra:blocks/oak_log", "a-b:c.d"] {
            let location: ResourceLocation = text.parse().unwrap();
            assert_eq!(location.to_string(), text);
        }
    }

    #[test]
    fn invalid_characters_are_rejected() {
        for text in ["Grass", "mc:Stone", "my/ns:stone", "mc:sto ne", "mc:", ":stone", "mc:a:b"] {
            assert!(
                matches!(
                    text.parse::<ResourceLocation>(),
                    Err(WorldError::InvalidResourceLocation { .. })
                ),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn slashes_are_only_allowed_in_paths() {
        assert!(ResourceLocation::valid_path_char('/'));
        assert!(!ResourceLocation::valid_namespace_char('/'));
        assert!(ResourceLocation::new("mc", "blocks/glass").is_ok());
    }

    #[test]
    fn debug_file_name_flattens_separators() {
        let location = ResourceLocation::new("mc", "blocks/glass").unwrap();
        assert_eq!(location.to_debug_file_name(), "mc_blocks_glass");
    }

    #[test]
    fn serializes_as_a_string() {
        let location = ResourceLocation::new("mc", "plank").unwrap();
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, r#""mc:plank""#);
        let back: ResourceLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, location);
        assert!(serde_json::from_str::<ResourceLocation>(r#""MC:plank""#).is_err());
    }
}
