//! Token document loading and validation.
//!
//! A token document is a JSON object whose top-level keys are the five token
//! groups (color, spacing, typography, radius, shadow) and whose values are
//! flat name -> value maps. `TokenStore::load` is the only place a document
//! enters the system; everything downstream works with an already-validated
//! store and never substitutes defaults for missing tokens.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// The default token document bundled with the binary.
pub const DEFAULT_TOKEN_DOCUMENT: &str = include_str!("../assets/design_tokens.json");

/// The closed set of token groups a document may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenGroup {
    Color,
    Spacing,
    Typography,
    Radius,
    Shadow,
}

impl TokenGroup {
    /// All groups, in canonical order.
    pub const ALL: [TokenGroup; 5] = [
        TokenGroup::Color,
        TokenGroup::Spacing,
        TokenGroup::Typography,
        TokenGroup::Radius,
        TokenGroup::Shadow,
    ];

    /// The group name as it appears in documents and CSS variable names.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenGroup::Color => "color",
            TokenGroup::Spacing => "spacing",
            TokenGroup::Typography => "typography",
            TokenGroup::Radius => "radius",
            TokenGroup::Shadow => "shadow",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        TokenGroup::ALL.into_iter().find(|g| g.as_str() == key)
    }
}

impl fmt::Display for TokenGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while loading a document or looking up a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The document is malformed: unparseable JSON, an unknown group, a
    /// non-string value, an empty group, or a duplicate `(group, name)` pair.
    InvalidDocument { reason: String },
    /// A consumer referenced a token that is not in the store.
    UnknownToken { group: TokenGroup, name: String },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDocument { reason } => write!(f, "invalid token document: {}", reason),
            Self::UnknownToken { group, name } => write!(f, "unknown token: {}.{}", group, name),
        }
    }
}

impl std::error::Error for TokenError {}

/// Immutable, fully-validated `group -> (name -> value)` mapping.
///
/// Created once from a document and never mutated; a theme switch replaces
/// the whole store (see [`crate::theme::ThemeCell`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    groups: BTreeMap<TokenGroup, BTreeMap<String, String>>,
    fingerprint: String,
}

impl TokenStore {
    /// Loads and validates a JSON token document.
    pub fn load(document: &str) -> Result<Self, TokenError> {
        let parsed: TokenDocument =
            serde_json::from_str(document).map_err(|e| TokenError::InvalidDocument {
                reason: e.to_string(),
            })?;
        Self::from_groups(parsed.0)
    }

    /// Loads the bundled default document.
    pub fn builtin() -> Result<Self, TokenError> {
        Self::load(DEFAULT_TOKEN_DOCUMENT)
    }

    /// Builds a store from individual `(group, name, value)` entries,
    /// rejecting duplicate `(group, name)` pairs.
    pub fn from_entries<I>(entries: I) -> Result<Self, TokenError>
    where
        I: IntoIterator<Item = (TokenGroup, String, String)>,
    {
        let mut groups: BTreeMap<TokenGroup, BTreeMap<String, String>> = BTreeMap::new();
        for (group, name, value) in entries {
            if groups.entry(group).or_default().insert(name.clone(), value).is_some() {
                return Err(TokenError::InvalidDocument {
                    reason: format!("duplicate token `{}.{}`", group, name),
                });
            }
        }
        Self::from_groups(groups)
    }

    fn from_groups(
        groups: BTreeMap<TokenGroup, BTreeMap<String, String>>,
    ) -> Result<Self, TokenError> {
        for (group, entries) in &groups {
            if entries.is_empty() {
                return Err(TokenError::InvalidDocument {
                    reason: format!("token group `{}` is empty", group),
                });
            }
        }
        let fingerprint = fingerprint_of(&groups);
        Ok(Self { groups, fingerprint })
    }

    /// Looks up a single token. Never substitutes a default.
    pub fn get(&self, group: TokenGroup, name: &str) -> Result<&str, TokenError> {
        self.groups
            .get(&group)
            .and_then(|entries| entries.get(name))
            .map(String::as_str)
            .ok_or_else(|| TokenError::UnknownToken {
                group,
                name: name.to_string(),
            })
    }

    /// The validated `group -> (name -> value)` mapping.
    pub fn groups(&self) -> &BTreeMap<TokenGroup, BTreeMap<String, String>> {
        &self.groups
    }

    /// Total number of tokens across all groups.
    pub fn token_count(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    /// SHA-256 over the canonicalized document content. Equal documents
    /// produce equal fingerprints across repeated loads.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint_of(groups: &BTreeMap<TokenGroup, BTreeMap<String, String>>) -> String {
    // BTreeMap iteration is sorted, so the serialized form is canonical.
    let canonical = serde_json::to_string(groups).unwrap_or_default();
    let digest = Sha256::digest(canonical.as_bytes());
    format!("{:x}", digest)
}

/// Raw document shape. Deserialization streams map entries so duplicate keys
/// (which an ordinary map-based parse would silently collapse) are rejected.
struct TokenDocument(BTreeMap<TokenGroup, BTreeMap<String, String>>);

impl<'de> Deserialize<'de> for TokenDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = TokenDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of token groups")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = BTreeMap::new();
                while let Some(key) = map.next_key::<String>()? {
                    let group = TokenGroup::from_key(&key).ok_or_else(|| {
                        de::Error::custom(format!("unknown token group `{}`", key))
                    })?;
                    let entries: GroupEntries = map.next_value()?;
                    if groups.insert(group, entries.0).is_some() {
                        return Err(de::Error::custom(format!(
                            "duplicate token group `{}`",
                            key
                        )));
                    }
                }
                Ok(TokenDocument(groups))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct GroupEntries(BTreeMap<String, String>);

impl<'de> Deserialize<'de> for GroupEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = GroupEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of token names to string values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = BTreeMap::new();
                while let Some((name, value)) = map.next_entry::<String, String>()? {
                    if entries.insert(name.clone(), value).is_some() {
                        return Err(de::Error::custom(format!("duplicate token `{}`", name)));
                    }
                }
                Ok(GroupEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
