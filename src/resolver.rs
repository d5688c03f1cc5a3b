//! Resolution of a validated [`TokenStore`] into consumable style values.
//!
//! Resolution is a pure projection: it cannot fail, it is deterministic, and
//! resolving the same store twice yields identical output. The resolved set
//! offers two views over the same data — typed group accessors for components
//! that build style objects directly, and a flat `--dc-<group>-<name>`
//! variable map for environments that inject styling through CSS variables.
//! Both views agree on values by construction.

use crate::tokens::{TokenError, TokenGroup, TokenStore};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Projects a store into a [`ResolvedTokenSet`]. Infallible by design: the
/// store already validated, and resolution is not a second validation pass.
pub fn resolve(store: &TokenStore) -> ResolvedTokenSet {
    ResolvedTokenSet {
        groups: store.groups().clone(),
        fingerprint: store.fingerprint().to_string(),
    }
}

/// An immutable snapshot of resolved style values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTokenSet {
    groups: BTreeMap<TokenGroup, BTreeMap<String, String>>,
    fingerprint: String,
}

impl ResolvedTokenSet {
    /// Looks up a token value. Fails with `UnknownToken` rather than
    /// substituting a default.
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

    pub fn color(&self, name: &str) -> Result<&str, TokenError> {
        self.get(TokenGroup::Color, name)
    }

    pub fn spacing(&self, name: &str) -> Result<&str, TokenError> {
        self.get(TokenGroup::Spacing, name)
    }

    pub fn typography(&self, name: &str) -> Result<&str, TokenError> {
        self.get(TokenGroup::Typography, name)
    }

    pub fn radius(&self, name: &str) -> Result<&str, TokenError> {
        self.get(TokenGroup::Radius, name)
    }

    pub fn shadow(&self, name: &str) -> Result<&str, TokenError> {
        self.get(TokenGroup::Shadow, name)
    }

    /// The CSS variable name for a token: `--dc-<group>-<name>`.
    ///
    /// External styling layers rely on this exact naming contract.
    pub fn variable_name(group: TokenGroup, name: &str) -> String {
        format!("--dc-{}-{}", group, name)
    }

    /// The full namespaced variable map. Values are carried over from the
    /// source document unmodified.
    pub fn to_variables(&self) -> BTreeMap<String, String> {
        let mut variables = BTreeMap::new();
        for (group, entries) in &self.groups {
            for (name, value) in entries {
                variables.insert(Self::variable_name(*group, name), value.clone());
            }
        }
        variables
    }

    /// Renders the variable map as a `:root { ... }` rule. Output is sorted
    /// and byte-stable for a given store.
    pub fn css_block(&self) -> String {
        let mut out = String::from(":root {\n");
        for (name, value) in self.to_variables() {
            let _ = writeln!(out, "  {}: {};", name, value);
        }
        out.push_str("}\n");
        out
    }

    /// Fingerprint of the store this set was resolved from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn builtin_resolved() -> ResolvedTokenSet {
        resolve(&TokenStore::builtin().unwrap())
    }

    #[test]
    fn test_typed_accessors() {
        let resolved = builtin_resolved();
        assert_eq!(resolved.color("primary").unwrap(), "#1f6feb");
        assert_eq!(resolved.spacing("lg").unwrap(), "24px");
        assert_eq!(resolved.radius("md").unwrap(), "12px");
        assert_eq!(
            resolved.shadow("soft").unwrap(),
            "0 10px 25px rgba(15, 23, 42, 0.1)"
        );
        assert_eq!(resolved.typography("font_size_md").unwrap(), "1rem");
    }

    #[test]
    fn test_variables_carry_exact_values() {
        let store = TokenStore::builtin().unwrap();
        let variables = resolve(&store).to_variables();
        for (group, entries) in store.groups() {
            for (name, value) in entries {
                let key = ResolvedTokenSet::variable_name(*group, name);
                assert_eq!(variables.get(&key), Some(value), "missing {}", key);
            }
        }
        assert_eq!(variables.len(), store.token_count());
    }

    #[test]
    fn test_variable_naming_contract() {
        let resolved = builtin_resolved();
        let variables = resolved.to_variables();
        assert_eq!(
            variables.get("--dc-color-primary").map(String::as_str),
            Some("#1f6feb")
        );
        assert_eq!(
            variables.get("--dc-spacing-sm").map(String::as_str),
            Some("8px")
        );
        assert!(variables.keys().all(|k| k.starts_with("--dc-")));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let store = TokenStore::builtin().unwrap();
        let first = resolve(&store);
        let second = resolve(&store);
        assert_eq!(first, second);
        assert_eq!(first.to_variables(), second.to_variables());
        assert_eq!(first.css_block(), second.css_block());
    }

    #[test]
    fn test_both_views_agree() {
        let resolved = builtin_resolved();
        let variables = resolved.to_variables();
        assert_eq!(
            variables.get("--dc-color-danger").map(String::as_str),
            resolved.color("danger").ok()
        );
    }

    #[test]
    fn test_css_block_shape() {
        let store = TokenStore::load(r##"{"color": {"primary": "#1f6feb"}}"##).unwrap();
        let css = resolve(&store).css_block();
        assert_eq!(css, ":root {\n  --dc-color-primary: #1f6feb;\n}\n");
    }

    #[test]
    fn test_unknown_token_surfaces() {
        let resolved = builtin_resolved();
        assert!(resolved.color("does_not_exist").is_err());
    }

    proptest! {
        /// Loading and resolving any valid single-group document twice
        /// yields identical variable sets.
        #[test]
        fn prop_resolution_idempotent(
            entries in proptest::collection::btree_map("[a-z_]{1,12}", "[#a-z0-9 ]{1,16}", 1..8)
        ) {
            let store = TokenStore::from_entries(
                entries
                    .iter()
                    .map(|(name, value)| (TokenGroup::Color, name.clone(), value.clone())),
            )
            .unwrap();
            let reloaded = TokenStore::from_entries(
                entries
                    .iter()
                    .map(|(name, value)| (TokenGroup::Color, name.clone(), value.clone())),
            )
            .unwrap();
            prop_assert_eq!(store.fingerprint(), reloaded.fingerprint());
            prop_assert_eq!(resolve(&store).to_variables(), resolve(&reloaded).to_variables());
        }
    }
}
