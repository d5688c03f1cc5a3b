//! The active theme: one resolved token snapshot per project.
//!
//! [`ThemeCell`] is the single writer for theme state. Loading a new token
//! document replaces the whole snapshot atomically; readers hold or receive
//! `Arc` snapshots and can never observe a half-updated store. A failed load
//! keeps the previous theme active.

use crate::resolver::{resolve, ResolvedTokenSet};
use crate::tokens::{TokenError, TokenStore};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the current [`ResolvedTokenSet`] and broadcasts replacements.
pub struct ThemeCell {
    resolved: Arc<ResolvedTokenSet>,
    tx: watch::Sender<Arc<ResolvedTokenSet>>,
}

impl ThemeCell {
    /// Creates the cell from an already-validated store.
    ///
    /// Returns the cell and a watch receiver; renderers poll the receiver
    /// for theme switches.
    pub fn new(store: &TokenStore) -> (Self, watch::Receiver<Arc<ResolvedTokenSet>>) {
        let resolved = Arc::new(resolve(store));
        let (tx, rx) = watch::channel(Arc::clone(&resolved));
        (Self { resolved, tx }, rx)
    }

    /// The current snapshot.
    pub fn current(&self) -> Arc<ResolvedTokenSet> {
        Arc::clone(&self.resolved)
    }

    /// Validates `document` and, on success, installs and broadcasts the new
    /// snapshot wholesale. On failure the previous theme stays active and
    /// nothing is broadcast.
    pub fn load_document(&mut self, document: &str) -> Result<(), TokenError> {
        let store = TokenStore::load(document)?;
        let resolved = Arc::new(resolve(&store));
        tracing::debug!(fingerprint = %resolved.fingerprint(), "theme replaced");
        self.resolved = Arc::clone(&resolved);
        let _ = self.tx.send(resolved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_replaces_snapshot_atomically() {
        let store = TokenStore::builtin().unwrap();
        let (mut cell, rx) = ThemeCell::new(&store);
        let before = cell.current();
        assert_eq!(before.color("primary").unwrap(), "#1f6feb");

        cell.load_document(r##"{"color": {"primary": "#112233"}}"##)
            .unwrap();
        let after = cell.current();
        assert_eq!(after.color("primary").unwrap(), "#112233");
        assert_eq!(rx.borrow().color("primary").unwrap(), "#112233");

        // The old snapshot held by a reader is untouched.
        assert_eq!(before.color("primary").unwrap(), "#1f6feb");
    }

    #[test]
    fn test_failed_load_keeps_previous_theme() {
        let store = TokenStore::builtin().unwrap();
        let (mut cell, rx) = ThemeCell::new(&store);

        let err = cell.load_document(r#"{"color": {}}"#).unwrap_err();
        assert!(matches!(err, TokenError::InvalidDocument { .. }));

        // Previous theme still active, nothing broadcast.
        assert_eq!(cell.current().color("primary").unwrap(), "#1f6feb");
        assert!(!rx.has_changed().unwrap());
    }
}
