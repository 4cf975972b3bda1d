//! Staged enable/disable changes.
//!
//! The host edits pending copies of the enabled and available lists, then
//! either applies them (persist, commit, reload) or discards them. Until
//! [`Registry::apply`] succeeds the committed lists, and so the resolver, are
//! untouched.

use super::core::Registry;
use super::error::RegistryResult;
use crate::package::PackageStatus;

/// One of the two pending lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingSet {
    Enabled,
    Available,
}

impl PendingSet {
    /// Status a package takes when committed into this list.
    pub fn status(&self) -> PackageStatus {
        match self {
            PendingSet::Enabled => PackageStatus::Enabled,
            PendingSet::Available => PackageStatus::Available,
        }
    }
}

/// Receives the "reload content" signal after a successful apply.
pub trait ReloadHandler {
    fn reload_content(&self);
}

impl<F: Fn()> ReloadHandler for F {
    fn reload_content(&self) {
        self()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PendingEdit {
    enabled: Vec<String>,
    available: Vec<String>,
}

impl PendingEdit {
    fn list_mut(&mut self, set: PendingSet) -> &mut Vec<String> {
        match set {
            PendingSet::Enabled => &mut self.enabled,
            PendingSet::Available => &mut self.available,
        }
    }

    fn list(&self, set: PendingSet) -> &[String] {
        match set {
            PendingSet::Enabled => &self.enabled,
            PendingSet::Available => &self.available,
        }
    }
}

impl Registry {
    /// Start an edit by copying the committed lists into the pending lists.
    ///
    /// An edit already in progress is replaced.
    pub fn begin_edit(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("Restarting package edit, previous pending changes dropped");
        }
        self.pending = Some(PendingEdit {
            enabled: self.enabled.clone(),
            available: self.available.clone(),
        });
    }

    /// Whether an edit is in progress.
    pub fn is_editing(&self) -> bool {
        self.pending.is_some()
    }

    /// Pending list contents, or `None` outside an edit.
    pub fn pending(&self, set: PendingSet) -> Option<&[String]> {
        self.pending.as_ref().map(|edit| edit.list(set))
    }

    /// Move `id` from one pending list to the end of the other.
    ///
    /// Returns `false`, changing nothing, outside an edit, when `from` and
    /// `to` are the same list, or when `id` is not in `from`.
    pub fn move_package(&mut self, id: &str, from: PendingSet, to: PendingSet) -> bool {
        if from == to {
            return false;
        }
        let Some(edit) = self.pending.as_mut() else {
            tracing::debug!(package = id, "move_package called outside an edit");
            return false;
        };

        let source = edit.list_mut(from);
        let Some(index) = source.iter().position(|entry| entry == id) else {
            tracing::debug!(package = id, from = ?from, "Package not in pending list");
            return false;
        };
        let id = source.remove(index);
        edit.list_mut(to).push(id);
        true
    }

    /// Persist the pending lists, commit them, then signal a reload.
    ///
    /// The pending state is written before anything is committed: when the
    /// write fails the error is returned, the committed state is unchanged,
    /// the edit stays open and `handler` is not called. Outside an edit this
    /// does nothing.
    pub fn apply(&mut self, handler: &dyn ReloadHandler) -> RegistryResult<()> {
        let Some(edit) = self.pending.take() else {
            tracing::debug!("apply called outside an edit");
            return Ok(());
        };

        let prospective = self.persisted_view(&edit.enabled, &edit.available);
        if let Err(e) = self.store().save(&prospective) {
            tracing::warn!(error = %e, "Failed to persist package changes");
            self.pending = Some(edit);
            return Err(e);
        }

        for (set, ids) in [
            (PendingSet::Enabled, &edit.enabled),
            (PendingSet::Available, &edit.available),
        ] {
            for id in ids {
                if let Some(package) = self.package_mut(id) {
                    package.status = set.status();
                }
            }
        }
        self.enabled = edit.enabled;
        self.available = edit.available;

        tracing::info!(
            enabled = self.enabled.len(),
            available = self.available.len(),
            "Package changes applied"
        );
        handler.reload_content();
        Ok(())
    }

    /// Drop the pending lists without persisting anything.
    pub fn discard(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Pending package changes discarded");
        }
    }
}
