//! Which items can be attached to which containers.
//!
//! Links belong to collections and teams, collections belong to teams, and
//! each side keeps an id list. The "attach" dialogs are driven by an
//! [`AttachmentRequest`]: the candidates the user may pick, and the ids picked
//! so far.

pub mod operations;

pub use operations::{
    eligible_by_ids, eligible_for_attachment, merge_attachments, remove_attachment,
};

use crate::items::{Item, ItemId};

/// Candidates for an attach dialog plus the user's current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentRequest<T> {
    candidates: Vec<T>,
    chosen: Vec<ItemId>,
}

impl<T> AttachmentRequest<T>
where
    T: Item + Clone,
{
    /// Build the request for a container whose current attachments are `attached_ids`.
    pub fn new(owned: &[T], attached_ids: &[ItemId]) -> Self {
        Self {
            candidates: eligible_by_ids(owned, attached_ids),
            chosen: Vec::new(),
        }
    }

    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    pub fn chosen(&self) -> &[ItemId] {
        &self.chosen
    }

    /// True when there is nothing left to attach; the UI hides the affordance.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Select or unselect a candidate. Ids that are not candidates are ignored.
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if let Some(pos) = self.chosen.iter().position(|c| c == id) {
            self.chosen.remove(pos);
            return false;
        }
        if self.candidates.iter().any(|c| c.id() == id) {
            self.chosen.push(id.clone());
            return true;
        }
        false
    }

    /// The attachment list to persist for the container.
    pub fn apply(&self, current: &[ItemId]) -> Vec<ItemId> {
        merge_attachments(current, &self.chosen)
    }
}
