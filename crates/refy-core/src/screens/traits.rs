use async_trait::async_trait;

use crate::items::{Item, ItemId};
use crate::refresh::{ActivationOutcome, RefreshContext, RefreshController, RefreshState, Routine};
use crate::relationships::{
    AttachmentRequest, eligible_by_ids, merge_attachments, remove_attachment,
};
use crate::requests::RequestResult;

/// A screen that keeps its data fresh through the shared refresh loop.
pub trait Refreshable {
    fn controller(&self) -> &RefreshController;

    fn context(&self) -> RefreshContext;

    /// The fetch-and-publish step run every cycle.
    fn routine(&self) -> Routine;

    /// Called when the screen is shown, and again on every recomposition.
    fn activate(&self) -> ActivationOutcome {
        self.controller().refresh(self.context(), self.routine())
    }

    fn dialog_opened(&self) {
        self.controller().suspend();
    }

    fn dialog_closed(&self) {
        self.controller().resume();
    }

    /// Stop the loop when the screen goes away, unless another screen
    /// already took it over.
    fn deactivate(&self) {
        let controller = self.controller();
        if controller.state_of(&self.context()) != RefreshState::Stopped {
            controller.stop();
        }
    }
}

/// A screen whose `Host` items hold a list of `T` ids the user can edit.
#[async_trait]
pub trait Attachable<T>: Send + Sync
where
    T: Item + Clone + Send + Sync + 'static,
{
    type Host: Item + Send + Sync;

    /// The ids of `T` currently attached to `host`.
    fn attached_ids(host: &Self::Host) -> &[ItemId];

    /// Snapshot of the user's own `T` items.
    fn owned(&self) -> Vec<T>;

    /// Fetch the user's own `T` items if they were never loaded.
    async fn load_owned(&self) -> RequestResult<Vec<T>>;

    /// Replace the attachment list of `host` on the backend.
    async fn persist(&self, host: &Self::Host, ids: Vec<ItemId>) -> RequestResult<()>;

    fn candidates(&self, host: &Self::Host) -> Vec<T> {
        eligible_by_ids(&self.owned(), Self::attached_ids(host))
    }

    /// Everything the attach dialog needs, loading owned items first.
    async fn open_attach(&self, host: &Self::Host) -> RequestResult<AttachmentRequest<T>> {
        let owned = self.load_owned().await?;
        Ok(AttachmentRequest::new(&owned, Self::attached_ids(host)))
    }

    async fn attach(&self, host: &Self::Host, chosen: &[ItemId]) -> RequestResult<()> {
        let current = Self::attached_ids(host);
        let merged = merge_attachments(current, chosen);
        if merged.len() == current.len() {
            return Ok(());
        }
        self.persist(host, merged).await
    }

    async fn detach(&self, host: &Self::Host, removed: &ItemId) -> RequestResult<()> {
        let current = Self::attached_ids(host);
        let remaining = remove_attachment(current, removed);
        if remaining.len() == current.len() {
            return Ok(());
        }
        self.persist(host, remaining).await
    }
}

/// A screen that can delete (or leave) its items.
#[async_trait]
pub trait Deletable<T>: Send + Sync
where
    T: Item + Send + Sync,
{
    async fn delete(&self, item: &T) -> RequestResult<()>;
}
