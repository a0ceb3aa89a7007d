//! Screen controllers.
//!
//! Each controller composes the [`Refreshable`], [`Attachable`] and
//! [`Deletable`] capabilities over the same injected [`ScreenServices`],
//! and publishes what the UI renders through `watch` channels.

pub mod collection;
pub mod collections;
pub mod custom_links;
pub mod errors;
pub mod links;
pub mod team;
pub mod teams;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::refresh::RefreshController;
use crate::requests::{ConnectionStatus, RequestResult};
use crate::session::SessionCache;

pub use collection::CollectionScreen;
pub use collections::{COLLECTIONS_CONTEXT, CollectionsScreen};
pub use custom_links::{CUSTOM_LINKS_CONTEXT, CustomLinksScreen};
pub use errors::ScreenError;
pub use links::{LINKS_CONTEXT, LinksScreen};
pub use team::TeamScreen;
pub use teams::{TEAMS_CONTEXT, TeamsScreen};
pub use traits::{Attachable, Deletable, Refreshable};

/// What every screen is built from. Cloning shares the same instances.
pub struct ScreenServices<R: ?Sized> {
    pub requester: Arc<R>,
    pub session: Arc<SessionCache>,
    pub controller: RefreshController,
}

impl<R: ?Sized> Clone for ScreenServices<R> {
    fn clone(&self) -> Self {
        Self {
            requester: Arc::clone(&self.requester),
            session: Arc::clone(&self.session),
            controller: self.controller.clone(),
        }
    }
}

impl<R: ?Sized> ScreenServices<R> {
    pub fn new(
        requester: Arc<R>,
        session: Arc<SessionCache>,
        controller: RefreshController,
    ) -> Self {
        Self {
            requester,
            session,
            controller,
        }
    }

    pub fn status(&self) -> &ConnectionStatus {
        self.controller.status()
    }

    /// One request outside the polling loop, recorded in the connection status.
    pub async fn fetch_once<T, Fut>(&self, request: Fut) -> RequestResult<T>
    where
        Fut: Future<Output = RequestResult<T>>,
    {
        self.controller.fetch_once(request).await
    }
}
