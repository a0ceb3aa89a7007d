use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::items::{Collection, ItemId, Link, Team};
use crate::refresh::{RefreshContext, RefreshController, Routine};
use crate::requests::{RequestResult, Requester};
use crate::screens::ScreenServices;
use crate::screens::traits::{Attachable, Refreshable};

/// Detail view of a single collection.
///
/// Seeded with the collection the user opened, then kept current by the
/// refresh loop.
pub struct CollectionScreen<R: ?Sized> {
    services: ScreenServices<R>,
    collection: Arc<watch::Sender<Collection>>,
}

impl<R> CollectionScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    pub fn new(services: ScreenServices<R>, initial: Collection) -> Self {
        let (collection, _) = watch::channel(initial);
        Self {
            services,
            collection: Arc::new(collection),
        }
    }

    pub fn collection_id(&self) -> ItemId {
        self.collection.borrow().id.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Collection> {
        self.collection.subscribe()
    }

    pub fn collection(&self) -> Collection {
        self.collection.borrow().clone()
    }

    /// Take `link` out of the collection shown. The link itself is kept.
    pub async fn remove_link(&self, link: &ItemId) -> RequestResult<()> {
        let current = self.collection();
        Attachable::<Link>::detach(self, &current, link).await?;
        info!(
            event = "core.screen.collection_link_removed",
            collection_id = %current.id,
            link_id = %link
        );
        Ok(())
    }
}

impl<R> Refreshable for CollectionScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    fn controller(&self) -> &RefreshController {
        &self.services.controller
    }

    fn context(&self) -> RefreshContext {
        RefreshContext::new(format!("collection:{}", self.collection_id()))
    }

    fn routine(&self) -> Routine {
        let requester = Arc::clone(&self.services.requester);
        let collection_id = self.collection_id();
        let collection = Arc::clone(&self.collection);
        self.services.controller.fetch_routine(
            move || {
                let requester = Arc::clone(&requester);
                let collection_id = collection_id.clone();
                async move { requester.get_collection(&collection_id).await }
            },
            move |fetched: Collection| {
                collection.send_replace(fetched);
            },
        )
    }
}

#[async_trait]
impl<R> Attachable<Link> for CollectionScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    type Host = Collection;

    fn attached_ids(host: &Collection) -> &[ItemId] {
        &host.link_ids
    }

    fn owned(&self) -> Vec<Link> {
        self.services.session.links()
    }

    async fn load_owned(&self) -> RequestResult<Vec<Link>> {
        let services = &self.services;
        services
            .fetch_once(
                services
                    .session
                    .load_owned_links(services.requester.as_ref(), false),
            )
            .await
    }

    async fn persist(&self, host: &Collection, ids: Vec<ItemId>) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.manage_collection_links(&host.id, &ids))
            .await
    }
}

#[async_trait]
impl<R> Attachable<Team> for CollectionScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    type Host = Collection;

    fn attached_ids(host: &Collection) -> &[ItemId] {
        &host.team_ids
    }

    fn owned(&self) -> Vec<Team> {
        self.services.session.teams()
    }

    async fn load_owned(&self) -> RequestResult<Vec<Team>> {
        let services = &self.services;
        services
            .fetch_once(
                services
                    .session
                    .load_owned_teams(services.requester.as_ref(), false),
            )
            .await
    }

    async fn persist(&self, host: &Collection, ids: Vec<ItemId>) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.manage_collection_teams(&host.id, &ids))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::RefreshState;
    use crate::requests::RequestError;
    use crate::screens::collections::CollectionsScreen;
    use crate::screens::testing::{FakeRequester, INTERVAL, collection, services, settle};
    use tokio::time::advance;

    fn setup() -> (Arc<FakeRequester>, CollectionScreen<FakeRequester>) {
        let requester = Arc::new(FakeRequester::default());
        requester.set_collections(vec![collection("c1", &["l1", "l2"], &["t1"])]);
        let screen = CollectionScreen::new(services(&requester), collection("c1", &[], &[]));
        (requester, screen)
    }

    #[tokio::test(start_paused = true)]
    async fn test_collection_is_published_each_cycle() {
        let (requester, screen) = setup();
        assert!(screen.collection().link_ids.is_empty());

        screen.activate();
        settle().await;
        assert_eq!(
            screen.collection().link_ids,
            vec![ItemId::from("l1"), ItemId::from("l2")]
        );
        assert_eq!(
            requester.last_call("get_collection"),
            Some(vec!["c1".to_string()])
        );

        advance(INTERVAL).await;
        settle().await;
        assert_eq!(requester.calls_to("get_collection"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_link_keeps_the_others() {
        let (requester, screen) = setup();
        screen.activate();
        settle().await;

        screen.remove_link(&ItemId::from("l1")).await.unwrap();
        assert_eq!(
            requester.last_call("manage_collection_links"),
            Some(vec!["c1".to_string(), "l2".to_string()])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_removing_unattached_link_sends_nothing() {
        let (requester, screen) = setup();
        screen.activate();
        settle().await;

        screen.remove_link(&ItemId::from("l9")).await.unwrap();
        assert_eq!(requester.calls_to("manage_collection_links"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_team_from_collection() {
        let (requester, screen) = setup();
        let host = collection("c1", &["l1"], &["t1", "t2"]);

        Attachable::<Team>::detach(&screen, &host, &ItemId::from("t1"))
            .await
            .unwrap();
        assert_eq!(
            requester.last_call("manage_collection_teams"),
            Some(vec!["c1".to_string(), "t2".to_string()])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_opening_collection_stops_list_loop() {
        let (requester, screen) = setup();
        let list = CollectionsScreen::new(screen.services.clone());

        list.activate();
        settle().await;
        assert_eq!(requester.calls_to("get_collections"), 1);

        screen.activate();
        settle().await;
        assert_eq!(list.controller().state_of(&list.context()), RefreshState::Stopped);
        assert_eq!(
            screen.controller().state_of(&screen.context()),
            RefreshState::Running
        );

        advance(INTERVAL).await;
        settle().await;
        assert_eq!(requester.calls_to("get_collections"), 1);
        assert_eq!(requester.calls_to("get_collection"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_last_collection() {
        let (requester, screen) = setup();
        screen.activate();
        settle().await;

        requester.fail_with(RequestError::request("Collection not found"));
        advance(INTERVAL).await;
        settle().await;
        assert_eq!(screen.collection().link_ids.len(), 2);
        assert!(screen.services.status().snapshot().notice.is_some());
    }
}
