use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::items::{Collection, CollectionDraft, ItemId, Link, Team};
use crate::refresh::{RefreshContext, RefreshController, Routine};
use crate::requests::{RequestResult, Requester};
use crate::screens::ScreenServices;
use crate::screens::errors::ScreenError;
use crate::screens::traits::{Attachable, Deletable, Refreshable};

pub const COLLECTIONS_CONTEXT: RefreshContext = RefreshContext::from_static("collections");

pub struct CollectionsScreen<R: ?Sized> {
    services: ScreenServices<R>,
    collections: Arc<watch::Sender<Vec<Collection>>>,
}

impl<R> CollectionsScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    pub fn new(services: ScreenServices<R>) -> Self {
        let (collections, _) = watch::channel(Vec::new());
        Self {
            services,
            collections: Arc::new(collections),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Collection>> {
        self.collections.subscribe()
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.collections.borrow().clone()
    }

    pub async fn create_collection(&self, draft: &CollectionDraft) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.create_collection(draft))
            .await?;
        info!(event = "core.screen.collection_created", title = %draft.title);
        Ok(())
    }

    pub async fn edit_collection(
        &self,
        collection: &ItemId,
        draft: &CollectionDraft,
    ) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.edit_collection(collection, draft))
            .await?;
        Ok(())
    }
}

impl<R> Refreshable for CollectionsScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    fn controller(&self) -> &RefreshController {
        &self.services.controller
    }

    fn context(&self) -> RefreshContext {
        COLLECTIONS_CONTEXT
    }

    fn routine(&self) -> Routine {
        let requester = Arc::clone(&self.services.requester);
        let session = Arc::clone(&self.services.session);
        let collections = Arc::clone(&self.collections);
        self.services.controller.fetch_routine(
            move || {
                let requester = Arc::clone(&requester);
                async move { requester.get_collections(false).await }
            },
            move |fetched: Vec<Collection>| {
                if let Some(user) = session.user_id() {
                    let owned = fetched.iter().filter(|c| c.owner == user).cloned();
                    session.set_collections(owned.collect());
                }
                collections.send_replace(fetched);
            },
        )
    }
}

#[async_trait]
impl<R> Attachable<Link> for CollectionsScreen<R>
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
impl<R> Attachable<Team> for CollectionsScreen<R>
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

#[async_trait]
impl<R> Deletable<Collection> for CollectionsScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    async fn delete(&self, collection: &Collection) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.delete_collection(&collection.id))
            .await?;
        info!(event = "core.screen.collection_deleted", collection_id = %collection.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ValidationError;
    use crate::refresh::RefreshState;
    use crate::requests::RequestError;
    use crate::screens::links::LinksScreen;
    use crate::screens::testing::{FakeRequester, INTERVAL, collection, link, services, settle};
    use tokio::time::advance;

    fn draft(color: &str) -> CollectionDraft {
        CollectionDraft {
            title: "Reading".to_string(),
            description: "Things to read".to_string(),
            color: color.to_string(),
            link_ids: vec![],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_color_is_rejected() {
        let requester = Arc::new(FakeRequester::default());
        let screen = CollectionsScreen::new(services(&requester));

        let err = screen.create_collection(&draft("blue")).await.unwrap_err();
        assert!(matches!(
            err,
            ScreenError::Validation(ValidationError::InvalidColor { .. })
        ));
        assert_eq!(requester.calls_to("create_collection"), 0);

        screen.create_collection(&draft("#0044FF")).await.unwrap();
        assert_eq!(requester.calls_to("create_collection"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_candidates_come_from_owned_links() {
        let requester = Arc::new(FakeRequester::default());
        let screen = CollectionsScreen::new(services(&requester));
        screen.services.session.set_links(vec![
            link("l1", &[], &[]),
            link("l2", &[], &[]),
            link("l1", &[], &[]),
        ]);
        let host = collection("c1", &["l2"], &[]);

        let candidates = Attachable::<Link>::candidates(&screen, &host);
        let ids: Vec<&str> = candidates.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["l1"]);

        Attachable::<Link>::attach(&screen, &host, &[ItemId::from("l1")])
            .await
            .unwrap();
        assert_eq!(
            requester.last_call("manage_collection_links"),
            Some(vec!["c1".to_string(), "l2".to_string(), "l1".to_string()])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_screens_stops_previous_loop() {
        let requester = Arc::new(FakeRequester::default());
        requester.set_collections(vec![collection("c1", &[], &[])]);
        let services = services(&requester);
        let links = LinksScreen::new(services.clone());
        let collections = CollectionsScreen::new(services.clone());

        links.activate();
        settle().await;
        collections.activate();
        settle().await;
        assert_eq!(
            services.controller.state_of(&links.context()),
            RefreshState::Stopped
        );

        advance(INTERVAL).await;
        settle().await;
        assert_eq!(requester.calls_to("get_links"), 1);
        assert_eq!(requester.calls_to("get_collections"), 2);
        assert_eq!(collections.collections().len(), 1);

        // Leaving the links screen late must not stop the collections loop.
        links.deactivate();
        assert_eq!(services.controller.state(), RefreshState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_until_next_success() {
        let requester = Arc::new(FakeRequester::default());
        let screen = CollectionsScreen::new(services(&requester));
        requester.fail_with(RequestError::connection("connection refused"));

        screen.activate();
        settle().await;
        assert!(screen.services.status().is_server_offline());
        assert!(screen.collections().is_empty());

        requester.recover();
        advance(INTERVAL).await;
        settle().await;
        assert!(!screen.services.status().is_server_offline());
        assert_eq!(screen.controller().state(), RefreshState::Running);
    }
}
