use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::items::{Collection, ItemId, Link, LinkDraft, Team};
use crate::refresh::{RefreshContext, RefreshController, Routine};
use crate::requests::{RequestResult, Requester};
use crate::screens::ScreenServices;
use crate::screens::errors::ScreenError;
use crate::screens::traits::{Attachable, Deletable, Refreshable};

pub const LINKS_CONTEXT: RefreshContext = RefreshContext::from_static("links");

/// Every link the user can see, own or shared through a team.
pub struct LinksScreen<R: ?Sized> {
    services: ScreenServices<R>,
    links: Arc<watch::Sender<Vec<Link>>>,
}

impl<R> LinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    pub fn new(services: ScreenServices<R>) -> Self {
        let (links, _) = watch::channel(Vec::new());
        Self {
            services,
            links: Arc::new(links),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Link>> {
        self.links.subscribe()
    }

    pub fn links(&self) -> Vec<Link> {
        self.links.borrow().clone()
    }

    pub async fn create_link(&self, draft: &LinkDraft) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.create_link(draft))
            .await?;
        info!(event = "core.screen.link_created", reference = %draft.reference_link);
        Ok(())
    }

    pub async fn edit_link(&self, link: &ItemId, draft: &LinkDraft) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.edit_link(link, draft))
            .await?;
        Ok(())
    }
}

impl<R> Refreshable for LinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    fn controller(&self) -> &RefreshController {
        &self.services.controller
    }

    fn context(&self) -> RefreshContext {
        LINKS_CONTEXT
    }

    fn routine(&self) -> Routine {
        let requester = Arc::clone(&self.services.requester);
        let session = Arc::clone(&self.services.session);
        let links = Arc::clone(&self.links);
        self.services.controller.fetch_routine(
            move || {
                let requester = Arc::clone(&requester);
                async move { requester.get_links(false).await }
            },
            move |fetched: Vec<Link>| {
                if let Some(user) = session.user_id() {
                    let owned = fetched.iter().filter(|l| l.owner == user).cloned();
                    session.set_links(owned.collect());
                }
                links.send_replace(fetched);
            },
        )
    }
}

#[async_trait]
impl<R> Attachable<Collection> for LinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    type Host = Link;

    fn attached_ids(host: &Link) -> &[ItemId] {
        &host.collection_ids
    }

    fn owned(&self) -> Vec<Collection> {
        self.services.session.collections()
    }

    async fn load_owned(&self) -> RequestResult<Vec<Collection>> {
        let services = &self.services;
        services
            .fetch_once(
                services
                    .session
                    .load_owned_collections(services.requester.as_ref(), false),
            )
            .await
    }

    async fn persist(&self, host: &Link, ids: Vec<ItemId>) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.manage_link_collections(&host.id, &ids))
            .await
    }
}

#[async_trait]
impl<R> Attachable<Team> for LinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    type Host = Link;

    fn attached_ids(host: &Link) -> &[ItemId] {
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

    async fn persist(&self, host: &Link, ids: Vec<ItemId>) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.manage_link_teams(&host.id, &ids))
            .await
    }
}

#[async_trait]
impl<R> Deletable<Link> for LinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    async fn delete(&self, link: &Link) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.delete_link(&link.id))
            .await?;
        info!(event = "core.screen.link_deleted", link_id = %link.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ValidationError;
    use crate::refresh::{ActivationOutcome, RefreshState};
    use crate::requests::RequestError;
    use crate::screens::testing::{
        FakeRequester, collection, foreign_link, link, services, settle,
    };

    #[tokio::test(start_paused = true)]
    async fn test_activation_publishes_links_and_caches_owned() {
        let requester = Arc::new(FakeRequester::default());
        requester.set_links(vec![link("l1", &[], &[]), foreign_link("l2")]);
        let screen = LinksScreen::new(services(&requester));
        let mut rx = screen.subscribe();

        assert_eq!(screen.activate(), ActivationOutcome::Activated);
        settle().await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);
        let owned = screen.services.session.links();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, ItemId::from("l1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_collection_candidates_exclude_attached() {
        let requester = Arc::new(FakeRequester::default());
        let screen = LinksScreen::new(services(&requester));
        screen.services.session.set_collections(vec![
            collection("c1", &[], &[]),
            collection("c2", &[], &[]),
            collection("c3", &[], &[]),
        ]);
        let host = link("l1", &["c2"], &[]);

        let candidates = Attachable::<Collection>::candidates(&screen, &host);
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c1", "c3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_attach_loads_owned_collections_once() {
        let requester = Arc::new(FakeRequester::default());
        requester.set_collections(vec![collection("c1", &[], &[]), collection("c2", &[], &[])]);
        let screen = LinksScreen::new(services(&requester));
        let host = link("l1", &["c1"], &[]);

        let request = Attachable::<Collection>::open_attach(&screen, &host)
            .await
            .unwrap();
        assert_eq!(request.candidates().len(), 1);

        Attachable::<Collection>::open_attach(&screen, &host)
            .await
            .unwrap();
        assert_eq!(requester.calls_to("get_collections"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_sends_merged_list() {
        let requester = Arc::new(FakeRequester::default());
        let screen = LinksScreen::new(services(&requester));
        let host = link("l1", &["c1"], &[]);

        Attachable::<Collection>::attach(
            &screen,
            &host,
            &[ItemId::from("c2"), ItemId::from("c1")],
        )
        .await
        .unwrap();

        assert_eq!(
            requester.last_call("manage_link_collections"),
            Some(vec!["l1".to_string(), "c1".to_string(), "c2".to_string()])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_nothing_new_skips_request() {
        let requester = Arc::new(FakeRequester::default());
        let screen = LinksScreen::new(services(&requester));
        let host = link("l1", &[], &["t1"]);

        Attachable::<Team>::attach(&screen, &host, &[ItemId::from("t1")])
            .await
            .unwrap();
        Attachable::<Team>::detach(&screen, &host, &ItemId::from("t9"))
            .await
            .unwrap();
        assert_eq!(requester.calls_to("manage_link_teams"), 0);

        Attachable::<Team>::detach(&screen, &host, &ItemId::from("t1"))
            .await
            .unwrap();
        assert_eq!(
            requester.last_call("manage_link_teams"),
            Some(vec!["l1".to_string()])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_draft_is_not_sent() {
        let requester = Arc::new(FakeRequester::default());
        let screen = LinksScreen::new(services(&requester));
        let draft = LinkDraft {
            reference_link: "not a link".to_string(),
            description: "desc".to_string(),
        };

        let err = screen.create_link(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            ScreenError::Validation(ValidationError::InvalidLinkReference { .. })
        ));
        assert_eq!(requester.calls_to("create_link"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_delete_raises_notice() {
        let requester = Arc::new(FakeRequester::default());
        let screen = LinksScreen::new(services(&requester));
        requester.fail_with(RequestError::request("Link is in use"));

        let result = screen.delete(&link("l1", &[], &[])).await;
        assert!(result.is_err());
        assert_eq!(
            screen.services.status().snapshot().notice.as_deref(),
            Some("Link is in use")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dialog_suspends_loop() {
        let requester = Arc::new(FakeRequester::default());
        let screen = LinksScreen::new(services(&requester));
        screen.activate();
        settle().await;

        screen.dialog_opened();
        assert_eq!(screen.controller().state(), RefreshState::Suspended);
        screen.dialog_closed();
        assert_eq!(screen.controller().state(), RefreshState::Running);

        screen.deactivate();
        assert_eq!(screen.controller().state(), RefreshState::Stopped);
    }
}
