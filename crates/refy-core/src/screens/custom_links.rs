use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::items::{CustomLink, CustomLinkDraft, ItemId};
use crate::refresh::{RefreshContext, RefreshController, Routine};
use crate::requests::{RequestResult, Requester};
use crate::screens::ScreenServices;
use crate::screens::errors::ScreenError;
use crate::screens::traits::{Deletable, Refreshable};

pub const CUSTOM_LINKS_CONTEXT: RefreshContext = RefreshContext::from_static("custom_links");

pub struct CustomLinksScreen<R: ?Sized> {
    services: ScreenServices<R>,
    custom_links: Arc<watch::Sender<Vec<CustomLink>>>,
}

impl<R> CustomLinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    pub fn new(services: ScreenServices<R>) -> Self {
        let (custom_links, _) = watch::channel(Vec::new());
        Self {
            services,
            custom_links: Arc::new(custom_links),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<CustomLink>> {
        self.custom_links.subscribe()
    }

    pub fn custom_links(&self) -> Vec<CustomLink> {
        self.custom_links.borrow().clone()
    }

    /// Published links that are still reachable at `now`.
    pub fn active_links(&self, now: DateTime<Utc>) -> Vec<CustomLink> {
        self.custom_links
            .borrow()
            .iter()
            .filter(|link| !link.is_expired(now))
            .cloned()
            .collect()
    }

    /// Fresh copy of one custom link, for its detail view.
    pub async fn custom_link(&self, link: &ItemId) -> RequestResult<CustomLink> {
        self.services
            .fetch_once(self.services.requester.get_custom_link(link))
            .await
    }

    pub async fn create_custom_link(&self, draft: &CustomLinkDraft) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.create_custom_link(draft))
            .await?;
        info!(event = "core.screen.custom_link_created", title = %draft.title);
        Ok(())
    }

    pub async fn edit_custom_link(
        &self,
        link: &ItemId,
        draft: &CustomLinkDraft,
    ) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.edit_custom_link(link, draft))
            .await?;
        Ok(())
    }
}

impl<R> Refreshable for CustomLinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    fn controller(&self) -> &RefreshController {
        &self.services.controller
    }

    fn context(&self) -> RefreshContext {
        CUSTOM_LINKS_CONTEXT
    }

    fn routine(&self) -> Routine {
        let requester = Arc::clone(&self.services.requester);
        let session = Arc::clone(&self.services.session);
        let custom_links = Arc::clone(&self.custom_links);
        self.services.controller.fetch_routine(
            move || {
                let requester = Arc::clone(&requester);
                async move { requester.get_custom_links().await }
            },
            move |fetched: Vec<CustomLink>| {
                session.set_custom_links(fetched.clone());
                custom_links.send_replace(fetched);
            },
        )
    }
}

#[async_trait]
impl<R> Deletable<CustomLink> for CustomLinksScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    async fn delete(&self, link: &CustomLink) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.delete_custom_link(&link.id))
            .await?;
        info!(event = "core.screen.custom_link_deleted", link_id = %link.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ExpiredTime, ValidationError};
    use crate::screens::testing::{FakeRequester, custom_link, services, settle};
    use chrono::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_publishes_and_filters_expired() {
        let requester = Arc::new(FakeRequester::default());
        let now = Utc::now();
        let mut expired = custom_link("old");
        expired.expired_time = ExpiredTime::OneHour;
        expired.creation_date = now - Duration::hours(2);
        requester.set_custom_links(vec![custom_link("fresh"), expired]);

        let screen = CustomLinksScreen::new(services(&requester));
        screen.activate();
        settle().await;

        assert_eq!(screen.custom_links().len(), 2);
        let active = screen.active_links(now);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, ItemId::from("fresh"));
        assert_eq!(screen.services.session.custom_links().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_link_without_resources_is_rejected() {
        let requester = Arc::new(FakeRequester::default());
        let screen = CustomLinksScreen::new(services(&requester));
        let draft = CustomLinkDraft {
            title: "Onboarding".to_string(),
            description: "Docs for newcomers".to_string(),
            ..Default::default()
        };

        let err = screen.create_custom_link(&draft).await.unwrap_err();
        assert_eq!(err, ScreenError::Validation(ValidationError::MissingResources));
        assert_eq!(requester.calls_to("create_custom_link"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_and_delete() {
        let requester = Arc::new(FakeRequester::default());
        requester.set_custom_links(vec![custom_link("c1")]);
        let screen = CustomLinksScreen::new(services(&requester));

        let link = screen.custom_link(&ItemId::from("c1")).await.unwrap();
        screen.delete(&link).await.unwrap();
        assert_eq!(
            requester.last_call("delete_custom_link"),
            Some(vec!["c1".to_string()])
        );

        let missing = screen.custom_link(&ItemId::from("nope")).await;
        assert!(missing.is_err());
        assert!(screen.services.status().snapshot().notice.is_some());
    }
}
