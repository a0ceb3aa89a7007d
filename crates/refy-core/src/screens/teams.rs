use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::items::{ItemId, Team, TeamDraft, TeamMember};
use crate::refresh::{RefreshContext, RefreshController, Routine};
use crate::requests::{RequestResult, Requester};
use crate::screens::ScreenServices;
use crate::screens::errors::ScreenError;
use crate::screens::traits::{Deletable, Refreshable};

pub const TEAMS_CONTEXT: RefreshContext = RefreshContext::from_static("teams");

/// The teams the user created or joined.
pub struct TeamsScreen<R: ?Sized> {
    services: ScreenServices<R>,
    teams: Arc<watch::Sender<Vec<Team>>>,
}

impl<R> TeamsScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    pub fn new(services: ScreenServices<R>) -> Self {
        let (teams, _) = watch::channel(Vec::new());
        Self {
            services,
            teams: Arc::new(teams),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Team>> {
        self.teams.subscribe()
    }

    pub fn teams(&self) -> Vec<Team> {
        self.teams.borrow().clone()
    }

    pub async fn create_team(&self, draft: &TeamDraft) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.create_team(draft))
            .await?;
        info!(event = "core.screen.team_created", title = %draft.title);
        Ok(())
    }

    pub async fn edit_team(&self, team: &ItemId, draft: &TeamDraft) -> Result<(), ScreenError> {
        draft.validate()?;
        self.services
            .fetch_once(self.services.requester.edit_team(team, draft))
            .await?;
        Ok(())
    }

    /// Users that can be invited while creating or editing a team.
    pub async fn potential_members(&self) -> RequestResult<Vec<TeamMember>> {
        self.services
            .fetch_once(self.services.requester.get_potential_members())
            .await
    }
}

impl<R> Refreshable for TeamsScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    fn controller(&self) -> &RefreshController {
        &self.services.controller
    }

    fn context(&self) -> RefreshContext {
        TEAMS_CONTEXT
    }

    fn routine(&self) -> Routine {
        let requester = Arc::clone(&self.services.requester);
        let session = Arc::clone(&self.services.session);
        let teams = Arc::clone(&self.teams);
        self.services.controller.fetch_routine(
            move || {
                let requester = Arc::clone(&requester);
                async move { requester.get_teams(false).await }
            },
            move |fetched: Vec<Team>| {
                if let Some(user) = session.user_id() {
                    let owned = fetched.iter().filter(|t| t.is_author(&user)).cloned();
                    session.set_teams(owned.collect());
                }
                teams.send_replace(fetched);
            },
        )
    }
}

/// Authors delete their team; everybody else leaves it.
#[async_trait]
impl<R> Deletable<Team> for TeamsScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    async fn delete(&self, team: &Team) -> RequestResult<()> {
        let is_author = self
            .services
            .session
            .user_id()
            .is_some_and(|user| team.is_author(&user));

        if is_author {
            self.services
                .fetch_once(self.services.requester.delete_team(&team.id))
                .await?;
            info!(event = "core.screen.team_deleted", team_id = %team.id);
        } else {
            self.services
                .fetch_once(self.services.requester.leave_team(&team.id))
                .await?;
            info!(event = "core.screen.team_left", team_id = %team.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::TeamRole;
    use crate::screens::testing::{FakeRequester, USER, member, services, settle, team};

    #[tokio::test(start_paused = true)]
    async fn test_author_deletes_member_leaves() {
        let requester = Arc::new(FakeRequester::default());
        let screen = TeamsScreen::new(services(&requester));

        screen.delete(&team("mine", USER, &[], vec![])).await.unwrap();
        assert_eq!(
            requester.last_call("delete_team"),
            Some(vec!["mine".to_string()])
        );

        let joined = team("theirs", "other", &[], vec![member(USER, TeamRole::Admin)]);
        screen.delete(&joined).await.unwrap();
        assert_eq!(
            requester.last_call("leave_team"),
            Some(vec!["theirs".to_string()])
        );
        assert_eq!(requester.calls_to("delete_team"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_routine_caches_authored_teams() {
        let requester = Arc::new(FakeRequester::default());
        requester.set_teams(vec![
            team("mine", USER, &[], vec![]),
            team("theirs", "other", &[], vec![member(USER, TeamRole::Viewer)]),
        ]);
        let screen = TeamsScreen::new(services(&requester));

        screen.activate();
        settle().await;

        assert_eq!(screen.teams().len(), 2);
        let owned = screen.services.session.teams();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, ItemId::from("mine"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_team_title() {
        let requester = Arc::new(FakeRequester::default());
        let screen = TeamsScreen::new(services(&requester));
        let draft = TeamDraft {
            title: String::new(),
            description: "A team".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            screen.create_team(&draft).await,
            Err(ScreenError::Validation(_))
        ));
    }
}
