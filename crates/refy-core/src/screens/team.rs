use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::items::{Collection, ItemId, Link, Team, TeamMember, TeamRole};
use crate::refresh::{RefreshContext, RefreshController, Routine};
use crate::requests::{RequestResult, Requester};
use crate::screens::ScreenServices;
use crate::screens::errors::ScreenError;
use crate::screens::traits::{Attachable, Refreshable};

/// Detail view of a single team: its links, collections and members.
pub struct TeamScreen<R: ?Sized> {
    services: ScreenServices<R>,
    team_id: ItemId,
    team: Arc<watch::Sender<Option<Team>>>,
}

impl<R> TeamScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    pub fn new(services: ScreenServices<R>, team_id: ItemId) -> Self {
        let (team, _) = watch::channel(None);
        Self {
            services,
            team_id,
            team: Arc::new(team),
        }
    }

    pub fn team_id(&self) -> &ItemId {
        &self.team_id
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Team>> {
        self.team.subscribe()
    }

    /// Last published state of the team, `None` until the first cycle lands.
    pub fn team(&self) -> Option<Team> {
        self.team.borrow().clone()
    }

    /// Whether the signed-in user may manage members and attachments.
    pub fn can_manage(&self, team: &Team) -> bool {
        self.services
            .session
            .user_id()
            .is_some_and(|user| team.is_admin(&user))
    }

    fn require_admin(&self, team: &Team, action: &str) -> Result<(), ScreenError> {
        if self.can_manage(team) {
            Ok(())
        } else {
            Err(ScreenError::NotPermitted {
                action: action.to_string(),
            })
        }
    }

    pub async fn change_member_role(
        &self,
        team: &Team,
        member: &TeamMember,
        role: TeamRole,
    ) -> Result<(), ScreenError> {
        self.require_admin(team, "change member roles")?;
        if member.role == role {
            return Ok(());
        }
        self.services
            .fetch_once(
                self.services
                    .requester
                    .change_member_role(&team.id, &member.id, role),
            )
            .await?;
        info!(
            event = "core.screen.member_role_changed",
            team_id = %team.id,
            member_id = %member.id,
            role = ?role
        );
        Ok(())
    }

    /// The author cannot be removed; admins may remove anybody else.
    pub async fn remove_member(&self, team: &Team, member: &ItemId) -> Result<(), ScreenError> {
        self.require_admin(team, "remove members")?;
        if team.is_author(member) {
            return Err(ScreenError::NotPermitted {
                action: "remove the team author".to_string(),
            });
        }
        self.services
            .fetch_once(self.services.requester.remove_member(&team.id, member))
            .await?;
        info!(
            event = "core.screen.member_removed",
            team_id = %team.id,
            member_id = %member
        );
        Ok(())
    }

    /// Leave the team and stop polling it.
    pub async fn leave(&self) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.leave_team(&self.team_id))
            .await?;
        self.deactivate();
        info!(event = "core.screen.team_left", team_id = %self.team_id);
        Ok(())
    }
}

impl<R> Refreshable for TeamScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    fn controller(&self) -> &RefreshController {
        &self.services.controller
    }

    fn context(&self) -> RefreshContext {
        RefreshContext::new(format!("team:{}", self.team_id))
    }

    fn routine(&self) -> Routine {
        let requester = Arc::clone(&self.services.requester);
        let team_id = self.team_id.clone();
        let team = Arc::clone(&self.team);
        self.services.controller.fetch_routine(
            move || {
                let requester = Arc::clone(&requester);
                let team_id = team_id.clone();
                async move { requester.get_team(&team_id).await }
            },
            move |fetched: Team| {
                team.send_replace(Some(fetched));
            },
        )
    }
}

#[async_trait]
impl<R> Attachable<Link> for TeamScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    type Host = Team;

    fn attached_ids(host: &Team) -> &[ItemId] {
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

    async fn persist(&self, host: &Team, ids: Vec<ItemId>) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.manage_team_links(&host.id, &ids))
            .await
    }
}

#[async_trait]
impl<R> Attachable<Collection> for TeamScreen<R>
where
    R: Requester + ?Sized + 'static,
{
    type Host = Team;

    fn attached_ids(host: &Team) -> &[ItemId] {
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

    async fn persist(&self, host: &Team, ids: Vec<ItemId>) -> RequestResult<()> {
        self.services
            .fetch_once(self.services.requester.manage_team_collections(&host.id, &ids))
            .await
    }
}
