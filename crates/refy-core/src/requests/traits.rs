use async_trait::async_trait;

use crate::items::{
    Collection, CollectionDraft, CustomLink, CustomLinkDraft, ItemId, Link, LinkDraft, Team,
    TeamDraft, TeamMember, TeamRole,
};
use crate::requests::errors::RequestResult;

/// Backend operations on plain links.
#[async_trait]
pub trait LinkRequests: Send + Sync {
    async fn get_links(&self, owned_only: bool) -> RequestResult<Vec<Link>>;

    async fn create_link(&self, draft: &LinkDraft) -> RequestResult<()>;

    async fn edit_link(&self, link: &ItemId, draft: &LinkDraft) -> RequestResult<()>;

    async fn delete_link(&self, link: &ItemId) -> RequestResult<()>;

    /// Replace the collections the link belongs to.
    async fn manage_link_collections(
        &self,
        link: &ItemId,
        collections: &[ItemId],
    ) -> RequestResult<()>;

    /// Replace the teams the link is shared with.
    async fn manage_link_teams(&self, link: &ItemId, teams: &[ItemId]) -> RequestResult<()>;
}

/// Backend operations on custom links.
#[async_trait]
pub trait CustomLinkRequests: Send + Sync {
    async fn get_custom_links(&self) -> RequestResult<Vec<CustomLink>>;

    async fn get_custom_link(&self, link: &ItemId) -> RequestResult<CustomLink>;

    async fn create_custom_link(&self, draft: &CustomLinkDraft) -> RequestResult<()>;

    async fn edit_custom_link(
        &self,
        link: &ItemId,
        draft: &CustomLinkDraft,
    ) -> RequestResult<()>;

    async fn delete_custom_link(&self, link: &ItemId) -> RequestResult<()>;
}

/// Backend operations on collections.
#[async_trait]
pub trait CollectionRequests: Send + Sync {
    async fn get_collections(&self, owned_only: bool) -> RequestResult<Vec<Collection>>;

    async fn get_collection(&self, collection: &ItemId) -> RequestResult<Collection>;

    async fn create_collection(&self, draft: &CollectionDraft) -> RequestResult<()>;

    async fn edit_collection(
        &self,
        collection: &ItemId,
        draft: &CollectionDraft,
    ) -> RequestResult<()>;

    async fn delete_collection(&self, collection: &ItemId) -> RequestResult<()>;

    async fn manage_collection_links(
        &self,
        collection: &ItemId,
        links: &[ItemId],
    ) -> RequestResult<()>;

    async fn manage_collection_teams(
        &self,
        collection: &ItemId,
        teams: &[ItemId],
    ) -> RequestResult<()>;
}

/// Backend operations on teams and their members.
#[async_trait]
pub trait TeamRequests: Send + Sync {
    async fn get_teams(&self, owned_only: bool) -> RequestResult<Vec<Team>>;

    async fn get_team(&self, team: &ItemId) -> RequestResult<Team>;

    async fn create_team(&self, draft: &TeamDraft) -> RequestResult<()>;

    async fn edit_team(&self, team: &ItemId, draft: &TeamDraft) -> RequestResult<()>;

    async fn delete_team(&self, team: &ItemId) -> RequestResult<()>;

    async fn leave_team(&self, team: &ItemId) -> RequestResult<()>;

    async fn manage_team_links(&self, team: &ItemId, links: &[ItemId]) -> RequestResult<()>;

    async fn manage_team_collections(
        &self,
        team: &ItemId,
        collections: &[ItemId],
    ) -> RequestResult<()>;

    async fn change_member_role(
        &self,
        team: &ItemId,
        member: &ItemId,
        role: TeamRole,
    ) -> RequestResult<()>;

    async fn remove_member(&self, team: &ItemId, member: &ItemId) -> RequestResult<()>;

    /// Users that can be invited into a team.
    async fn get_potential_members(&self) -> RequestResult<Vec<TeamMember>>;
}

/// Everything the client can ask the backend.
pub trait Requester: LinkRequests + CustomLinkRequests + CollectionRequests + TeamRequests {}

impl<T> Requester for T where
    T: LinkRequests + CustomLinkRequests + CollectionRequests + TeamRequests
{
}
