//! In-memory requester and fixtures shared by the screen and session tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::items::{
    Collection, CollectionDraft, CustomLink, CustomLinkDraft, ExpiredTime, ItemId, Link,
    LinkDraft, Team, TeamDraft, TeamMember, TeamRole,
};
use crate::refresh::RefreshController;
use crate::requests::{
    CollectionRequests, ConnectionStatus, CustomLinkRequests, LinkRequests, RequestError,
    RequestResult, TeamRequests,
};
use crate::screens::ScreenServices;
use crate::session::SessionCache;
use crate::session::types::test_credentials;

pub(crate) const USER: &str = "user-1";
pub(crate) const INTERVAL: Duration = Duration::from_secs(1);

#[derive(Default)]
struct FakeState {
    links: Vec<Link>,
    custom_links: Vec<CustomLink>,
    collections: Vec<Collection>,
    teams: Vec<Team>,
    potential_members: Vec<TeamMember>,
    failure: Option<RequestError>,
    calls: Vec<(&'static str, Vec<String>)>,
}

/// Serves canned lists and records every call with its arguments.
#[derive(Default)]
pub(crate) struct FakeRequester {
    state: Mutex<FakeState>,
}

impl FakeRequester {
    pub(crate) fn set_links(&self, links: Vec<Link>) {
        self.state.lock().unwrap().links = links;
    }

    pub(crate) fn set_custom_links(&self, custom_links: Vec<CustomLink>) {
        self.state.lock().unwrap().custom_links = custom_links;
    }

    pub(crate) fn set_collections(&self, collections: Vec<Collection>) {
        self.state.lock().unwrap().collections = collections;
    }

    pub(crate) fn set_teams(&self, teams: Vec<Team>) {
        self.state.lock().unwrap().teams = teams;
    }

    /// Every following call fails with `error`.
    pub(crate) fn fail_with(&self, error: RequestError) {
        self.state.lock().unwrap().failure = Some(error);
    }

    pub(crate) fn recover(&self) {
        self.state.lock().unwrap().failure = None;
    }

    pub(crate) fn calls_to(&self, name: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(call, _)| *call == name)
            .count()
    }

    pub(crate) fn last_call(&self, name: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find(|(call, _)| *call == name)
            .map(|(_, args)| args.clone())
    }

    fn record(&self, name: &'static str, args: Vec<String>) -> RequestResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((name, args));
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn list<T: Clone>(
        &self,
        name: &'static str,
        pick: impl Fn(&FakeState) -> &Vec<T>,
    ) -> RequestResult<Vec<T>> {
        self.record(name, vec![])?;
        Ok(pick(&self.state.lock().unwrap()).clone())
    }
}

fn args(ids: &[ItemId]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn with_list(id: &ItemId, list: &[ItemId]) -> Vec<String> {
    let mut all = vec![id.to_string()];
    all.extend(args(list));
    all
}

fn not_found(id: &ItemId) -> RequestError {
    RequestError::request(format!("'{id}' not found"))
}

#[async_trait]
impl LinkRequests for FakeRequester {
    async fn get_links(&self, _owned_only: bool) -> RequestResult<Vec<Link>> {
        self.list("get_links", |s| &s.links)
    }

    async fn create_link(&self, draft: &LinkDraft) -> RequestResult<()> {
        self.record("create_link", vec![draft.reference_link.clone()])
    }

    async fn edit_link(&self, link: &ItemId, draft: &LinkDraft) -> RequestResult<()> {
        self.record(
            "edit_link",
            vec![link.to_string(), draft.reference_link.clone()],
        )
    }

    async fn delete_link(&self, link: &ItemId) -> RequestResult<()> {
        self.record("delete_link", vec![link.to_string()])
    }

    async fn manage_link_collections(
        &self,
        link: &ItemId,
        collections: &[ItemId],
    ) -> RequestResult<()> {
        self.record("manage_link_collections", with_list(link, collections))
    }

    async fn manage_link_teams(&self, link: &ItemId, teams: &[ItemId]) -> RequestResult<()> {
        self.record("manage_link_teams", with_list(link, teams))
    }
}

#[async_trait]
impl CustomLinkRequests for FakeRequester {
    async fn get_custom_links(&self) -> RequestResult<Vec<CustomLink>> {
        self.list("get_custom_links", |s| &s.custom_links)
    }

    async fn get_custom_link(&self, link: &ItemId) -> RequestResult<CustomLink> {
        self.record("get_custom_link", vec![link.to_string()])?;
        let state = self.state.lock().unwrap();
        state
            .custom_links
            .iter()
            .find(|l| &l.id == link)
            .cloned()
            .ok_or_else(|| not_found(link))
    }

    async fn create_custom_link(&self, draft: &CustomLinkDraft) -> RequestResult<()> {
        self.record("create_custom_link", vec![draft.title.clone()])
    }

    async fn edit_custom_link(
        &self,
        link: &ItemId,
        draft: &CustomLinkDraft,
    ) -> RequestResult<()> {
        self.record(
            "edit_custom_link",
            vec![link.to_string(), draft.title.clone()],
        )
    }

    async fn delete_custom_link(&self, link: &ItemId) -> RequestResult<()> {
        self.record("delete_custom_link", vec![link.to_string()])
    }
}

#[async_trait]
impl CollectionRequests for FakeRequester {
    async fn get_collections(&self, _owned_only: bool) -> RequestResult<Vec<Collection>> {
        self.list("get_collections", |s| &s.collections)
    }

    async fn get_collection(&self, collection: &ItemId) -> RequestResult<Collection> {
        self.record("get_collection", vec![collection.to_string()])?;
        let state = self.state.lock().unwrap();
        state
            .collections
            .iter()
            .find(|c| &c.id == collection)
            .cloned()
            .ok_or_else(|| not_found(collection))
    }

    async fn create_collection(&self, draft: &CollectionDraft) -> RequestResult<()> {
        self.record("create_collection", vec![draft.title.clone()])
    }

    async fn edit_collection(
        &self,
        collection: &ItemId,
        draft: &CollectionDraft,
    ) -> RequestResult<()> {
        self.record(
            "edit_collection",
            vec![collection.to_string(), draft.title.clone()],
        )
    }

    async fn delete_collection(&self, collection: &ItemId) -> RequestResult<()> {
        self.record("delete_collection", vec![collection.to_string()])
    }

    async fn manage_collection_links(
        &self,
        collection: &ItemId,
        links: &[ItemId],
    ) -> RequestResult<()> {
        self.record("manage_collection_links", with_list(collection, links))
    }

    async fn manage_collection_teams(
        &self,
        collection: &ItemId,
        teams: &[ItemId],
    ) -> RequestResult<()> {
        self.record("manage_collection_teams", with_list(collection, teams))
    }
}

#[async_trait]
impl TeamRequests for FakeRequester {
    async fn get_teams(&self, _owned_only: bool) -> RequestResult<Vec<Team>> {
        self.list("get_teams", |s| &s.teams)
    }

    async fn get_team(&self, team: &ItemId) -> RequestResult<Team> {
        self.record("get_team", vec![team.to_string()])?;
        let state = self.state.lock().unwrap();
        state
            .teams
            .iter()
            .find(|t| &t.id == team)
            .cloned()
            .ok_or_else(|| not_found(team))
    }

    async fn create_team(&self, draft: &TeamDraft) -> RequestResult<()> {
        self.record("create_team", vec![draft.title.clone()])
    }

    async fn edit_team(&self, team: &ItemId, draft: &TeamDraft) -> RequestResult<()> {
        self.record("edit_team", vec![team.to_string(), draft.title.clone()])
    }

    async fn delete_team(&self, team: &ItemId) -> RequestResult<()> {
        self.record("delete_team", vec![team.to_string()])
    }

    async fn leave_team(&self, team: &ItemId) -> RequestResult<()> {
        self.record("leave_team", vec![team.to_string()])
    }

    async fn manage_team_links(&self, team: &ItemId, links: &[ItemId]) -> RequestResult<()> {
        self.record("manage_team_links", with_list(team, links))
    }

    async fn manage_team_collections(
        &self,
        team: &ItemId,
        collections: &[ItemId],
    ) -> RequestResult<()> {
        self.record("manage_team_collections", with_list(team, collections))
    }

    async fn change_member_role(
        &self,
        team: &ItemId,
        member: &ItemId,
        role: TeamRole,
    ) -> RequestResult<()> {
        self.record(
            "change_member_role",
            vec![team.to_string(), member.to_string(), format!("{role:?}")],
        )
    }

    async fn remove_member(&self, team: &ItemId, member: &ItemId) -> RequestResult<()> {
        self.record("remove_member", vec![team.to_string(), member.to_string()])
    }

    async fn get_potential_members(&self) -> RequestResult<Vec<TeamMember>> {
        self.list("get_potential_members", |s| &s.potential_members)
    }
}

fn ids(raw: &[&str]) -> Vec<ItemId> {
    raw.iter().map(|s| ItemId::from(*s)).collect()
}

pub(crate) fn link(id: &str, collection_ids: &[&str], team_ids: &[&str]) -> Link {
    Link {
        id: ItemId::from(id),
        owner: ItemId::from(USER),
        title: id.to_string(),
        description: None,
        reference_link: format!("https://example.com/{id}"),
        collection_ids: ids(collection_ids),
        team_ids: ids(team_ids),
    }
}

pub(crate) fn foreign_link(id: &str) -> Link {
    Link {
        owner: ItemId::from("someone-else"),
        ..link(id, &[], &[])
    }
}

pub(crate) fn custom_link(id: &str) -> CustomLink {
    CustomLink {
        id: ItemId::from(id),
        owner: ItemId::from(USER),
        title: id.to_string(),
        description: None,
        resources: [("doc".to_string(), "https://example.com".to_string())].into(),
        fields: Default::default(),
        unique_access: false,
        expired_time: ExpiredTime::NoExpiration,
        creation_date: Utc::now(),
    }
}

pub(crate) fn collection(id: &str, link_ids: &[&str], team_ids: &[&str]) -> Collection {
    Collection {
        id: ItemId::from(id),
        owner: ItemId::from(USER),
        title: id.to_string(),
        description: None,
        color: "#336699".to_string(),
        link_ids: ids(link_ids),
        team_ids: ids(team_ids),
    }
}

pub(crate) fn member(id: &str, role: TeamRole) -> TeamMember {
    TeamMember {
        id: ItemId::from(id),
        name: id.to_string(),
        surname: String::new(),
        email: format!("{id}@example.com"),
        tag_name: format!("@{id}"),
        role,
    }
}

pub(crate) fn team(id: &str, owner: &str, link_ids: &[&str], members: Vec<TeamMember>) -> Team {
    Team {
        id: ItemId::from(id),
        owner: ItemId::from(owner),
        title: id.to_string(),
        description: None,
        logo_pic: None,
        link_ids: ids(link_ids),
        collection_ids: vec![],
        members,
    }
}

/// Signed-in services over `requester`, with a fresh controller.
pub(crate) fn services(requester: &Arc<FakeRequester>) -> ScreenServices<FakeRequester> {
    let session = SessionCache::new(None);
    session.sign_in(test_credentials()).unwrap();
    ScreenServices::new(
        Arc::clone(requester),
        Arc::new(session),
        RefreshController::with_interval(INTERVAL, 3, ConnectionStatus::new()),
    )
}

/// Let spawned tasks run without moving the clock.
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
