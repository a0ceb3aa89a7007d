use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::config::SessionConfig;
use crate::events;
use crate::items::{Collection, CustomLink, ItemId, Link, Team};
use crate::requests::{
    CollectionRequests, CustomLinkRequests, LinkRequests, RequestResult, TeamRequests,
};
use crate::session::errors::SessionError;
use crate::session::persistence;
use crate::session::types::Credentials;

#[derive(Debug)]
struct Owned<T> {
    items: Vec<T>,
    loaded: bool,
}

/// One of the user's owned lists, with a flag telling whether it was ever
/// fetched.
#[derive(Debug)]
struct OwnedList<T>(RwLock<Owned<T>>);

impl<T: Clone> OwnedList<T> {
    fn new() -> Self {
        Self(RwLock::new(Owned {
            items: Vec::new(),
            loaded: false,
        }))
    }

    fn snapshot(&self) -> Vec<T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .clone()
    }

    fn is_loaded(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).loaded
    }

    fn set(&self, items: Vec<T>) {
        let mut owned = self.0.write().unwrap_or_else(PoisonError::into_inner);
        owned.items = items;
        owned.loaded = true;
    }

    fn forget(&self) {
        let mut owned = self.0.write().unwrap_or_else(PoisonError::into_inner);
        owned.items.clear();
        owned.loaded = false;
    }
}

/// Application-wide cache of the signed-in user and the items they own.
///
/// Getters hand out snapshots; nothing outside the cache holds a reference
/// into its lists.
#[derive(Debug)]
pub struct SessionCache {
    path: Option<PathBuf>,
    credentials: RwLock<Option<Credentials>>,
    links: OwnedList<Link>,
    custom_links: OwnedList<CustomLink>,
    collections: OwnedList<Collection>,
    teams: OwnedList<Team>,
}

impl SessionCache {
    /// A cache persisting to `path`, or purely in memory when `None`.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            credentials: RwLock::new(None),
            links: OwnedList::new(),
            custom_links: OwnedList::new(),
            collections: OwnedList::new(),
            teams: OwnedList::new(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        Ok(Self::new(Some(persistence::session_file_path(config)?)))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load previously saved credentials. Returns whether a session was found.
    pub fn restore(&self) -> Result<bool, SessionError> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        let restored = persistence::load_credentials(path)?;
        let found = restored.is_some();
        if let Some(credentials) = &restored {
            events::log_session_started(&credentials.user_id, &credentials.host, true);
        } else {
            debug!(event = "core.session.restore_skipped", file = %path.display());
        }
        *self.credentials.write().unwrap_or_else(PoisonError::into_inner) = restored;
        Ok(found)
    }

    /// Store and persist new credentials. Cached lists belong to the previous
    /// user and are forgotten.
    pub fn sign_in(&self, credentials: Credentials) -> Result<(), SessionError> {
        credentials.validate()?;
        if let Some(path) = &self.path {
            persistence::save_credentials(&credentials, path)?;
        }
        events::log_session_started(&credentials.user_id, &credentials.host, false);
        *self.credentials.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials);
        self.forget_lists();
        Ok(())
    }

    /// Sign out: delete the session file and drop every cached list.
    pub fn clear(&self) -> Result<(), SessionError> {
        if let Some(path) = &self.path {
            persistence::remove_credentials(path)?;
        }
        *self.credentials.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.forget_lists();
        events::log_session_ended();
        Ok(())
    }

    fn forget_lists(&self) {
        self.links.forget();
        self.custom_links.forget();
        self.collections.forget();
        self.teams.forget();
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn require_credentials(&self) -> Result<Credentials, SessionError> {
        self.credentials().ok_or(SessionError::NotSignedIn)
    }

    pub fn user_id(&self) -> Option<ItemId> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|c| c.user_id.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn links(&self) -> Vec<Link> {
        self.links.snapshot()
    }

    pub fn custom_links(&self) -> Vec<CustomLink> {
        self.custom_links.snapshot()
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.collections.snapshot()
    }

    pub fn teams(&self) -> Vec<Team> {
        self.teams.snapshot()
    }

    pub fn set_links(&self, links: Vec<Link>) {
        self.links.set(links);
    }

    pub fn set_custom_links(&self, custom_links: Vec<CustomLink>) {
        self.custom_links.set(custom_links);
    }

    pub fn set_collections(&self, collections: Vec<Collection>) {
        self.collections.set(collections);
    }

    pub fn set_teams(&self, teams: Vec<Team>) {
        self.teams.set(teams);
    }

    pub fn links_loaded(&self) -> bool {
        self.links.is_loaded()
    }

    pub fn collections_loaded(&self) -> bool {
        self.collections.is_loaded()
    }

    pub fn teams_loaded(&self) -> bool {
        self.teams.is_loaded()
    }

    /// Owned links, fetched only when never loaded or when forced.
    pub async fn load_owned_links<R>(
        &self,
        requester: &R,
        force_refresh: bool,
    ) -> RequestResult<Vec<Link>>
    where
        R: LinkRequests + ?Sized,
    {
        if !force_refresh && self.links.is_loaded() {
            return Ok(self.links.snapshot());
        }
        let links = requester.get_links(true).await?;
        debug!(event = "core.session.links_loaded", count = links.len());
        self.links.set(links.clone());
        Ok(links)
    }

    pub async fn load_owned_custom_links<R>(
        &self,
        requester: &R,
        force_refresh: bool,
    ) -> RequestResult<Vec<CustomLink>>
    where
        R: CustomLinkRequests + ?Sized,
    {
        if !force_refresh && self.custom_links.is_loaded() {
            return Ok(self.custom_links.snapshot());
        }
        let custom_links = requester.get_custom_links().await?;
        debug!(
            event = "core.session.custom_links_loaded",
            count = custom_links.len()
        );
        self.custom_links.set(custom_links.clone());
        Ok(custom_links)
    }

    pub async fn load_owned_collections<R>(
        &self,
        requester: &R,
        force_refresh: bool,
    ) -> RequestResult<Vec<Collection>>
    where
        R: CollectionRequests + ?Sized,
    {
        if !force_refresh && self.collections.is_loaded() {
            return Ok(self.collections.snapshot());
        }
        let collections = requester.get_collections(true).await?;
        debug!(
            event = "core.session.collections_loaded",
            count = collections.len()
        );
        self.collections.set(collections.clone());
        Ok(collections)
    }

    pub async fn load_owned_teams<R>(
        &self,
        requester: &R,
        force_refresh: bool,
    ) -> RequestResult<Vec<Team>>
    where
        R: TeamRequests + ?Sized,
    {
        if !force_refresh && self.teams.is_loaded() {
            return Ok(self.teams.snapshot());
        }
        let teams = requester.get_teams(true).await?;
        debug!(event = "core.session.teams_loaded", count = teams.len());
        self.teams.set(teams.clone());
        Ok(teams)
    }
}
