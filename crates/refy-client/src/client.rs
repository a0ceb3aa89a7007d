use std::time::Duration;

use async_trait::async_trait;
use refy_core::config::ServerConfig;
use refy_core::items::{
    Collection, CollectionDraft, CustomLink, CustomLinkDraft, ItemId, Link, LinkDraft, Team,
    TeamDraft, TeamMember, TeamRole,
};
use refy_core::requests::{
    CollectionRequests, CustomLinkRequests, LinkRequests, RequestError, RequestResult,
    TeamRequests,
};
use refy_core::session::Credentials;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::endpoints::{
    COLLECTIONS, CUSTOM_LINKS, Endpoints, LEAVE, LINKS, POTENTIAL_MEMBERS, TEAMS,
};
use crate::envelope;
use crate::errors::ClientError;

pub const TOKEN_HEADER: &str = "token";

/// Transport settings, independent of who is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ServerConfig> for ClientConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Requester backed by the Refy REST API.
#[derive(Debug, Clone)]
pub struct HttpRequester {
    http_client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpRequester {
    pub fn new(config: ClientConfig, credentials: &Credentials) -> Result<Self, ClientError> {
        let host = credentials.host.as_str();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(ClientError::InvalidHost {
                host: host.to_string(),
            });
        }

        let mut token = HeaderValue::from_str(&credentials.token).map_err(|e| {
            ClientError::InvalidToken {
                message: e.to_string(),
            }
        })?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token);

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("refy-client/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        debug!(
            event = "client.requester.created",
            host = %host,
            user_id = %credentials.user_id,
            timeout_secs = config.timeout.as_secs()
        );

        Ok(Self {
            http_client,
            endpoints: Endpoints::new(host, &credentials.user_id),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn send(&self, request: RequestBuilder) -> RequestResult<(reqwest::StatusCode, String)> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(event = "client.request.completed", status = %status);
        Ok((status, body))
    }

    async fn fetch<T: DeserializeOwned>(&self, url: String) -> RequestResult<T> {
        debug!(event = "client.request.started", method = "GET", url = %url);
        let (status, body) = self.send(self.http_client.get(&url)).await?;
        envelope::decode(status, &body).inspect_err(|e| log_failure(&url, e))
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> RequestResult<()> {
        debug!(event = "client.request.started", method = %method, url = %url);
        let mut request = self.http_client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let (status, body) = self.send(request).await?;
        envelope::acknowledge(status, &body).inspect_err(|e| log_failure(&url, e))
    }

    async fn delete(&self, url: String) -> RequestResult<()> {
        self.execute::<()>(Method::DELETE, url, None).await
    }
}

fn transport_error(error: reqwest::Error) -> RequestError {
    if error.is_decode() || error.is_body() {
        RequestError::Decode {
            message: error.to_string(),
        }
    } else if error.is_builder() {
        RequestError::request(error.to_string())
    } else {
        // connect, timeout and anything else that never reached the server
        RequestError::connection(error.to_string())
    }
}

fn log_failure(url: &str, error: &RequestError) {
    warn!(event = "client.request.failed", url = %url, error = %error);
}

#[async_trait]
impl LinkRequests for HttpRequester {
    async fn get_links(&self, owned_only: bool) -> RequestResult<Vec<Link>> {
        self.fetch(self.endpoints.list(LINKS, owned_only)).await
    }

    async fn create_link(&self, draft: &LinkDraft) -> RequestResult<()> {
        self.execute(Method::POST, self.endpoints.resource(LINKS), Some(draft)).await
    }

    async fn edit_link(&self, link: &ItemId, draft: &LinkDraft) -> RequestResult<()> {
        self.execute(Method::PATCH, self.endpoints.item(LINKS, link), Some(draft)).await
    }

    async fn delete_link(&self, link: &ItemId) -> RequestResult<()> {
        self.delete(self.endpoints.item(LINKS, link)).await
    }

    async fn manage_link_collections(
        &self,
        link: &ItemId,
        collections: &[ItemId],
    ) -> RequestResult<()> {
        let url = self.endpoints.nested(LINKS, link, COLLECTIONS);
        let body = json!({ COLLECTIONS: collections });
        self.execute(Method::PATCH, url, Some(&body)).await
    }

    async fn manage_link_teams(&self, link: &ItemId, teams: &[ItemId]) -> RequestResult<()> {
        let url = self.endpoints.nested(LINKS, link, TEAMS);
        let body = json!({ TEAMS: teams });
        self.execute(Method::PATCH, url, Some(&body)).await
    }
}

#[async_trait]
impl CustomLinkRequests for HttpRequester {
    async fn get_custom_links(&self) -> RequestResult<Vec<CustomLink>> {
        self.fetch(self.endpoints.resource(CUSTOM_LINKS)).await
    }

    async fn get_custom_link(&self, link: &ItemId) -> RequestResult<CustomLink> {
        self.fetch(self.endpoints.item(CUSTOM_LINKS, link)).await
    }

    async fn create_custom_link(&self, draft: &CustomLinkDraft) -> RequestResult<()> {
        let url = self.endpoints.resource(CUSTOM_LINKS);
        self.execute(Method::POST, url, Some(draft)).await
    }

    async fn edit_custom_link(
        &self,
        link: &ItemId,
        draft: &CustomLinkDraft,
    ) -> RequestResult<()> {
        let url = self.endpoints.item(CUSTOM_LINKS, link);
        self.execute(Method::PATCH, url, Some(draft)).await
    }

    async fn delete_custom_link(&self, link: &ItemId) -> RequestResult<()> {
        self.delete(self.endpoints.item(CUSTOM_LINKS, link)).await
    }
}

#[async_trait]
impl CollectionRequests for HttpRequester {
    async fn get_collections(&self, owned_only: bool) -> RequestResult<Vec<Collection>> {
        self.fetch(self.endpoints.list(COLLECTIONS, owned_only)).await
    }

    async fn get_collection(&self, collection: &ItemId) -> RequestResult<Collection> {
        self.fetch(self.endpoints.item(COLLECTIONS, collection)).await
    }

    async fn create_collection(&self, draft: &CollectionDraft) -> RequestResult<()> {
        let url = self.endpoints.resource(COLLECTIONS);
        self.execute(Method::POST, url, Some(draft)).await
    }

    async fn edit_collection(
        &self,
        collection: &ItemId,
        draft: &CollectionDraft,
    ) -> RequestResult<()> {
        let url = self.endpoints.item(COLLECTIONS, collection);
        self.execute(Method::PATCH, url, Some(draft)).await
    }

    async fn delete_collection(&self, collection: &ItemId) -> RequestResult<()> {
        self.delete(self.endpoints.item(COLLECTIONS, collection)).await
    }

    async fn manage_collection_links(
        &self,
        collection: &ItemId,
        links: &[ItemId],
    ) -> RequestResult<()> {
        let url = self.endpoints.nested(COLLECTIONS, collection, LINKS);
        let body = json!({ LINKS: links });
        self.execute(Method::PATCH, url, Some(&body)).await
    }

    async fn manage_collection_teams(
        &self,
        collection: &ItemId,
        teams: &[ItemId],
    ) -> RequestResult<()> {
        let url = self.endpoints.nested(COLLECTIONS, collection, TEAMS);
        let body = json!({ TEAMS: teams });
        self.execute(Method::PATCH, url, Some(&body)).await
    }
}

#[async_trait]
impl TeamRequests for HttpRequester {
    async fn get_teams(&self, owned_only: bool) -> RequestResult<Vec<Team>> {
        self.fetch(self.endpoints.list(TEAMS, owned_only)).await
    }

    async fn get_team(&self, team: &ItemId) -> RequestResult<Team> {
        self.fetch(self.endpoints.item(TEAMS, team)).await
    }

    async fn create_team(&self, draft: &TeamDraft) -> RequestResult<()> {
        let url = self.endpoints.resource(TEAMS);
        self.execute(Method::POST, url, Some(draft)).await
    }

    async fn edit_team(&self, team: &ItemId, draft: &TeamDraft) -> RequestResult<()> {
        let url = self.endpoints.item(TEAMS, team);
        self.execute(Method::PATCH, url, Some(draft)).await
    }

    async fn delete_team(&self, team: &ItemId) -> RequestResult<()> {
        self.delete(self.endpoints.item(TEAMS, team)).await
    }

    async fn leave_team(&self, team: &ItemId) -> RequestResult<()> {
        self.delete(self.endpoints.nested(TEAMS, team, LEAVE)).await
    }

    async fn manage_team_links(&self, team: &ItemId, links: &[ItemId]) -> RequestResult<()> {
        let url = self.endpoints.nested(TEAMS, team, LINKS);
        let body = json!({ LINKS: links });
        self.execute(Method::PATCH, url, Some(&body)).await
    }

    async fn manage_team_collections(
        &self,
        team: &ItemId,
        collections: &[ItemId],
    ) -> RequestResult<()> {
        let url = self.endpoints.nested(TEAMS, team, COLLECTIONS);
        let body = json!({ COLLECTIONS: collections });
        self.execute(Method::PATCH, url, Some(&body)).await
    }

    async fn change_member_role(
        &self,
        team: &ItemId,
        member: &ItemId,
        role: TeamRole,
    ) -> RequestResult<()> {
        let url = self.endpoints.member(team, member);
        let body = json!({ "role": role });
        self.execute(Method::PATCH, url, Some(&body)).await
    }

    async fn remove_member(&self, team: &ItemId, member: &ItemId) -> RequestResult<()> {
        self.delete(self.endpoints.member(team, member)).await
    }

    async fn get_potential_members(&self) -> RequestResult<Vec<TeamMember>> {
        self.fetch(self.endpoints.resource(POTENTIAL_MEMBERS)).await
    }
}
