//! URL layout of the backend API.
//!
//! Every resource lives under `{host}/api/v1/users/{user_id}/`.

use refy_core::items::ItemId;

pub const LINKS: &str = "links";
pub const CUSTOM_LINKS: &str = "customLinks";
pub const COLLECTIONS: &str = "collections";
pub const TEAMS: &str = "teams";
pub const MEMBERS: &str = "members";
pub const LEAVE: &str = "leave";
pub const POTENTIAL_MEMBERS: &str = "potentialMembers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(host: &str, user_id: &ItemId) -> Self {
        Self {
            base: format!(
                "{}/api/v1/users/{}",
                host.trim_end_matches('/'),
                urlencoding::encode(user_id.as_str())
            ),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}/{kind}`, with `?ownedOnly=true` when asked for.
    pub fn list(&self, kind: &str, owned_only: bool) -> String {
        if owned_only {
            format!("{}/{kind}?ownedOnly=true", self.base)
        } else {
            self.resource(kind)
        }
    }

    /// `{base}/{kind}`
    pub fn resource(&self, kind: &str) -> String {
        format!("{}/{kind}", self.base)
    }

    /// `{base}/{kind}/{id}`
    pub fn item(&self, kind: &str, id: &ItemId) -> String {
        format!("{}/{kind}/{}", self.base, urlencoding::encode(id.as_str()))
    }

    /// `{base}/{kind}/{id}/{sub}`
    pub fn nested(&self, kind: &str, id: &ItemId, sub: &str) -> String {
        format!("{}/{sub}", self.item(kind, id))
    }

    /// `{base}/teams/{team}/members/{member}`
    pub fn member(&self, team: &ItemId, member: &ItemId) -> String {
        format!(
            "{}/{}",
            self.nested(TEAMS, team, MEMBERS),
            urlencoding::encode(member.as_str())
        )
    }
}
