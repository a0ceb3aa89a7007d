use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a user, link, collection or team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Capability shared by every user-owned object.
pub trait Item {
    fn id(&self) -> &ItemId;
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn owner(&self) -> &ItemId;
}

/// Which kind of item an id refers to. Used in logs and endpoint selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Link,
    CustomLink,
    Collection,
    Team,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Link => write!(f, "link"),
            ItemKind::CustomLink => write!(f, "custom_link"),
            ItemKind::Collection => write!(f, "collection"),
            ItemKind::Team => write!(f, "team"),
        }
    }
}

/// A plain link to an external resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: ItemId,
    pub owner: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub reference_link: String,
    #[serde(default)]
    pub collection_ids: Vec<ItemId>,
    #[serde(default)]
    pub team_ids: Vec<ItemId>,
}

/// How long a custom link stays reachable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiredTime {
    #[default]
    NoExpiration,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
    OneWeek,
}

impl ExpiredTime {
    /// Lifetime of the link, `None` when it never expires.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            ExpiredTime::NoExpiration => None,
            ExpiredTime::FifteenMinutes => Some(Duration::minutes(15)),
            ExpiredTime::ThirtyMinutes => Some(Duration::minutes(30)),
            ExpiredTime::OneHour => Some(Duration::hours(1)),
            ExpiredTime::OneDay => Some(Duration::days(1)),
            ExpiredTime::OneWeek => Some(Duration::weeks(1)),
        }
    }
}

/// A shareable page bundling several resources behind one link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLink {
    pub id: ItemId,
    pub owner: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resources shown to the visitor, keyed by label.
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
    /// Fields the visitor must fill before the resources are revealed.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub unique_access: bool,
    #[serde(default)]
    pub expired_time: ExpiredTime,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub creation_date: DateTime<Utc>,
}

impl CustomLink {
    /// Returns true once `creation_date + expired_time` is in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expired_time.duration() {
            Some(lifetime) => self
                .creation_date
                .checked_add_signed(lifetime)
                .is_some_and(|end| end <= now),
            None => false,
        }
    }
}

/// A named, colored group of links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: ItemId,
    pub owner: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hex color in `#RRGGBB` form.
    pub color: String,
    #[serde(default)]
    pub link_ids: Vec<ItemId>,
    #[serde(default)]
    pub team_ids: Vec<ItemId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamRole {
    Admin,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: ItemId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub tag_name: String,
    pub role: TeamRole,
}

/// A group of users sharing links and collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: ItemId,
    pub owner: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_pic: Option<String>,
    #[serde(default)]
    pub link_ids: Vec<ItemId>,
    #[serde(default)]
    pub collection_ids: Vec<ItemId>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl Team {
    /// The author is the user who created the team.
    pub fn is_author(&self, user: &ItemId) -> bool {
        &self.owner == user
    }

    /// Authors are always admins, other members only when their role says so.
    pub fn is_admin(&self, user: &ItemId) -> bool {
        self.is_author(user)
            || self
                .members
                .iter()
                .any(|m| &m.id == user && m.role == TeamRole::Admin)
    }

    pub fn has_member(&self, user: &ItemId) -> bool {
        self.members.iter().any(|m| &m.id == user)
    }

    pub fn member(&self, user: &ItemId) -> Option<&TeamMember> {
        self.members.iter().find(|m| &m.id == user)
    }
}

macro_rules! impl_item {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Item for $ty {
                fn id(&self) -> &ItemId {
                    &self.id
                }

                fn title(&self) -> &str {
                    &self.title
                }

                fn description(&self) -> Option<&str> {
                    self.description.as_deref()
                }

                fn owner(&self) -> &ItemId {
                    &self.owner
                }
            }
        )*
    };
}

impl_item!(Link, CustomLink, Collection, Team);

/// Fields submitted when creating or editing a link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDraft {
    pub reference_link: String,
    pub description: String,
}

/// Fields submitted when creating or editing a custom link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLinkDraft {
    pub title: String,
    pub description: String,
    pub resources: BTreeMap<String, String>,
    pub fields: BTreeMap<String, String>,
    pub unique_access: bool,
    pub expired_time: ExpiredTime,
}

/// Fields submitted when creating or editing a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDraft {
    pub title: String,
    pub description: String,
    pub color: String,
    pub link_ids: Vec<ItemId>,
}

/// Fields submitted when creating or editing a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDraft {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_pic: Option<String>,
    pub member_ids: Vec<ItemId>,
}
