pub mod errors;
pub mod types;
pub mod validation;

pub use errors::ValidationError;
pub use types::{
    Collection, CollectionDraft, CustomLink, CustomLinkDraft, ExpiredTime, Item, ItemId, ItemKind,
    Link, LinkDraft, Team, TeamDraft, TeamMember, TeamRole,
};
