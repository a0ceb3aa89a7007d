//! Set operations over attachment lists.
//!
//! Every function takes snapshots and returns new collections; nothing here
//! mutates shared state. Identity is always the item id, never the instance.

use std::collections::HashSet;

use crate::items::{Item, ItemId};

/// Items from `owned` that are not yet attached, by id.
///
/// Keeps the order of `owned` and drops later duplicates of the same id.
pub fn eligible_for_attachment<T>(owned: &[T], already_attached: &[T]) -> Vec<T>
where
    T: Item + Clone,
{
    let attached: Vec<&ItemId> = already_attached.iter().map(Item::id).collect();
    eligible_excluding(owned, attached)
}

/// Same as [`eligible_for_attachment`] when only the attached ids are known,
/// e.g. `link.collection_ids`.
pub fn eligible_by_ids<T>(owned: &[T], attached_ids: &[ItemId]) -> Vec<T>
where
    T: Item + Clone,
{
    eligible_excluding(owned, attached_ids.iter().collect())
}

fn eligible_excluding<'a, T>(owned: &'a [T], attached: Vec<&'a ItemId>) -> Vec<T>
where
    T: Item + Clone,
{
    let mut seen: HashSet<&ItemId> = attached.into_iter().collect();
    owned
        .iter()
        .filter(|item| seen.insert(Item::id(*item)))
        .cloned()
        .collect()
}

/// Union of `current` and `chosen`.
///
/// `current` keeps its order; chosen ids not already present are appended in
/// the order they were chosen, each at most once.
pub fn merge_attachments(current: &[ItemId], chosen: &[ItemId]) -> Vec<ItemId> {
    let mut merged = current.to_vec();
    let mut present: HashSet<&ItemId> = current.iter().collect();
    for id in chosen {
        if present.insert(id) {
            merged.push(id.clone());
        }
    }
    merged
}

/// `current` without `removed`. Unknown ids leave the list unchanged.
pub fn remove_attachment(current: &[ItemId], removed: &ItemId) -> Vec<ItemId> {
    current.iter().filter(|id| *id != removed).cloned().collect()
}
