//! Identifier-keyed reconciliation of a website's child collections.
//!
//! Given the persisted collection and a client-submitted desired list,
//! [`plan`] computes a three-way diff:
//!
//! - entries without an identifier are **created**;
//! - entries whose identifier is in the persisted collection are
//!   **updated** in place (identifier and parent unchanged);
//! - persisted entries whose identifier is absent from the desired list
//!   are **deleted**. A client keeps an entry only by echoing its id.
//!
//! An entry carrying an identifier that is not in the persisted
//! collection (stale, already deleted, or another website's) is neither
//! updated nor created; it is reported in [`ReconcilePlan::dropped`] and
//! otherwise ignored.
//!
//! The store applies a plan in the order delete → update → create.
//! Planning is pure; it never touches the store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors};

/// A persisted record addressable by a unique identifier within its
/// parent collection.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

/// Identifier a client sent back with a desired entry. A value that is
/// not a UUID can never name a persisted record; it is kept verbatim so
/// it can be reported as dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Parsed(Uuid),
    Opaque(String),
}

impl EntryId {
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Parsed(id) => Some(*id),
            Self::Opaque(_) => None,
        }
    }
}

impl From<Uuid> for EntryId {
    fn from(id: Uuid) -> Self {
        Self::Parsed(id)
    }
}

/// One element of a desired-state list: the mutable fields plus the
/// identifier of the persisted entry it refers to, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Desired<F> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> Desired<F> {
    /// An entry to be created.
    pub fn new(fields: F) -> Self {
        Self { id: None, fields }
    }

    /// An entry referring to a persisted record.
    pub fn existing(id: Uuid, fields: F) -> Self {
        Self {
            id: Some(id.into()),
            fields,
        }
    }
}

impl<F: Validate> Validate for Desired<F> {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        self.fields.validate_at(prefix, errors);
    }
}

/// The operations needed to turn a persisted collection into the
/// desired one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan<F> {
    /// Persisted identifiers to delete, in persisted order.
    pub to_delete: Vec<Uuid>,
    /// Persisted identifiers with their new field values, in desired
    /// order. A repeated identifier appears once per occurrence; the last
    /// one wins when applied.
    pub to_update: Vec<(Uuid, F)>,
    /// New entries, in desired order.
    pub to_create: Vec<F>,
    /// Identifiers that matched nothing persisted and were ignored.
    pub dropped: Vec<EntryId>,
}

impl<F> ReconcilePlan<F> {
    /// Convert the field payloads, keeping every identifier as is.
    pub fn map<G>(self, mut f: impl FnMut(F) -> G) -> ReconcilePlan<G> {
        ReconcilePlan {
            to_delete: self.to_delete,
            to_update: self
                .to_update
                .into_iter()
                .map(|(id, fields)| (id, f(fields)))
                .collect(),
            to_create: self.to_create.into_iter().map(f).collect(),
            dropped: self.dropped,
        }
    }
}

impl<F> Default for ReconcilePlan<F> {
    fn default() -> Self {
        Self {
            to_delete: Vec::new(),
            to_update: Vec::new(),
            to_create: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

/// Compute the diff between `existing` and `desired`.
pub fn plan<T: Keyed, F>(existing: &[T], desired: Vec<Desired<F>>) -> ReconcilePlan<F> {
    let existing_ids: HashSet<Uuid> = existing.iter().map(Keyed::key).collect();
    // Every identifier the client echoed, known or not.
    let kept: HashSet<Uuid> = desired
        .iter()
        .filter_map(|d| d.id.as_ref().and_then(EntryId::as_uuid))
        .collect();

    let mut out = ReconcilePlan::default();
    for entry in desired {
        match entry.id {
            None => out.to_create.push(entry.fields),
            Some(EntryId::Parsed(id)) if existing_ids.contains(&id) => {
                out.to_update.push((id, entry.fields))
            }
            Some(other) => out.dropped.push(other),
        }
    }

    out.to_delete = existing
        .iter()
        .map(Keyed::key)
        .filter(|id| !kept.contains(id))
        .collect();

    out
}
