// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tree::{Entity, NodeId, Removal, Tree};

/// Link into a wallet or category tree that survives deletion of its target
/// by freezing into the path the target had when it was removed.
///
/// `Live(None)` is a deliberate "no reference" and is distinct from
/// `Archived`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RefRepr", into = "RefRepr")]
pub enum ArchivalRef {
    Live(Option<Uuid>),
    Archived(String),
}

impl Default for ArchivalRef {
    fn default() -> Self {
        ArchivalRef::Live(None)
    }
}

impl ArchivalRef {
    pub fn none() -> Self {
        ArchivalRef::Live(None)
    }

    pub fn live(id: Uuid) -> Self {
        ArchivalRef::Live(Some(id))
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            ArchivalRef::Live(id) => *id,
            ArchivalRef::Archived(_) => None,
        }
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, ArchivalRef::Archived(_))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ArchivalRef::Live(None))
    }

    pub fn points_to(&self, id: Uuid) -> bool {
        self.id() == Some(id)
    }

    pub fn resolve<T: Entity>(&self, tree: &Tree<T>) -> Option<NodeId> {
        self.id().and_then(|id| tree.node_of(id))
    }

    pub fn get<'a, T: Entity>(&self, tree: &'a Tree<T>) -> Option<&'a T> {
        self.id().and_then(|id| tree.find(id))
    }

    /// Archives this reference if its target was part of `removal`.
    pub fn invalidate(&mut self, removal: &Removal) -> bool {
        let Some(id) = self.id() else {
            return false;
        };
        match removal.path_of(id) {
            Some(path) => {
                *self = ArchivalRef::Archived(path.to_string());
                true
            }
            None => false,
        }
    }

    /// Drops ids that no longer exist in `tree`.
    pub fn sanitize<T: Entity>(&mut self, tree: &Tree<T>) -> bool {
        match self.id() {
            Some(id) if !tree.contains(id) => {
                log::warn!("dangling reference {} replaced by an empty one", id);
                *self = ArchivalRef::none();
                true
            }
            _ => false,
        }
    }

    pub fn label<T: Entity>(&self, tree: &Tree<T>) -> String {
        match self {
            ArchivalRef::Live(None) => String::new(),
            ArchivalRef::Live(Some(id)) => tree.path_of(*id).unwrap_or_default(),
            ArchivalRef::Archived(path) => format!("[{}]", path),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RefRepr {
    Ref(Uuid),
    Archive(String),
}

impl From<RefRepr> for ArchivalRef {
    fn from(r: RefRepr) -> Self {
        match r {
            RefRepr::Ref(id) if id.is_nil() => ArchivalRef::Live(None),
            RefRepr::Ref(id) => ArchivalRef::Live(Some(id)),
            RefRepr::Archive(path) => ArchivalRef::Archived(path),
        }
    }
}

impl From<ArchivalRef> for RefRepr {
    fn from(r: ArchivalRef) -> Self {
        match r {
            ArchivalRef::Live(id) => RefRepr::Ref(id.unwrap_or_else(Uuid::nil)),
            ArchivalRef::Archived(path) => RefRepr::Archive(path),
        }
    }
}
