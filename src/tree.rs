// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Arena-backed hierarchy used for wallets and categories.
//!
//! The arena owns every node; nodes refer to each other through [`NodeId`]
//! handles, so a parent link never owns its target. Removing a node frees its
//! whole subtree and reports the removed ids together with the paths they had
//! at removal time, which is what reference holders need to archive links.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};

pub const PATH_SEPARATOR: &str = "/";

/// Anything stored in a [`Tree`].
pub trait Entity {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

fn check_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() || name.contains(PATH_SEPARATOR) {
        return Err(LedgerError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNode {
    pub id: Uuid,
    pub path: String,
}

/// Everything a removal took out of a tree, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    pub entries: Vec<RemovedNode>,
}

impl Removal {
    pub fn path_of(&self, id: Uuid) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pre-order record: a node followed by `children` direct subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatNode<T> {
    pub children: usize,
    pub node: T,
}

#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Option<Node<T>>>,
    roots: Vec<NodeId>,
    index: HashMap<Uuid, NodeId>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Entity> Tree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|n| &mut n.value)
    }

    pub fn node_of(&self, id: Uuid) -> Option<NodeId> {
        self.index.get(&id).copied()
    }

    pub fn find(&self, id: Uuid) -> Option<&T> {
        self.node_of(id).and_then(|n| self.get(n))
    }

    pub fn find_mut(&mut self, id: Uuid) -> Option<&mut T> {
        let node = self.node_of(id)?;
        self.get_mut(node)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> LedgerResult<&mut Vec<NodeId>> {
        match parent {
            None => Ok(&mut self.roots),
            Some(p) => {
                let missing = self.missing(p);
                self.nodes
                    .get_mut(p.0)
                    .and_then(Option::as_mut)
                    .map(|n| &mut n.children)
                    .ok_or(missing)
            }
        }
    }

    fn siblings(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.roots,
            Some(p) => self.children(p),
        }
    }

    /// Sibling under `parent` already called `name`, other than `except`.
    fn name_clash(&self, parent: Option<NodeId>, name: &str, except: Option<NodeId>) -> bool {
        self.siblings(parent)
            .iter()
            .filter(|c| Some(**c) != except)
            .any(|c| self.get(*c).is_some_and(|v| v.name() == name))
    }

    fn missing(&self, id: NodeId) -> LedgerError {
        let uuid = self
            .nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|n| n.value.id())
            .unwrap_or_else(Uuid::nil);
        LedgerError::NodeNotFound(uuid)
    }

    /// Inserts `value` under `parent` (top level when `None`) at `position`,
    /// appending when the position is absent or past the end.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        position: Option<usize>,
        value: T,
    ) -> LedgerResult<NodeId> {
        let uuid = value.id();
        if self.index.contains_key(&uuid) {
            return Err(LedgerError::DuplicateId(uuid));
        }
        if let Some(p) = parent {
            if self.node(p).is_none() {
                return Err(self.missing(p));
            }
        }
        check_name(value.name())?;
        if self.name_clash(parent, value.name(), None) {
            return Err(LedgerError::DuplicateName(value.name().to_string()));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            value,
            parent,
            children: Vec::new(),
        }));
        let siblings = self.siblings_mut(parent)?;
        let at = position.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, id);
        self.index.insert(uuid, id);
        Ok(id)
    }

    pub fn push(&mut self, parent: Option<NodeId>, value: T) -> LedgerResult<NodeId> {
        self.insert(parent, None, value)
    }

    /// Removes `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> LedgerResult<Removal> {
        let Some(node) = self.node(id) else {
            return Err(self.missing(id));
        };
        let parent = node.parent;
        let doomed = self.subtree(id);
        let removal = Removal {
            entries: doomed
                .iter()
                .filter_map(|n| {
                    self.get(*n).map(|v| RemovedNode {
                        id: v.id(),
                        path: self.path(*n),
                    })
                })
                .collect(),
        };
        self.siblings_mut(parent)?.retain(|c| *c != id);
        for n in doomed {
            if let Some(slot) = self.nodes.get_mut(n.0) {
                if let Some(old) = slot.take() {
                    self.index.remove(&old.value.id());
                }
            }
        }
        Ok(removal)
    }

    /// Re-parents or re-orders `id`. Moving a node under itself or one of its
    /// descendants is rejected.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
        position: Option<usize>,
    ) -> LedgerResult<()> {
        let Some(node) = self.node(id) else {
            return Err(self.missing(id));
        };
        let old_parent = node.parent;
        if let Some(p) = new_parent {
            if self.node(p).is_none() {
                return Err(self.missing(p));
            }
            if self.is_in_subtree(p, id) {
                return Err(LedgerError::CyclicMove);
            }
        }
        let name = node.value.name();
        if self.name_clash(new_parent, name, Some(id)) {
            return Err(LedgerError::DuplicateName(name.to_string()));
        }
        self.siblings_mut(old_parent)?.retain(|c| *c != id);
        let siblings = self.siblings_mut(new_parent)?;
        let at = position.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, id);
        if let Some(n) = self.nodes.get_mut(id.0).and_then(Option::as_mut) {
            n.parent = new_parent;
        }
        Ok(())
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> LedgerResult<()> {
        let name = name.trim();
        check_name(name)?;
        let Some(node) = self.node(id) else {
            return Err(self.missing(id));
        };
        if self.name_clash(node.parent, name, Some(id)) {
            return Err(LedgerError::DuplicateName(name.to_string()));
        }
        if let Some(v) = self.get_mut(id) {
            v.set_name(name.to_string());
        }
        Ok(())
    }

    /// Walks from `id` up to its top-level ancestor, `id` included.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors {
            tree: self,
            next: self.node(id).map(|_| id),
        }
    }

    /// True when `node` is `root` or lies anywhere below it.
    pub fn is_in_subtree(&self, node: NodeId, root: NodeId) -> bool {
        self.ancestors(node).any(|a| a == root)
    }

    pub fn path(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter_map(|a| self.get(a).map(Entity::name))
            .collect();
        names.reverse();
        names.join(PATH_SEPARATOR)
    }

    pub fn path_of(&self, id: Uuid) -> Option<String> {
        self.node_of(id).map(|n| self.path(n))
    }

    pub fn find_path(&self, path: &str) -> Option<NodeId> {
        let mut level: &[NodeId] = &self.roots;
        let mut found = None;
        for part in path.split(PATH_SEPARATOR).map(str::trim) {
            let hit = level
                .iter()
                .copied()
                .find(|c| self.get(*c).is_some_and(|v| v.name() == part))?;
            found = Some(hit);
            level = self.children(hit);
        }
        found
    }

    pub fn require_path(&self, path: &str) -> LedgerResult<NodeId> {
        self.find_path(path)
            .ok_or_else(|| LedgerError::UnknownPath(path.trim().to_string()))
    }

    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if self.node(n).is_none() {
                continue;
            }
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    pub fn preorder(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|r| self.subtree(*r))
            .collect()
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.preorder()
            .into_iter()
            .filter_map(move |n| self.get(n).map(|v| (n, v)))
    }
}

impl<T: Entity + Clone> Tree<T> {
    pub fn flatten(&self) -> Vec<FlatNode<T>> {
        self.iter()
            .map(|(n, v)| FlatNode {
                children: self.children(n).len(),
                node: v.clone(),
            })
            .collect()
    }

    pub fn from_flat(flat: Vec<FlatNode<T>>) -> LedgerResult<Self> {
        let mut tree = Tree::new();
        let mut open: Vec<(NodeId, usize)> = Vec::new();
        for f in flat {
            while matches!(open.last(), Some((_, 0))) {
                open.pop();
            }
            let parent = match open.last_mut() {
                Some((p, rest)) => {
                    *rest -= 1;
                    Some(*p)
                }
                None => None,
            };
            let id = tree.push(parent, f.node)?;
            open.push((id, f.children));
        }
        Ok(tree)
    }
}

pub struct Ancestors<'a, T> {
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<T: Entity> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.parent(cur);
        Some(cur)
    }
}
