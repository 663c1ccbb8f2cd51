//! Name-to-logger map with placeholder-aware parent resolution.
//!
//! Loggers live in a flat arena addressed by [`NodeId`]; parent links are
//! arena indices held next to each node, so a node never owns its parent or
//! its children. The name map holds either a real node or a [`PlaceHolder`]
//! for a name that has only been seen as an ancestor of another logger.
//!
//! The manager itself is not synchronised. The owning registry wraps it in a
//! `parking_lot::RwLock`: creation takes the write lock because the fixup
//! steps mutate several entries that must change together.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::level::Level;
use crate::logger::LoggerNode;

/// Stable index of a logger in its registry's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Loggers waiting for a missing ancestor name to be created.
#[derive(Debug, Default)]
pub(crate) struct PlaceHolder {
    pending: Vec<NodeId>,
}

impl PlaceHolder {
    fn new(first: NodeId) -> Self {
        Self {
            pending: vec![first],
        }
    }

    fn append(&mut self, id: NodeId) {
        if !self.pending.contains(&id) {
            self.pending.push(id);
        }
    }
}

#[derive(Debug)]
pub(crate) enum Slot {
    Real(NodeId),
    Pending(PlaceHolder),
}

#[derive(Debug)]
struct ArenaEntry {
    node: Arc<LoggerNode>,
    parent: Option<NodeId>,
}

#[derive(Debug)]
pub(crate) struct Manager {
    separator: char,
    nodes: Vec<ArenaEntry>,
    by_name: HashMap<String, Slot>,
}

impl Manager {
    /// Create a manager holding only the root logger at `root_level`.
    pub(crate) fn new(separator: char, root_level: Level) -> Self {
        let root = ArenaEntry {
            node: Arc::new(LoggerNode::new(NodeId::ROOT, String::new(), Some(root_level))),
            parent: None,
        };
        Self {
            separator,
            nodes: vec![root],
            by_name: HashMap::new(),
        }
    }

    pub(crate) fn separator(&self) -> char {
        self.separator
    }

    pub(crate) fn node(&self, id: NodeId) -> &Arc<LoggerNode> {
        &self.nodes[id.0].node
    }

    pub(crate) fn root(&self) -> &Arc<LoggerNode> {
        self.node(NodeId::ROOT)
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Return the real logger registered under `name`, if any.
    pub(crate) fn lookup(&self, name: &str) -> Option<NodeId> {
        if name.is_empty() {
            return Some(NodeId::ROOT);
        }
        match self.by_name.get(name) {
            Some(Slot::Real(id)) => Some(*id),
            _ => None,
        }
    }

    pub(crate) fn is_placeholder(&self, name: &str) -> bool {
        matches!(self.by_name.get(name), Some(Slot::Pending(_)))
    }

    /// Names of every real logger except root, sorted.
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Real(_)))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Every node in creation order, root first.
    pub(crate) fn nodes(&self) -> impl Iterator<Item = &Arc<LoggerNode>> {
        self.nodes.iter().map(|entry| &entry.node)
    }

    /// Nodes from `id` up to and including root.
    pub(crate) fn ancestry(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |cur| self.parent_of(*cur))
    }

    /// Loggers whose nearest real ancestor is `id`.
    pub(crate) fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.parent == Some(id))
            .map(|(index, _)| NodeId(index))
            .collect()
    }

    /// Resolve `identifier` to the logger with the longest matching name,
    /// stripping one trailing segment at a time. Falls back to root.
    pub(crate) fn longest_prefix_match(&self, identifier: &str) -> NodeId {
        let mut candidate = identifier;
        loop {
            if let Some(id) = self.lookup(candidate) {
                return id;
            }
            match candidate.rsplit_once(self.separator) {
                Some((prefix, _)) => candidate = prefix,
                None => return NodeId::ROOT,
            }
        }
    }

    /// Return the logger called `name`, creating it and repairing the tree
    /// if needed.
    pub(crate) fn get_or_create(&mut self, name: &str) -> NodeId {
        if name.is_empty() {
            return NodeId::ROOT;
        }
        if let Some(Slot::Real(existing)) = self.by_name.get(name) {
            return *existing;
        }
        let id = NodeId(self.nodes.len());
        let placeholder = match self.by_name.insert(name.to_owned(), Slot::Real(id)) {
            Some(Slot::Pending(ph)) => Some(ph),
            _ => None,
        };
        self.nodes.push(ArenaEntry {
            node: Arc::new(LoggerNode::new(id, name.to_owned(), None)),
            parent: Some(NodeId::ROOT),
        });
        if let Some(ph) = placeholder {
            debug!(
                "promoting placeholder '{name}' with {} pending logger(s)",
                ph.pending.len()
            );
            self.fixup_children(ph, id);
        }
        self.fixup_parents(id);
        id
    }

    /// Point `id` at its nearest real ancestor, registering it with every
    /// placeholder passed on the way.
    fn fixup_parents(&mut self, id: NodeId) {
        let name = self.node(id).name().to_owned();
        let mut parent = NodeId::ROOT;
        let mut current = name.as_str();
        while let Some((prefix, _)) = current.rsplit_once(self.separator) {
            if prefix.is_empty() {
                break;
            }
            match self.by_name.get_mut(prefix) {
                None => {
                    trace!("placeholder '{prefix}' created for '{name}'");
                    self.by_name
                        .insert(prefix.to_owned(), Slot::Pending(PlaceHolder::new(id)));
                }
                Some(Slot::Pending(ph)) => ph.append(id),
                Some(Slot::Real(found)) => {
                    parent = *found;
                    break;
                }
            }
            current = prefix;
        }
        self.nodes[id.0].parent = Some(parent);
    }

    /// Re-parent loggers that were waiting on the name now held by `id`.
    ///
    /// A waiting logger whose parent already sits at or below `id` keeps it;
    /// any other is moved under `id`, and `id` takes over its old parent.
    fn fixup_children(&mut self, ph: PlaceHolder, id: NodeId) {
        let name = self.node(id).name().to_owned();
        for child in ph.pending {
            let Some(current) = self.parent_of(child) else {
                continue;
            };
            if self.is_same_or_descendant(self.node(current).name(), &name) {
                continue;
            }
            self.nodes[id.0].parent = Some(current);
            self.nodes[child.0].parent = Some(id);
        }
    }

    fn is_same_or_descendant(&self, candidate: &str, ancestor: &str) -> bool {
        match candidate.strip_prefix(ancestor) {
            Some(rest) => rest.is_empty() || rest.starts_with(self.separator),
            None => false,
        }
    }
}
