//! In-memory store retaining every node for callers that need full materialization.

use super::NodeStore;
use crate::models::{Node, NodeId, NodeRecord};
use std::collections::HashMap;
use std::io;

#[derive(Debug)]
pub struct MemoryStore {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    next_id: i64,
    known_parents: Vec<NodeId>,
    scopes_begun: u32,
    scopes_committed: u32,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
            known_parents: Vec::new(),
            scopes_begun: 0,
            scopes_committed: 0,
        }
    }

    /// Treat `id` as a node that already exists outside this store, so a
    /// scan may be attached beneath it.
    #[must_use]
    pub fn with_existing_parent(mut self, id: NodeId) -> Self {
        self.known_parents.push(id);
        self.next_id = self.next_id.max(id.0 + 1);
        self
    }

    /// Nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// Direct children of `id`, in insertion order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.parent == Some(id))
    }

    /// Position of `id` in insertion order.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    #[must_use]
    pub fn scopes_begun(&self) -> u32 {
        self.scopes_begun
    }

    #[must_use]
    pub fn scopes_committed(&self) -> u32 {
        self.scopes_committed
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for MemoryStore {
    fn insert_node(&mut self, record: &NodeRecord<'_>) -> io::Result<NodeId> {
        if let Some(parent) = record.parent
            && !self.index.contains_key(&parent)
            && !self.known_parents.contains(&parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("parent node {parent} does not exist"),
            ));
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node::from_record(id, record));
        Ok(id)
    }

    fn begin_scope(&mut self) -> io::Result<()> {
        self.scopes_begun = self.scopes_begun.saturating_add(1);
        Ok(())
    }

    fn commit_scope(&mut self) -> io::Result<()> {
        if self.scopes_committed >= self.scopes_begun {
            return Err(io::Error::other("commit without an open scope"));
        }
        self.scopes_committed = self.scopes_committed.saturating_add(1);
        Ok(())
    }
}
