//! Node stores: where the walker sends each row and gets back its id.

use crate::models::{NodeId, NodeRecord};
use std::io;

/// Trait implemented by stores that persist node rows.
pub trait NodeStore {
    /// Durably record one node and return the id assigned to it.
    ///
    /// Implementations must reject a record whose `parent` does not name an
    /// already inserted node.
    fn insert_node(&mut self, record: &NodeRecord<'_>) -> io::Result<NodeId>;

    /// Open a scope bracketing every insert of one scan.
    fn begin_scope(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Make every insert since `begin_scope` durable.
    fn commit_scope(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: NodeStore + ?Sized> NodeStore for &mut S {
    fn insert_node(&mut self, record: &NodeRecord<'_>) -> io::Result<NodeId> {
        (**self).insert_node(record)
    }

    fn begin_scope(&mut self) -> io::Result<()> {
        (**self).begin_scope()
    }

    fn commit_scope(&mut self) -> io::Result<()> {
        (**self).commit_scope()
    }
}

pub mod memory;
pub mod sqlite;
