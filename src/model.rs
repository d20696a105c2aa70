use std::collections::HashSet;

use crate::error::{Error, Result};

/// Unique identifier for a node in the graph.
///
/// A `NodeId` is the node's index in the owning [`Graph`] arena. It is
/// assigned once at construction time and never depends on memory
/// addresses, so it stays valid for the lifetime of the graph and can
/// be used as a join key between evaluation stats and serialized
/// output.
pub type NodeId = usize;

/// Payload carried by a node: dense or sparse tensor data.
///
/// The profiling pipeline never reads the data itself, only which of
/// the two layouts the node uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Dense,
    Sparse,
}

/// Node in the computation graph
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub op: String,
    /// Arena indices of this node's data dependencies, in argument order.
    pub inputs: Vec<NodeId>,
    /// Ordered dimension sizes; every entry is non-negative.
    pub shape: Vec<i64>,
    pub payload: Payload,
}

/// Computation graph arena.
///
/// Nodes are stored in insertion order. [`Graph::add_node`] only
/// accepts inputs that already exist, so arena order is a valid
/// dependency order (inputs always precede their consumers) and the
/// graph is acyclic by construction.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node to the arena and return its id.
    ///
    /// Fails if any input refers to a node that does not exist yet, or
    /// if the shape contains a negative dimension.
    pub fn add_node(
        &mut self,
        op: impl Into<String>,
        inputs: Vec<NodeId>,
        shape: Vec<i64>,
        payload: Payload,
    ) -> Result<NodeId> {
        let id = self.nodes.len();

        for &input in &inputs {
            if input >= id {
                return Err(Error::InvalidGraph(format!(
                    "Node {} references undefined input {}",
                    id, input
                )));
            }
        }

        if let Some(&dim) = shape.iter().find(|&&d| d < 0) {
            return Err(Error::InvalidGraph(format!(
                "Node {} has negative dimension {}",
                id, dim
            )));
        }

        self.nodes.push(Node {
            id,
            op: op.into(),
            inputs,
            shape,
            payload,
        });

        Ok(id)
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All nodes in arena order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Collect the nodes reachable from the given roots, in dependency
    /// order (every node's inputs appear before the node itself).
    ///
    /// Fails if any root is not a node of this graph.
    pub fn reachable(&self, roots: &[NodeId]) -> Result<Vec<NodeId>> {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();

        for &root in roots {
            if root >= self.nodes.len() {
                return Err(Error::InvalidGraph(format!(
                    "Root {} is not a node of this graph",
                    root
                )));
            }
            stack.push(root);
        }

        while let Some(id) = stack.pop() {
            if visited.insert(id) {
                stack.extend(&self.nodes[id].inputs);
            }
        }

        // Arena order is already topological, so sorting the reachable
        // set by index restores dependency order.
        let mut order: Vec<NodeId> = visited.into_iter().collect();
        order.sort_unstable();
        Ok(order)
    }
}
