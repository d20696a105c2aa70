use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{Graph, Node, NodeId, Payload};
use crate::profile::collector::NodeStats;
use crate::proto::{
    func_info, wire_node, CreateProfileRequest, FuncInfo, SparseTensorDescriptor,
    TensorDescriptor, WireGraph, WireModel, WireNode,
};

/// Wire-format variant of the profile request.
///
/// A deployment uses exactly one variant, matching its server. Both
/// variants share the whole pipeline; only the final metadata assembly
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// Flat token-to-runtime map.
    Legacy,
    /// Per-token shape descriptor and runtime.
    #[default]
    Extended,
}

/// Builds the transmissible profile request from a graph, its token
/// assignment, and the collected stats.
pub struct GraphSerializer;

impl GraphSerializer {
    /// Serialize the graph reachable from `roots` into a
    /// [`CreateProfileRequest`].
    ///
    /// Every node reference in the output is expressed as its token.
    /// Fails if a reachable node is missing from the token map or the
    /// stats map; both indicate an upstream collection bug.
    pub fn build_request(
        graph: &Graph,
        roots: &[NodeId],
        tokens: &HashMap<NodeId, String>,
        stats: &NodeStats,
        format: WireFormat,
    ) -> Result<CreateProfileRequest> {
        let order = graph.reachable(roots)?;

        let mut request = CreateProfileRequest::default();
        let mut wire_graph = WireGraph {
            node: Vec::with_capacity(order.len()),
            output: Vec::with_capacity(roots.len()),
            name: String::new(),
        };

        for id in order {
            let node = graph.node(id).expect("reachable node exists");
            let token = Self::token_of(tokens, id)?;
            let runtime = stats
                .get(&id)
                .ok_or_else(|| {
                    Error::SerializationFailure(format!(
                        "Node {} has no recorded duration",
                        id
                    ))
                })?
                .as_micros() as u64;

            let input = node
                .inputs
                .iter()
                .map(|&arg| Self::token_of(tokens, arg).map(str::to_owned))
                .collect::<Result<Vec<_>>>()?;

            wire_graph.node.push(WireNode {
                token: token.to_owned(),
                op: node.op.clone(),
                input,
                data: Some(Self::node_data(node, token)),
            });

            match format {
                WireFormat::Extended => {
                    request.operator_data.insert(
                        token.to_owned(),
                        FuncInfo {
                            runtime,
                            shape_descriptor: Some(Self::shape_descriptor(node, token)),
                        },
                    );
                }
                WireFormat::Legacy => {
                    request.runtime.insert(token.to_owned(), runtime);
                }
            }
        }

        for &root in roots {
            wire_graph.output.push(Self::token_of(tokens, root)?.to_owned());
        }

        request.model = Some(WireModel {
            graph: Some(wire_graph),
            producer: env!("CARGO_PKG_NAME").to_string(),
        });

        Ok(request)
    }

    fn token_of(tokens: &HashMap<NodeId, String>, id: NodeId) -> Result<&str> {
        tokens.get(&id).map(String::as_str).ok_or_else(|| {
            Error::SerializationFailure(format!("Node {} has no minted token", id))
        })
    }

    /// Descriptor of the node's dense payload. `dims` always equal the
    /// node's own shape.
    fn dense_descriptor(node: &Node, token: &str) -> TensorDescriptor {
        TensorDescriptor {
            name: token.to_owned(),
            dims: node.shape.clone(),
        }
    }

    /// Descriptor of the node's sparse payload, mirroring the dense
    /// shape in both the values block and the outer dims.
    fn sparse_descriptor(node: &Node, token: &str) -> SparseTensorDescriptor {
        SparseTensorDescriptor {
            values: Some(Self::dense_descriptor(node, token)),
            dims: node.shape.clone(),
        }
    }

    fn node_data(node: &Node, token: &str) -> wire_node::Data {
        match node.payload {
            Payload::Dense => wire_node::Data::DenseData(Self::dense_descriptor(node, token)),
            Payload::Sparse => wire_node::Data::SparseData(Self::sparse_descriptor(node, token)),
        }
    }

    fn shape_descriptor(node: &Node, token: &str) -> func_info::ShapeDescriptor {
        match node.payload {
            Payload::Dense => {
                func_info::ShapeDescriptor::DenseData(Self::dense_descriptor(node, token))
            }
            Payload::Sparse => {
                func_info::ShapeDescriptor::SparseData(Self::sparse_descriptor(node, token))
            }
        }
    }
}
