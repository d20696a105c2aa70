use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use prost::Message;

use graph_profiler::{
    proto::func_info,
    Error, Graph, GraphSerializer, GraphStatsCollector, NodeId, Payload, SequenceMinter,
    StatsCollector, TokenMinter, UuidMinter, WireFormat,
};

// Helper to build a diamond a -> (b, c) -> d, plus an unreachable node e
fn diamond_graph() -> (Graph, [NodeId; 5]) {
    let mut graph = Graph::new();
    let a = graph
        .add_node("variable", vec![], vec![2, 3], Payload::Dense)
        .unwrap();
    let b = graph.add_node("sin", vec![a], vec![2, 3], Payload::Dense).unwrap();
    let c = graph.add_node("cos", vec![a], vec![2, 3], Payload::Dense).unwrap();
    let d = graph
        .add_node("add", vec![b, c], vec![2, 3], Payload::Dense)
        .unwrap();
    let e = graph
        .add_node("variable", vec![], vec![7], Payload::Sparse)
        .unwrap();
    (graph, [a, b, c, d, e])
}

fn mint_tokens(graph: &Graph, roots: &[NodeId], minter: &dyn TokenMinter) -> HashMap<NodeId, String> {
    graph
        .reachable(roots)
        .unwrap()
        .into_iter()
        .map(|id| (id, minter.next_token()))
        .collect()
}

fn uniform_stats(tokens: &HashMap<NodeId, String>, micros: u64) -> HashMap<NodeId, Duration> {
    tokens
        .keys()
        .map(|&id| (id, Duration::from_micros(micros)))
        .collect()
}

#[test]
fn test_add_node_rejects_forward_reference() {
    let mut graph = Graph::new();
    let result = graph.add_node("add", vec![0], vec![1], Payload::Dense);
    assert!(matches!(result, Err(Error::InvalidGraph(_))));
}

#[test]
fn test_add_node_rejects_negative_dimension() {
    let mut graph = Graph::new();
    let result = graph.add_node("variable", vec![], vec![2, -1], Payload::Dense);
    assert!(matches!(result, Err(Error::InvalidGraph(_))));
}

#[test]
fn test_reachable_rejects_unknown_root() {
    let (graph, _) = diamond_graph();
    assert!(matches!(graph.reachable(&[99]), Err(Error::InvalidGraph(_))));
}

#[test]
fn test_reachable_is_dependency_ordered() {
    let (graph, [a, b, c, d, e]) = diamond_graph();

    let order = graph.reachable(&[d]).unwrap();
    assert_eq!(order.len(), 4);
    assert!(!order.contains(&e));

    let position: HashMap<NodeId, usize> =
        order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    for &id in &[a, b, c, d] {
        for &input in &graph.node(id).unwrap().inputs {
            assert!(position[&input] < position[&id]);
        }
    }
}

#[test]
fn test_reachable_ordering_holds_on_random_graphs() {
    use rand::prelude::*;

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let mut graph = Graph::new();
        let mut ids = Vec::new();
        for i in 0..100usize {
            let inputs = if i == 0 {
                vec![]
            } else {
                (0..rng.gen_range(0..3usize.min(i)))
                    .map(|_| ids[rng.gen_range(0..i)])
                    .collect()
            };
            ids.push(graph.add_node("op", inputs, vec![1], Payload::Dense).unwrap());
        }

        let root = ids[rng.gen_range(0..ids.len())];
        let order = graph.reachable(&[root]).unwrap();
        let position: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        for &id in &order {
            for &input in &graph.node(id).unwrap().inputs {
                assert!(position[&input] < position[&id]);
            }
        }
    }
}

#[test]
fn test_collector_visits_exactly_reachable_nodes() {
    let (graph, [a, b, c, d, e]) = diamond_graph();

    let mut executed = Vec::new();
    let mut collector = GraphStatsCollector::new(|_: &Graph, id: NodeId| {
        executed.push(id);
        Ok(())
    });
    let stats = collector.evaluate(&graph, &[d]).unwrap();

    let visited: HashSet<NodeId> = stats.keys().copied().collect();
    assert_eq!(visited, HashSet::from([a, b, c, d]));
    assert!(!visited.contains(&e));
    assert_eq!(executed.len(), 4);
}

#[test]
fn test_collector_evaluation_failure_aborts() {
    let (graph, [_, b, _, d, _]) = diamond_graph();

    let mut collector = GraphStatsCollector::new(move |_: &Graph, id: NodeId| {
        if id == b {
            Err(Error::EvaluationFailure("kernel panic in sin".to_string()))
        } else {
            Ok(())
        }
    });

    let result = collector.evaluate(&graph, &[d]);
    assert!(matches!(result, Err(Error::EvaluationFailure(_))));
}

#[test]
fn test_uuid_minter_unique_100k_sequential() {
    let minter = UuidMinter::new();
    let mut seen = HashSet::with_capacity(100_000);
    for _ in 0..100_000 {
        assert!(seen.insert(minter.next_token()));
    }
}

#[test]
fn test_uuid_minters_unique_across_concurrent_sessions() {
    let first = Arc::new(UuidMinter::new());
    let second = Arc::new(UuidMinter::new());

    let mut handles = Vec::new();
    for minter in [first, second] {
        for _ in 0..2 {
            let minter = Arc::clone(&minter) as Arc<dyn TokenMinter>;
            handles.push(std::thread::spawn(move || {
                (0..10_000).map(|_| minter.next_token()).collect::<Vec<_>>()
            }));
        }
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for token in handle.join().unwrap() {
            assert!(seen.insert(token));
        }
    }
    assert_eq!(seen.len(), 40_000);
}

#[test]
fn test_sequence_minter_is_deterministic() {
    let minter = SequenceMinter::new();
    assert_eq!(minter.next_token(), "u1");
    assert_eq!(minter.next_token(), "u2");

    let custom = SequenceMinter::with_prefix("node-");
    assert_eq!(custom.next_token(), "node-1");
}

#[test]
fn test_serializer_metadata_keys_match_reachable_tokens() {
    let (graph, [_, _, _, d, _]) = diamond_graph();
    let minter = SequenceMinter::new();
    let tokens = mint_tokens(&graph, &[d], &minter);
    let stats = uniform_stats(&tokens, 10);

    let request =
        GraphSerializer::build_request(&graph, &[d], &tokens, &stats, WireFormat::Extended)
            .unwrap();

    let expected: HashSet<&String> = tokens.values().collect();
    let actual: HashSet<&String> = request.operator_data.keys().collect();
    assert_eq!(actual, expected);
    assert!(request.runtime.is_empty());
}

#[test]
fn test_serializer_extended_dims_mirror_node_shape() {
    let mut graph = Graph::new();
    let dense = graph
        .add_node("variable", vec![], vec![4, 5, 6], Payload::Dense)
        .unwrap();
    let sparse = graph
        .add_node("mask", vec![dense], vec![4, 5, 6], Payload::Sparse)
        .unwrap();

    let minter = SequenceMinter::new();
    let tokens = mint_tokens(&graph, &[sparse], &minter);
    let stats = uniform_stats(&tokens, 1);

    let request =
        GraphSerializer::build_request(&graph, &[sparse], &tokens, &stats, WireFormat::Extended)
            .unwrap();

    for (&id, token) in &tokens {
        let shape = &graph.node(id).unwrap().shape;
        let info = &request.operator_data[token];
        match info.shape_descriptor.as_ref().unwrap() {
            func_info::ShapeDescriptor::DenseData(desc) => {
                assert_eq!(graph.node(id).unwrap().payload, Payload::Dense);
                assert_eq!(&desc.dims, shape);
            }
            func_info::ShapeDescriptor::SparseData(desc) => {
                assert_eq!(graph.node(id).unwrap().payload, Payload::Sparse);
                assert_eq!(&desc.dims, shape);
                assert_eq!(&desc.values.as_ref().unwrap().dims, shape);
            }
        }
    }
}

#[test]
fn test_serializer_legacy_populates_runtime_map_only() {
    let (graph, [_, _, _, d, _]) = diamond_graph();
    let minter = SequenceMinter::new();
    let tokens = mint_tokens(&graph, &[d], &minter);
    let stats = uniform_stats(&tokens, 25);

    let request =
        GraphSerializer::build_request(&graph, &[d], &tokens, &stats, WireFormat::Legacy).unwrap();

    assert!(request.operator_data.is_empty());
    assert_eq!(request.runtime.len(), tokens.len());
    for token in tokens.values() {
        assert_eq!(request.runtime[token], 25);
    }
}

#[test]
fn test_serializer_topology_uses_tokens() {
    let (graph, [a, b, c, d, _]) = diamond_graph();
    let minter = SequenceMinter::new();
    let tokens = mint_tokens(&graph, &[d], &minter);
    let stats = uniform_stats(&tokens, 1);

    let request =
        GraphSerializer::build_request(&graph, &[d], &tokens, &stats, WireFormat::Extended)
            .unwrap();

    let wire_graph = request.model.unwrap().graph.unwrap();
    assert_eq!(wire_graph.output, vec![tokens[&d].clone()]);

    let by_token: HashMap<&String, &graph_profiler::proto::WireNode> =
        wire_graph.node.iter().map(|n| (&n.token, n)).collect();
    assert_eq!(by_token.len(), 4);

    let add = by_token[&tokens[&d]];
    assert_eq!(add.op, "add");
    assert_eq!(add.input, vec![tokens[&b].clone(), tokens[&c].clone()]);

    let var = by_token[&tokens[&a]];
    assert!(var.input.is_empty());
}

#[test]
fn test_serializer_missing_token_is_fatal() {
    let (graph, [_, _, _, d, _]) = diamond_graph();
    let minter = SequenceMinter::new();
    let mut tokens = mint_tokens(&graph, &[d], &minter);
    let stats = uniform_stats(&tokens, 1);
    tokens.remove(&d);

    let result = GraphSerializer::build_request(&graph, &[d], &tokens, &stats, WireFormat::Extended);
    assert!(matches!(result, Err(Error::SerializationFailure(_))));
}

#[test]
fn test_serializer_missing_duration_is_fatal() {
    let (graph, [_, _, _, d, _]) = diamond_graph();
    let minter = SequenceMinter::new();
    let tokens = mint_tokens(&graph, &[d], &minter);
    let mut stats = uniform_stats(&tokens, 1);
    stats.remove(&d);

    let result = GraphSerializer::build_request(&graph, &[d], &tokens, &stats, WireFormat::Extended);
    assert!(matches!(result, Err(Error::SerializationFailure(_))));
}

#[test]
fn test_request_survives_wire_roundtrip() {
    let (graph, [_, _, _, d, _]) = diamond_graph();
    let minter = SequenceMinter::new();
    let tokens = mint_tokens(&graph, &[d], &minter);
    let stats = uniform_stats(&tokens, 42);

    let request =
        GraphSerializer::build_request(&graph, &[d], &tokens, &stats, WireFormat::Extended)
            .unwrap();

    let bytes = request.encode_to_vec();
    let decoded = graph_profiler::CreateProfileRequest::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded, request);
}
