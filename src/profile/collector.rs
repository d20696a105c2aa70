use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::model::{Graph, NodeId};

/// Wall-clock duration of every node visited during one evaluation pass.
pub type NodeStats = HashMap<NodeId, Duration>;

/// Boundary to the execution engine: computes a single node whose
/// inputs have already been computed.
///
/// The profiling pipeline does not evaluate anything itself; callers
/// adapt their engine behind this trait. Errors abort the whole
/// profiling attempt.
pub trait NodeExecutor {
    fn execute(&mut self, graph: &Graph, node: NodeId) -> Result<()>;
}

impl<F> NodeExecutor for F
where
    F: FnMut(&Graph, NodeId) -> Result<()>,
{
    fn execute(&mut self, graph: &Graph, node: NodeId) -> Result<()> {
        self(graph, node)
    }
}

/// Source of per-node timing for a root set.
///
/// [`GraphStatsCollector`] is the standard implementation; engines
/// that already track their own timing can implement this directly.
pub trait StatsCollector {
    /// Evaluate the graph reachable from `roots` and return one
    /// duration per visited node.
    fn evaluate(&mut self, graph: &Graph, roots: &[NodeId]) -> Result<NodeStats>;
}

/// Evaluates a graph through a [`NodeExecutor`] and records how long
/// each visited node took.
///
/// Nodes are executed in dependency order (inputs before consumers);
/// nodes unreachable from the roots are never executed and never
/// appear in the stats. Timing only observes the execution order, it
/// does not alter it.
pub struct GraphStatsCollector<E> {
    executor: E,
}

impl<E: NodeExecutor> GraphStatsCollector<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E: NodeExecutor> StatsCollector for GraphStatsCollector<E> {
    fn evaluate(&mut self, graph: &Graph, roots: &[NodeId]) -> Result<NodeStats> {
        let order = graph.reachable(roots)?;
        let mut stats = NodeStats::with_capacity(order.len());

        for id in order {
            let start = Instant::now();
            self.executor.execute(graph, id)?;
            stats.insert(id, start.elapsed());
        }

        Ok(stats)
    }
}

/// Collector returning a fixed duration map without executing anything.
///
/// Stands in for an engine that reports its own timing; also the
/// deterministic stats source used by the test suites.
#[derive(Debug, Clone, Default)]
pub struct FixedStatsCollector {
    durations: HashMap<NodeId, Duration>,
}

impl FixedStatsCollector {
    pub fn new(durations: HashMap<NodeId, Duration>) -> Self {
        Self { durations }
    }
}

impl StatsCollector for FixedStatsCollector {
    fn evaluate(&mut self, graph: &Graph, roots: &[NodeId]) -> Result<NodeStats> {
        // Restrict to the reachable set so fixed stats obey the same
        // contract as measured ones.
        let order = graph.reachable(roots)?;
        Ok(order
            .into_iter()
            .filter_map(|id| self.durations.get(&id).map(|&d| (id, d)))
            .collect())
    }
}
