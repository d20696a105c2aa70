use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use crate::error::Result;
use crate::model::{Graph, NodeId};
use crate::profile::collector::{GraphStatsCollector, NodeExecutor, StatsCollector};
use crate::profile::serializer::{GraphSerializer, WireFormat};
use crate::profile::submitter::{ClientConfig, ProfileSubmitter, ProfileTransport, SubmitOutcome};
use crate::profile::token::{TokenMinter, UuidMinter};

/// One profiling run: evaluate, collect stats, mint tokens, serialize,
/// submit, log the outcome.
///
/// All collaborators are injected and default to the production set:
/// UUID tokens, the extended wire format, and the standard timeout and
/// retry budget. Sessions share no state beyond the minter, so
/// concurrent runs over different graphs are independent.
pub struct ProfilingSession {
    minter: Arc<dyn TokenMinter>,
    format: WireFormat,
    config: ClientConfig,
}

impl ProfilingSession {
    pub fn new() -> Self {
        Self {
            minter: Arc::new(UuidMinter::new()),
            format: WireFormat::default(),
            config: ClientConfig::default(),
        }
    }

    /// Use a caller-supplied token minter
    pub fn with_minter(mut self, minter: Arc<dyn TokenMinter>) -> Self {
        self.minter = minter;
        self
    }

    /// Select the wire-format variant
    pub fn with_format(mut self, format: WireFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the transport timeout/retry budget
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the full pipeline against `address` over the default gRPC
    /// transport.
    ///
    /// Evaluation and serialization failures are returned as errors;
    /// submission failures are logged and reported through the
    /// returned [`SubmitOutcome`].
    pub fn run(
        &self,
        graph: &Graph,
        roots: &[NodeId],
        collector: &mut dyn StatsCollector,
        address: &str,
    ) -> Result<SubmitOutcome> {
        let submitter = ProfileSubmitter::new(address).with_config(self.config.clone());
        let request = self.build(graph, roots, collector, address)?;
        Ok(submitter.submit(request))
    }

    /// Run the full pipeline over a caller-supplied transport.
    pub fn run_with_transport(
        &self,
        graph: &Graph,
        roots: &[NodeId],
        collector: &mut dyn StatsCollector,
        address: &str,
        transport: &mut dyn ProfileTransport,
    ) -> Result<SubmitOutcome> {
        let submitter = ProfileSubmitter::new(address).with_config(self.config.clone());
        let request = self.build(graph, roots, collector, address)?;
        Ok(submitter.submit_with(request, transport))
    }

    /// Evaluate, mint tokens, and serialize; everything up to the wire.
    fn build(
        &self,
        graph: &Graph,
        roots: &[NodeId],
        collector: &mut dyn StatsCollector,
        address: &str,
    ) -> Result<crate::proto::CreateProfileRequest> {
        info!("profiling to remote address {}", address);

        let stats = collector.evaluate(graph, roots)?;

        let mut tokens: HashMap<NodeId, String> = HashMap::with_capacity(stats.len());
        for &id in stats.keys() {
            tokens.insert(id, self.minter.next_token());
        }

        GraphSerializer::build_request(graph, roots, &tokens, &stats, self.format)
    }
}

impl Default for ProfilingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Profile the graph reachable from `roots` and report it to `address`.
///
/// Fire-and-forget: the submission outcome is only logged. Evaluation
/// and serialization failures still surface as errors, since a graph
/// that could not be measured must not disappear silently.
pub fn remote_profile<E: NodeExecutor>(
    address: &str,
    graph: &Graph,
    roots: &[NodeId],
    executor: E,
) -> Result<()> {
    let mut collector = GraphStatsCollector::new(executor);
    ProfilingSession::new()
        .run(graph, roots, &mut collector, address)
        .map(|_| ())
}
