// Profiling pipeline
//
// This module provides the client-side profiling pipeline: instrumented
// graph evaluation, token minting, wire-model serialization, and
// submission of the result to a remote profiling service.

mod collector;
mod serializer;
mod session;
mod submitter;
mod token;

// Re-export public API
pub use collector::{
    FixedStatsCollector, GraphStatsCollector, NodeExecutor, NodeStats, StatsCollector,
};
pub use serializer::{GraphSerializer, WireFormat};
pub use session::{remote_profile, ProfilingSession};
pub use submitter::{
    ClientConfig, GrpcTransport, ProfileSubmitter, ProfileTransport, SubmitOutcome,
    TransportError,
};
pub use token::{SequenceMinter, TokenMinter, UuidMinter};
