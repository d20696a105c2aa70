pub mod error;
pub mod model;
pub mod profile;
pub mod proto;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{Graph, Node, NodeId, Payload};
pub use profile::{
    remote_profile, ClientConfig, FixedStatsCollector, GraphSerializer, GraphStatsCollector,
    GrpcTransport, NodeExecutor, NodeStats, ProfileSubmitter, ProfileTransport, ProfilingSession,
    SequenceMinter, StatsCollector, SubmitOutcome, TokenMinter, TransportError, UuidMinter,
    WireFormat,
};
pub use proto::{CreateProfileRequest, CreateProfileResponse, FuncInfo, WireModel};
