// Hand-maintained wire definitions for the profile service.
pub mod graphprofile;

// Re-export commonly used wire types
pub use graphprofile::{
    // Oneof payload descriptors
    func_info,
    wire_node,

    // Request/response envelope
    CreateProfileRequest,
    CreateProfileResponse,

    // Serialized graph description
    WireModel,
    WireGraph,
    WireNode,

    // Per-token metadata
    FuncInfo,
    TensorDescriptor,
    SparseTensorDescriptor,

    // gRPC client
    profile_service_client::ProfileServiceClient,
};
