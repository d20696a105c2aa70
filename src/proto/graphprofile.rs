//! Wire format of the `graphprofile.ProfileService` gRPC API.
//!
//! The messages are hand-maintained prost structs; field numbers are
//! part of the wire contract with the profiling service and must not
//! be renumbered. The client stub mirrors the layout tonic generates
//! for a unary service.

/// Descriptor for a dense tensor: its wire name and ordered dimensions.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TensorDescriptor {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(int64, repeated, tag = "2")]
    pub dims: ::prost::alloc::vec::Vec<i64>,
}

/// Descriptor for a sparse tensor. `dims` is the dense shape of the
/// whole tensor; `values` describes the non-zero value block.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SparseTensorDescriptor {
    #[prost(message, optional, tag = "1")]
    pub values: ::core::option::Option<TensorDescriptor>,
    #[prost(int64, repeated, tag = "2")]
    pub dims: ::prost::alloc::vec::Vec<i64>,
}

/// Per-token profiling metadata for one graph node.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FuncInfo {
    /// Measured runtime of the node, in microseconds.
    #[prost(uint64, tag = "3")]
    pub runtime: u64,
    #[prost(oneof = "func_info::ShapeDescriptor", tags = "1, 2")]
    pub shape_descriptor: ::core::option::Option<func_info::ShapeDescriptor>,
}

/// Nested message and enum types in `FuncInfo`.
pub mod func_info {
    /// Shape descriptor mirroring the node's own payload layout. The
    /// recorded dims always equal the node's shape.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum ShapeDescriptor {
        #[prost(message, tag = "1")]
        DenseData(super::TensorDescriptor),
        #[prost(message, tag = "2")]
        SparseData(super::SparseTensorDescriptor),
    }
}

/// One node of the serialized graph. All references are expressed as
/// tokens, never as in-process identities.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WireNode {
    /// Token standing in for the node's identity.
    #[prost(string, tag = "1")]
    pub token: ::prost::alloc::string::String,
    /// Operator name.
    #[prost(string, tag = "2")]
    pub op: ::prost::alloc::string::String,
    /// Tokens of this node's data dependencies, in argument order.
    #[prost(string, repeated, tag = "3")]
    pub input: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(oneof = "wire_node::Data", tags = "4, 5")]
    pub data: ::core::option::Option<wire_node::Data>,
}

/// Nested message and enum types in `WireNode`.
pub mod wire_node {
    /// Payload descriptor of the node.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "4")]
        DenseData(super::TensorDescriptor),
        #[prost(message, tag = "5")]
        SparseData(super::SparseTensorDescriptor),
    }
}

/// Topology of the serialized graph.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WireGraph {
    #[prost(message, repeated, tag = "1")]
    pub node: ::prost::alloc::vec::Vec<WireNode>,
    /// Tokens of the graph roots (the outputs the caller asked to
    /// profile). Edges are reconstructed from node inputs.
    #[prost(string, repeated, tag = "2")]
    pub output: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "3")]
    pub name: ::prost::alloc::string::String,
}

/// Self-contained description of a profiled graph.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WireModel {
    #[prost(message, optional, tag = "1")]
    pub graph: ::core::option::Option<WireGraph>,
    #[prost(string, tag = "2")]
    pub producer: ::prost::alloc::string::String,
}

/// Request to record one profiling run.
///
/// Exactly one of `operator_data` (extended protocol) and `runtime`
/// (legacy protocol) is populated; the field numbers are distinct so a
/// server expecting either shape decodes the one it knows.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateProfileRequest {
    #[prost(message, optional, tag = "1")]
    pub model: ::core::option::Option<WireModel>,
    #[prost(map = "string, message", tag = "2")]
    pub operator_data: ::std::collections::HashMap<::prost::alloc::string::String, FuncInfo>,
    #[prost(map = "string, uint64", tag = "3")]
    pub runtime: ::std::collections::HashMap<::prost::alloc::string::String, u64>,
}

/// Server acknowledgement. Legacy deployments leave `profile_id` empty.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateProfileResponse {
    #[prost(string, tag = "1")]
    pub profile_id: ::prost::alloc::string::String,
}

/// Client implementation for the profile service.
pub mod profile_service_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::http::Uri;
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct ProfileServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl ProfileServiceClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> ProfileServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }

        /// Record one profiling run and return the assigned profile id.
        pub async fn create_profile(
            &mut self,
            request: impl tonic::IntoRequest<super::CreateProfileRequest>,
        ) -> std::result::Result<tonic::Response<super::CreateProfileResponse>, tonic::Status>
        {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/graphprofile.ProfileService/CreateProfile",
            );
            let mut req = request.into_request();
            req.extensions_mut().insert(GrpcMethod::new(
                "graphprofile.ProfileService",
                "CreateProfile",
            ));
            self.inner.unary(req, path, codec).await
        }
    }
}
