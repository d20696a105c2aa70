use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid graph structure: {0}")]
    InvalidGraph(String),

    #[error("Evaluation failed: {0}")]
    EvaluationFailure(String),

    #[error("Serialization failed: {0}")]
    SerializationFailure(String),

    #[error("Protobuf decoding error: {0}")]
    ProtobufError(#[from] prost::DecodeError),
}
