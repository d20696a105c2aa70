use std::time::Duration;

use log::{debug, error, info};
use thiserror::Error;
use tonic::transport::Endpoint;

use crate::proto::{CreateProfileRequest, CreateProfileResponse, ProfileServiceClient};

/// Transport-level failure. Stays behind the [`ProfileTransport`]
/// boundary; the pipeline only ever sees the rendered message.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Timeout and retry budget for one profiling session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connect and per-call timeout.
    pub request_timeout: Duration,
    /// Overall budget for the whole submission, retries included.
    pub operation_timeout: Duration,
    /// Maximum number of call attempts.
    pub attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(50_000),
            operation_timeout: Duration::from_millis(100_000),
            attempts: 3,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the default budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect/call timeout
    pub fn set_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the overall operation timeout
    pub fn set_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Set the maximum number of call attempts
    pub fn set_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

/// Boundary to the RPC layer: delivers one profile request and either
/// returns the server's response or reports why it could not.
///
/// Retry behavior is the transport's responsibility; implementations
/// receive the budget through their own configuration.
pub trait ProfileTransport {
    fn create_profile(
        &mut self,
        request: CreateProfileRequest,
    ) -> std::result::Result<CreateProfileResponse, TransportError>;
}

/// gRPC transport over a tonic channel.
///
/// Dials the target fresh per submission and retries the unary call up
/// to the configured attempt budget, all bounded by the overall
/// operation timeout. Channels are insecure (`http://`) unless the
/// address carries an explicit scheme, matching the deployments this
/// client talks to.
pub struct GrpcTransport {
    address: String,
    config: ClientConfig,
}

impl GrpcTransport {
    pub fn new(address: impl Into<String>, config: ClientConfig) -> Self {
        Self {
            address: address.into(),
            config,
        }
    }

    fn endpoint(&self) -> std::result::Result<Endpoint, TransportError> {
        let uri = if self.address.contains("://") {
            self.address.clone()
        } else {
            format!("http://{}", self.address)
        };
        Endpoint::from_shared(uri)
            .map_err(|e| TransportError(format!("invalid address {}: {}", self.address, e)))
            .map(|endpoint| {
                endpoint
                    .connect_timeout(self.config.request_timeout)
                    .timeout(self.config.request_timeout)
            })
    }

    async fn call(
        &self,
        request: CreateProfileRequest,
    ) -> std::result::Result<CreateProfileResponse, TransportError> {
        let endpoint = self.endpoint()?;
        self.call_with(|| {
            let endpoint = endpoint.clone();
            let request = request.clone();
            async move { Self::try_call(&endpoint, request).await }
        })
        .await
    }

    /// Drive `call` until it succeeds or the attempt budget runs out.
    async fn call_with<F, Fut>(
        &self,
        mut call: F,
    ) -> std::result::Result<CreateProfileResponse, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<CreateProfileResponse, TransportError>>,
    {
        let attempts = self.config.attempts.max(1);
        let mut last_error = TransportError("no attempts configured".to_string());

        for attempt in 1..=attempts {
            match call().await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    debug!(
                        "create_profile attempt {}/{} against {} failed: {}",
                        attempt, attempts, self.address, e
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn try_call(
        endpoint: &Endpoint,
        request: CreateProfileRequest,
    ) -> std::result::Result<CreateProfileResponse, TransportError> {
        let channel = endpoint
            .connect()
            .await
            .map_err(|e| TransportError(format!("connection failed: {}", e)))?;
        let mut client = ProfileServiceClient::new(channel);
        client
            .create_profile(request)
            .await
            .map(|response| response.into_inner())
            .map_err(|status| TransportError(status.message().to_string()))
    }
}

impl ProfileTransport for GrpcTransport {
    fn create_profile(
        &mut self,
        request: CreateProfileRequest,
    ) -> std::result::Result<CreateProfileResponse, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError(format!("failed to start runtime: {}", e)))?;

        runtime.block_on(async {
            tokio::time::timeout(self.config.operation_timeout, self.call(request))
                .await
                .unwrap_or_else(|_| {
                    Err(TransportError(format!(
                        "operation timed out after {}ms",
                        self.config.operation_timeout.as_millis()
                    )))
                })
        })
    }
}

/// Outcome of one submission, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the profile. Legacy servers acknowledge
    /// without assigning an id.
    Success { profile_id: Option<String> },
    /// The request did not succeed within the retry/timeout budget.
    Failure { message: String },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success { .. })
    }
}

/// Delivers a built profile request to a remote address and reports
/// the outcome.
///
/// Submission is best-effort telemetry: failures are logged with the
/// target address and surfaced only as a [`SubmitOutcome`], never as
/// an error the caller has to handle.
pub struct ProfileSubmitter {
    address: String,
    config: ClientConfig,
}

impl ProfileSubmitter {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            config: ClientConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Submit over the default gRPC transport.
    pub fn submit(&self, request: CreateProfileRequest) -> SubmitOutcome {
        let mut transport = GrpcTransport::new(self.address.clone(), self.config.clone());
        self.submit_with(request, &mut transport)
    }

    /// Submit over a caller-supplied transport.
    pub fn submit_with(
        &self,
        request: CreateProfileRequest,
        transport: &mut dyn ProfileTransport,
    ) -> SubmitOutcome {
        match transport.create_profile(request) {
            Ok(response) => {
                let profile_id = if response.profile_id.is_empty() {
                    None
                } else {
                    Some(response.profile_id)
                };
                match &profile_id {
                    Some(id) => {
                        info!("successfully created profile {} in `{}`", id, self.address)
                    }
                    None => info!("successfully created profile in `{}`", self.address),
                }
                SubmitOutcome::Success { profile_id }
            }
            Err(e) => {
                error!("failed to create profile in `{}`: {}", self.address, e);
                SubmitOutcome::Failure {
                    message: e.to_string(),
                }
            }
        }
    }
}
