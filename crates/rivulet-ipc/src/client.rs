// Launcher side of the channel.
//
// `InstanceLocator::locate` never fails: anything short of a live peer that
// answers the ping within the probe timeout is reported as "no instance".

use std::time::Duration;

use tokio::io::BufReader;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::endpoint::Endpoint;
use crate::error::IpcError;
use crate::protocol::{AddPayload, IpcRequest, IpcResponse, read_frame, write_frame};
use crate::transport::{self, BoxedStream};

/// Budget for connect + ping. Absence of another instance is the common
/// case, so this stays short.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Budget for a single add-request round trip.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Finds a running instance on a well-known endpoint.
#[derive(Debug, Clone)]
pub struct InstanceLocator {
    endpoint: Endpoint,
    probe_timeout: Duration,
}

impl InstanceLocator {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            probe_timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// Connect to a running instance, or `None` if there is none reachable.
    pub async fn locate(&self) -> Option<Connection> {
        match timeout(self.probe_timeout, self.handshake()).await {
            Ok(Ok(connection)) => {
                debug!(
                    endpoint = %self.endpoint,
                    peer_version = connection.peer_version(),
                    "found running instance"
                );
                Some(connection)
            }
            Ok(Err(err)) => {
                debug!(endpoint = %self.endpoint, error = %err, "no running instance");
                None
            }
            Err(_) => {
                debug!(
                    endpoint = %self.endpoint,
                    timeout = ?self.probe_timeout,
                    "instance probe timed out"
                );
                None
            }
        }
    }

    async fn handshake(&self) -> Result<Connection, IpcError> {
        let stream = transport::connect(&self.endpoint).await?;
        let mut connection = Connection {
            stream: BufReader::new(stream),
            peer_version: String::new(),
            poisoned: false,
        };

        match connection.round_trip(&IpcRequest::Ping).await? {
            IpcResponse::Pong { version } => {
                connection.peer_version = version;
                Ok(connection)
            }
            other => Err(IpcError::UnexpectedResponse(format!("{other:?}"))),
        }
    }
}

/// Live connection to a running instance.
pub struct Connection {
    stream: BufReader<BoxedStream>,
    peer_version: String,
    /// Set once a call timed out; a late answer could otherwise be read as
    /// the response to the next request.
    poisoned: bool,
}

impl Connection {
    /// Version string the running instance reported in its pong.
    pub fn peer_version(&self) -> &str {
        &self.peer_version
    }

    /// Hand one add-request to the running instance.
    pub async fn submit(&mut self, payload: AddPayload) -> Result<(), IpcError> {
        if self.poisoned {
            return Err(IpcError::Closed);
        }

        let kind = payload.kind();
        let request = IpcRequest::Add { payload };
        let outcome = timeout(SUBMIT_TIMEOUT, self.round_trip(&request)).await;
        let response = match outcome {
            Ok(response) => response?,
            Err(_) => {
                self.poisoned = true;
                return Err(IpcError::timeout(SUBMIT_TIMEOUT));
            }
        };

        trace!(kind, ?response, "submit answered");
        match response {
            IpcResponse::Accepted => Ok(()),
            IpcResponse::Rejected { reason } => Err(IpcError::Rejected { reason }),
            IpcResponse::Pong { .. } => {
                Err(IpcError::UnexpectedResponse("pong in reply to add".into()))
            }
        }
    }

    async fn round_trip(&mut self, request: &IpcRequest) -> Result<IpcResponse, IpcError> {
        write_frame(self.stream.get_mut(), request).await?;
        read_frame(&mut self.stream).await?.ok_or(IpcError::Closed)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer_version", &self.peer_version)
            .field("poisoned", &self.poisoned)
            .finish_non_exhaustive()
    }
}
