// Listening side of the channel, hosted by the instance that owns the GUI.
//
// One task per connection; each connection is a sequence of request/response
// lines. Undecodable lines are answered with `rejected` and the connection
// stays open.

use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{debug, info, warn};

use crate::endpoint::Endpoint;
use crate::error::IpcError;
use crate::protocol::{AddPayload, IpcRequest, IpcResponse, read_frame, write_frame};
use crate::transport::{self, BoxedStream, Listener};

/// Receives add-requests arriving from other launches.
pub trait AddHandler: Send + Sync + 'static {
    /// Accept the payload, or refuse it with a reason sent back to the
    /// launcher.
    fn handle_add(&self, payload: AddPayload) -> Result<(), String>;
}

impl<F> AddHandler for F
where
    F: Fn(AddPayload) -> Result<(), String> + Send + Sync + 'static,
{
    fn handle_add(&self, payload: AddPayload) -> Result<(), String> {
        self(payload)
    }
}

pub struct InstanceServer {
    endpoint: Endpoint,
    listener: Listener,
}

impl InstanceServer {
    /// Claim the endpoint.
    ///
    /// Fails with [`IpcError::AddrInUse`] when another instance answers on
    /// it. A socket left behind by an instance that died is removed first.
    pub async fn bind(endpoint: Endpoint) -> Result<Self, IpcError> {
        if transport::connect(&endpoint).await.is_ok() {
            return Err(IpcError::AddrInUse {
                endpoint: endpoint.to_string(),
            });
        }
        transport::clear_stale(&endpoint)?;

        let listener = Listener::bind(&endpoint)?;
        info!(%endpoint, "listening for add-requests");
        Ok(Self { endpoint, listener })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Accept connections until the task is dropped.
    pub async fn serve<H: AddHandler>(mut self, handler: H) -> Result<(), IpcError> {
        let handler = Arc::new(handler);
        loop {
            let stream = match self.listener.accept().await {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(endpoint = %self.endpoint, error = %err, "accept failed");
                    continue;
                }
            };

            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                if let Err(err) = handle_connection(stream, handler.as_ref()).await {
                    debug!(error = %err, "connection ended with error");
                }
            });
        }
    }
}

async fn handle_connection<H: AddHandler>(stream: BoxedStream, handler: &H) -> Result<(), IpcError> {
    let mut stream = BufReader::new(stream);

    loop {
        let response = match read_frame::<_, IpcRequest>(&mut stream).await {
            Ok(None) => return Ok(()),
            Ok(Some(IpcRequest::Ping)) => IpcResponse::Pong {
                version: env!("CARGO_PKG_VERSION").into(),
            },
            Ok(Some(IpcRequest::Add { payload })) => {
                let kind = payload.kind();
                match handler.handle_add(payload) {
                    Ok(()) => {
                        debug!(kind, "add-request accepted");
                        IpcResponse::Accepted
                    }
                    Err(reason) => {
                        debug!(kind, %reason, "add-request rejected");
                        IpcResponse::Rejected { reason }
                    }
                }
            }
            Err(IpcError::Codec(err)) => IpcResponse::Rejected {
                reason: format!("malformed request: {err}"),
            },
            Err(err) => return Err(err),
        };

        write_frame(stream.get_mut(), &response).await?;
    }
}
