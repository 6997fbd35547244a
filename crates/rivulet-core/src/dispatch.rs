// Handing add-requests to an already-running instance.
//
// Both seams are traits so the coordinator can be driven by fakes; the real
// implementations sit on the IPC client types.

use tracing::{debug, info, warn};

use rivulet_ipc::{AddPayload, Connection, InstanceLocator, IpcError};

use crate::error::CoreError;
use crate::request::AddRequest;

/// Something that accepts add-requests one at a time.
#[allow(async_fn_in_trait)]
pub trait AddSink {
    async fn submit(&mut self, payload: AddPayload) -> Result<(), IpcError>;
}

impl AddSink for Connection {
    async fn submit(&mut self, payload: AddPayload) -> Result<(), IpcError> {
        Connection::submit(self, payload).await
    }
}

/// Finds a running instance, if any.
#[allow(async_fn_in_trait)]
pub trait InstanceProbe {
    type Channel: AddSink;

    async fn locate(&self) -> Option<Self::Channel>;
}

impl InstanceProbe for InstanceLocator {
    type Channel = Connection;

    async fn locate(&self) -> Option<Connection> {
        InstanceLocator::locate(self).await
    }
}

/// Submit every transferable request, in order, through `sink`.
///
/// Returns `true` if at least one request was accepted. Failures are logged
/// per item and never retried.
pub async fn delegate<S: AddSink>(sink: &mut S, requests: &[AddRequest]) -> bool {
    let mut accepted = 0_usize;
    let mut failed = 0_usize;

    for request in requests {
        let Some(payload) = request.to_payload() else {
            debug!("skipping unrecognized add target");
            continue;
        };

        match sink.submit(payload).await {
            Ok(()) => accepted += 1,
            Err(err) => {
                failed += 1;
                let err = CoreError::from(err);
                warn!(kind = request.kind(), error = %err, "add-request not delegated");
            }
        }
    }

    info!(accepted, failed, "delegation finished");
    accepted > 0
}
