use std::time::Duration;

use thiserror::Error;

/// Error type for the `rivulet-ipc` crate.
///
/// Every variant is recoverable from the launcher's point of view: a probe
/// that fails for any reason means "no running instance", and a submit that
/// fails means "this item was not delegated". `rivulet-core` maps these into
/// its own taxonomy.
#[derive(Debug, Error)]
pub enum IpcError {
    // ── Transport ───────────────────────────────────────────────────
    /// Socket / pipe I/O failure (missing endpoint, refused, permission denied).
    #[error("IPC transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer hung up before answering.
    #[error("Peer closed the connection")]
    Closed,

    /// The peer did not answer within the allotted time.
    #[error("IPC call timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// A live instance already serves this endpoint.
    #[error("Endpoint {endpoint} is already served by a running instance")]
    AddrInUse { endpoint: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// A frame could not be encoded or decoded as JSON.
    #[error("Malformed IPC message: {0}")]
    Codec(#[from] serde_json::Error),

    /// A frame exceeded the size limit.
    #[error("IPC message exceeds {limit} bytes")]
    FrameTooLarge { limit: u64 },

    /// The peer answered with a message that does not fit the request.
    #[error("Unexpected response from peer: {0}")]
    UnexpectedResponse(String),

    /// The running instance refused the add-request.
    #[error("Request rejected by running instance: {reason}")]
    Rejected { reason: String },
}

impl IpcError {
    pub(crate) fn timeout(after: Duration) -> Self {
        Self::Timeout {
            millis: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
