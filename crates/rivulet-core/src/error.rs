// ── Core error types ──
//
// Nothing here is fatal to startup. Channel failures send the launcher down
// the local-startup path; rejections and bad payloads are per item.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Delegation ───────────────────────────────────────────────────
    #[error("Running instance unreachable: {reason}")]
    ChannelUnavailable { reason: String },

    #[error("Running instance refused the request: {reason}")]
    DelegationRejected { reason: String },

    // ── Payloads ─────────────────────────────────────────────────────
    #[error("Invalid {kind} payload: {reason}")]
    InvalidPayload { kind: &'static str, reason: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rivulet_ipc::IpcError> for CoreError {
    fn from(err: rivulet_ipc::IpcError) -> Self {
        match err {
            rivulet_ipc::IpcError::Rejected { reason } => CoreError::DelegationRejected { reason },
            other => CoreError::ChannelUnavailable {
                reason: other.to_string(),
            },
        }
    }
}
