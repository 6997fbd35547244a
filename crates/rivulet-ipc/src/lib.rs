// rivulet-ipc: the local channel a running front-end listens on, and the
// client used by a fresh launch to find it and hand over add-requests.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod protocol;
pub mod server;
mod transport;

pub use client::{Connection, InstanceLocator, PROBE_TIMEOUT, SUBMIT_TIMEOUT};
pub use endpoint::{ENDPOINT_ENV, Endpoint};
pub use error::IpcError;
pub use protocol::{AddPayload, IpcRequest, IpcResponse};
pub use server::{AddHandler, InstanceServer};
