// rivulet-core: turns launcher inputs into add-requests and hands them to a
// running instance.

pub mod classify;
pub mod dispatch;
pub mod error;
pub mod metainfo;
pub mod request;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::{MAGNET_PREFIX, NETWORK_SCHEMES, classify, classify_all};
pub use dispatch::{AddSink, InstanceProbe, delegate};
pub use error::CoreError;
pub use metainfo::{MAX_METAINFO_BYTES, is_metainfo};
pub use request::AddRequest;
