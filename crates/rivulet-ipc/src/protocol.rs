//! Wire protocol of the single-instance channel.
//!
//! Each message is one JSON object on its own line. The launcher writes a
//! request and reads exactly one response before writing the next.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::IpcError;

/// Upper bound for a single frame. Large enough for a base64-encoded
/// 64 MiB metainfo document.
pub const MAX_FRAME_BYTES: u64 = 96 * 1024 * 1024;

/// Transport-safe form of an add-request.
///
/// `Metainfo` and `FilePath` carry base64 text; `Url` and `Magnet` carry the
/// locator verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AddPayload {
    Url(String),
    Magnet(String),
    Metainfo(String),
    FilePath(String),
}

impl AddPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Magnet(_) => "magnet",
            Self::Metainfo(_) => "metainfo",
            Self::FilePath(_) => "file_path",
        }
    }
}

/// Launcher → running instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Liveness check sent right after connecting.
    Ping,
    /// Submit one add-request.
    Add { payload: AddPayload },
}

/// Running instance → launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcResponse {
    /// Answer to `Ping`; carries the instance's version.
    Pong { version: String },
    /// The add-request was taken.
    Accepted,
    /// The add-request (or the frame itself) was refused.
    Rejected { reason: String },
}

pub(crate) async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<(), IpcError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame. `Ok(None)` means the peer closed the stream cleanly.
pub(crate) async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>, IpcError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    let read = (&mut *reader)
        .take(MAX_FRAME_BYTES)
        .read_line(&mut line)
        .await?;

    if read == 0 {
        return Ok(None);
    }
    if !line.ends_with('\n') && u64::try_from(read).unwrap_or(u64::MAX) >= MAX_FRAME_BYTES {
        return Err(IpcError::FrameTooLarge {
            limit: MAX_FRAME_BYTES,
        });
    }

    Ok(Some(serde_json::from_str(line.trim_end())?))
}
