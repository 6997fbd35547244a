// Platform streams behind the endpoint.
//
// Unix domain sockets on Unix, named pipes on Windows. Both sides work with a
// boxed duplex stream so the protocol code never sees the platform type.

use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::endpoint::Endpoint;

pub(crate) trait Duplex: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Duplex for T {}

pub(crate) type BoxedStream = Box<dyn Duplex>;

// ── Unix ────────────────────────────────────────────────────────────

#[cfg(unix)]
pub(crate) async fn connect(endpoint: &Endpoint) -> io::Result<BoxedStream> {
    let stream = tokio::net::UnixStream::connect(endpoint.path()).await?;
    Ok(Box::new(stream))
}

#[cfg(unix)]
pub(crate) struct Listener {
    inner: tokio::net::UnixListener,
    path: std::path::PathBuf,
}

#[cfg(unix)]
impl Listener {
    /// Bind the socket. A leftover socket file from a crashed instance must
    /// already have been removed by the caller.
    pub(crate) fn bind(endpoint: &Endpoint) -> io::Result<Self> {
        if let Some(parent) = endpoint.path().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let inner = tokio::net::UnixListener::bind(endpoint.path())?;
        Ok(Self {
            inner,
            path: endpoint.path().to_path_buf(),
        })
    }

    pub(crate) async fn accept(&mut self) -> io::Result<BoxedStream> {
        let (stream, _addr) = self.inner.accept().await?;
        Ok(Box::new(stream))
    }
}

#[cfg(unix)]
impl Drop for Listener {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Remove a socket file nobody is listening on any more.
#[cfg(unix)]
pub(crate) fn clear_stale(endpoint: &Endpoint) -> io::Result<()> {
    match std::fs::remove_file(endpoint.path()) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

// ── Windows ─────────────────────────────────────────────────────────

#[cfg(windows)]
pub(crate) async fn connect(endpoint: &Endpoint) -> io::Result<BoxedStream> {
    let client = tokio::net::windows::named_pipe::ClientOptions::new().open(endpoint.path())?;
    Ok(Box::new(client))
}

#[cfg(windows)]
pub(crate) struct Listener {
    name: std::path::PathBuf,
    pending: tokio::net::windows::named_pipe::NamedPipeServer,
}

#[cfg(windows)]
impl Listener {
    pub(crate) fn bind(endpoint: &Endpoint) -> io::Result<Self> {
        let pending = tokio::net::windows::named_pipe::ServerOptions::new()
            .first_pipe_instance(true)
            .create(endpoint.path())?;
        Ok(Self {
            name: endpoint.path().to_path_buf(),
            pending,
        })
    }

    pub(crate) async fn accept(&mut self) -> io::Result<BoxedStream> {
        self.pending.connect().await?;
        let next = tokio::net::windows::named_pipe::ServerOptions::new().create(&self.name)?;
        let connected = std::mem::replace(&mut self.pending, next);
        Ok(Box::new(connected))
    }
}

#[cfg(windows)]
pub(crate) fn clear_stale(_endpoint: &Endpoint) -> io::Result<()> {
    // Named pipes vanish with their last handle.
    Ok(())
}
