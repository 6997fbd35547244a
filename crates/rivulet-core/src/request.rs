use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use url::Url;

use rivulet_ipc::AddPayload;

use crate::classify::MAGNET_PREFIX;
use crate::error::CoreError;

/// Canonical form of one "thing to add".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRequest {
    /// Locator with a network scheme.
    Url(Url),
    /// Magnet link, verbatim.
    Magnet(String),
    /// Contents of a file that parsed as a metainfo document.
    Metainfo(Vec<u8>),
    /// Readable local file that is not metainfo; the receiver resolves it.
    FilePath(String),
    /// Nothing transferable.
    Unrecognized,
}

impl AddRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Magnet(_) => "magnet",
            Self::Metainfo(_) => "metainfo",
            Self::FilePath(_) => "file_path",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Whether this request can be handed to another process at all.
    pub fn is_transferable(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    /// Wire form, or `None` for [`AddRequest::Unrecognized`].
    pub fn to_payload(&self) -> Option<AddPayload> {
        match self {
            Self::Url(url) => Some(AddPayload::Url(url.to_string())),
            Self::Magnet(link) => Some(AddPayload::Magnet(link.clone())),
            Self::Metainfo(bytes) => Some(AddPayload::Metainfo(BASE64.encode(bytes))),
            Self::FilePath(path) => Some(AddPayload::FilePath(BASE64.encode(path.as_bytes()))),
            Self::Unrecognized => None,
        }
    }

    /// Receiving side: rebuild the request from its wire form.
    pub fn from_payload(payload: AddPayload) -> Result<Self, CoreError> {
        let kind = payload.kind();
        let invalid = |reason: String| CoreError::InvalidPayload { kind, reason };

        match payload {
            AddPayload::Url(text) => Url::parse(&text)
                .map(Self::Url)
                .map_err(|e| invalid(e.to_string())),
            AddPayload::Magnet(link) => {
                if crate::classify::is_magnet(&link) {
                    Ok(Self::Magnet(link))
                } else {
                    Err(invalid(format!("missing {MAGNET_PREFIX} prefix")))
                }
            }
            AddPayload::Metainfo(encoded) => BASE64
                .decode(encoded)
                .map(Self::Metainfo)
                .map_err(|e| invalid(e.to_string())),
            AddPayload::FilePath(encoded) => {
                let bytes = BASE64.decode(encoded).map_err(|e| invalid(e.to_string()))?;
                String::from_utf8(bytes)
                    .map(Self::FilePath)
                    .map_err(|e| invalid(e.to_string()))
            }
        }
    }
}
