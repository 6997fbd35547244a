// Input classification.
//
// Order matters: network URL, then magnet prefix, then local file. Only the
// local filesystem is touched; nothing here goes to the network.

use std::fs;
use std::path::Path;

use tracing::debug;
use url::Url;

use crate::metainfo::{self, MAX_METAINFO_BYTES};
use crate::request::AddRequest;

/// URL schemes a running instance can fetch from.
pub const NETWORK_SCHEMES: [&str; 5] = ["http", "https", "ftp", "sftp", "udp"];

/// Reserved prefix of magnet links (matched ASCII case-insensitively).
pub const MAGNET_PREFIX: &str = "magnet:?";

/// Classify one launcher input.
pub fn classify(input: &str) -> AddRequest {
    let request = if let Some(url) = parse_network_url(input) {
        AddRequest::Url(url)
    } else if is_magnet(input) {
        AddRequest::Magnet(input.to_owned())
    } else {
        classify_path(input)
    };

    debug!(input, kind = request.kind(), "classified add target");
    request
}

/// Classify every input, preserving order.
pub fn classify_all<S: AsRef<str>>(inputs: &[S]) -> Vec<AddRequest> {
    inputs.iter().map(|input| classify(input.as_ref())).collect()
}

fn parse_network_url(input: &str) -> Option<Url> {
    let url = Url::parse(input).ok()?;
    (NETWORK_SCHEMES.contains(&url.scheme()) && url.has_host()).then_some(url)
}

pub(crate) fn is_magnet(input: &str) -> bool {
    input
        .get(..MAGNET_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MAGNET_PREFIX))
}

fn classify_path(input: &str) -> AddRequest {
    let path = Path::new(input);

    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => {
            debug!(input, "not a regular file");
            return AddRequest::Unrecognized;
        }
        Err(err) => {
            debug!(input, error = %err, "add target is not readable");
            return AddRequest::Unrecognized;
        }
    };

    if metadata.len() > MAX_METAINFO_BYTES {
        return AddRequest::FilePath(input.to_owned());
    }

    match fs::read(path) {
        Ok(bytes) if metainfo::is_metainfo(&bytes) => AddRequest::Metainfo(bytes),
        Ok(_) => AddRequest::FilePath(input.to_owned()),
        Err(err) => {
            debug!(input, error = %err, "add target is not readable");
            AddRequest::Unrecognized
        }
    }
}
