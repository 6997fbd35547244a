//! Structural check for metainfo (`.torrent`) documents.
//!
//! Only the shape is checked: a bencoded dictionary whose `info` dictionary
//! has a name, a piece length, and either v1 piece hashes with a file layout
//! or a v2 file tree. Hashes are not verified.

use serde::Deserialize;
use serde_bencode::value::Value;
use serde_bytes::ByteBuf;

/// Files larger than this are never read into memory for classification.
pub const MAX_METAINFO_BYTES: u64 = 64 * 1024 * 1024;

/// Length of one SHA-1 piece hash in the v1 `pieces` string.
const PIECE_HASH_LEN: usize = 20;

#[derive(Deserialize)]
struct Document {
    info: Info,
}

#[derive(Deserialize)]
struct Info {
    name: ByteBuf,
    #[serde(rename = "piece length")]
    piece_length: u64,
    pieces: Option<ByteBuf>,
    length: Option<u64>,
    files: Option<Vec<FileEntry>>,
    #[serde(rename = "meta version")]
    meta_version: Option<u64>,
    #[serde(rename = "file tree")]
    file_tree: Option<Value>,
}

#[derive(Deserialize)]
struct FileEntry {
    #[allow(dead_code)]
    length: u64,
    path: Vec<ByteBuf>,
}

impl Info {
    fn is_well_formed(&self) -> bool {
        if self.name.is_empty() || self.piece_length == 0 {
            return false;
        }

        let v1 = self
            .pieces
            .as_ref()
            .is_some_and(|p| !p.is_empty() && p.len() % PIECE_HASH_LEN == 0)
            && match (&self.length, &self.files) {
                (Some(_), None) => true,
                (None, Some(files)) => {
                    !files.is_empty() && files.iter().all(|f| !f.path.is_empty())
                }
                _ => false,
            };

        let v2 = self.meta_version == Some(2)
            && matches!(self.file_tree, Some(Value::Dict(ref tree)) if !tree.is_empty());

        v1 || v2
    }
}

/// Whether `bytes` is a structurally valid metainfo document.
pub fn is_metainfo(bytes: &[u8]) -> bool {
    serde_bencode::from_bytes::<Document>(bytes).is_ok_and(|doc| doc.info.is_well_formed())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_file(pieces: &[u8]) -> Vec<u8> {
        let mut doc = b"d8:announce26:udp://tracker.example:69694:infod6:lengthi1024e4:name8:demo.bin12:piece lengthi16384e6:pieces".to_vec();
        doc.extend_from_slice(format!("{}:", pieces.len()).as_bytes());
        doc.extend_from_slice(pieces);
        doc.extend_from_slice(b"ee");
        doc
    }

    #[test]
    fn accepts_single_file_torrent() {
        assert!(is_metainfo(&single_file(&[0xab; 20])));
    }

    #[test]
    fn accepts_multi_file_torrent() {
        let mut doc = b"d4:infod5:filesld6:lengthi10e4:pathl1:a5:b.txteee4:name3:dir12:piece lengthi16384e6:pieces20:".to_vec();
        doc.extend_from_slice(&[0x11; 20]);
        doc.extend_from_slice(b"ee");
        assert!(is_metainfo(&doc));
    }

    #[test]
    fn accepts_v2_file_tree() {
        let doc = b"d4:infod9:file treed5:a.txtd0:d6:lengthi3e11:pieces root32:0123456789abcdef0123456789abcdefeee12:meta versioni2e4:name1:x12:piece lengthi16384eee";
        assert!(is_metainfo(doc));
    }

    #[test]
    fn rejects_truncated_piece_hashes() {
        assert!(!is_metainfo(&single_file(&[0xab; 19])));
    }

    #[test]
    fn rejects_non_dictionary_and_plain_text() {
        assert!(!is_metainfo(b"li1ei2ee"));
        assert!(!is_metainfo(b"just some notes\n"));
        assert!(!is_metainfo(b""));
    }

    #[test]
    fn rejects_missing_info() {
        assert!(!is_metainfo(b"d8:announce3:urle"));
    }
}
