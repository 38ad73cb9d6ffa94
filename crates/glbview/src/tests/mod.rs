mod parse_bad;
mod parse_good;

use alloc::vec::Vec;

use crate::{CHUNK_BIN, CHUNK_JSON, MAGIC};

/// Wraps `json` (space padded to four bytes) and an optional blob in a
/// version 2 container.
pub(crate) fn container(json: &str, blob: Option<&[u8]>) -> Vec<u8> {
    let mut metadata = json.as_bytes().to_vec();
    while metadata.len() % 4 != 0 {
        metadata.push(b' ');
    }

    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    push_chunk(&mut out, CHUNK_JSON, &metadata);
    if let Some(blob) = blob {
        push_chunk(&mut out, CHUNK_BIN, blob);
    }
    let total = u32::try_from(out.len()).unwrap();
    out[8..12].copy_from_slice(&total.to_le_bytes());
    out
}

fn push_chunk(out: &mut Vec<u8>, tag: u32, data: &[u8]) {
    out.extend_from_slice(&u32::try_from(data.len()).unwrap().to_le_bytes());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(data);
}
