//! Slicing of the binary envelope into its metadata and blob chunks.
//!
//! Layout (little-endian):
//!
//! ```text
//! 0   magic    "glTF"
//! 4   version
//! 8   total length
//! 12  chunk 0 length N, chunk 0 tag "JSON", N bytes of metadata
//! ..  chunk 1 length M, chunk 1 tag "BIN\0", M bytes of blob (optional)
//! ```

use core::ops::Range;

use crate::{Error, Result};

/// `glTF` read as a little-endian `u32`.
pub const MAGIC: u32 = u32::from_le_bytes(*b"glTF");
/// Tag of the metadata chunk.
pub const CHUNK_JSON: u32 = u32::from_le_bytes(*b"JSON");
/// Tag of the binary blob chunk.
pub const CHUNK_BIN: u32 = u32::from_le_bytes(*b"BIN\0");

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Header {
    magic: u32,
    version: u32,
    length: u32,
}

#[derive(Debug, Clone, Copy)]
struct Chunk {
    length: u32,
    tag: u32,
    data_offset: usize,
}

impl Chunk {
    fn range(&self) -> Range<usize> {
        self.data_offset..self.data_offset.saturating_add(self.length as usize)
    }
}

/// The chunk boundaries of a container. Ranges index into the buffer the
/// container was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Format version from the header; informational only.
    pub version: u32,
    /// Byte range of the metadata chunk.
    pub json: Range<usize>,
    /// Byte range of the blob chunk, when the container has one.
    pub blob: Option<Range<usize>>,
}

impl Container {
    /// Locates the chunks of `raw` without copying anything.
    ///
    /// # Errors
    ///
    /// [`Error::NotContainer`] for a short buffer or wrong magic,
    /// [`Error::Malformed`] for truncated chunks or unexpected chunk tags.
    pub fn read(raw: &[u8]) -> Result<Self> {
        let header = read_header(raw)?;
        let declared = header.length as usize;
        if declared > raw.len() {
            return Err(Error::Malformed("declared length exceeds buffer"));
        }
        let raw = &raw[..declared];

        let json = read_chunk(raw, HEADER_LEN)?
            .ok_or(Error::Malformed("missing metadata chunk"))?;
        if json.tag != CHUNK_JSON {
            return Err(Error::Malformed("first chunk is not metadata"));
        }

        let blob = match read_chunk(raw, json.range().end)? {
            None => None,
            Some(chunk) if chunk.tag == CHUNK_BIN => Some(chunk),
            Some(_) => return Err(Error::Malformed("second chunk is not a binary blob")),
        };

        tracing::debug!(
            version = header.version,
            json_len = json.length,
            blob_len = blob.map(|chunk| chunk.length),
            "read container"
        );

        Ok(Self {
            version: header.version,
            json: json.range(),
            blob: blob.map(|chunk| chunk.range()),
        })
    }
}

fn read_u32(raw: &[u8], at: usize) -> Option<u32> {
    let bytes = raw.get(at..at + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_header(raw: &[u8]) -> Result<Header> {
    if raw.len() < HEADER_LEN {
        return Err(Error::NotContainer("buffer shorter than header"));
    }
    let header = Header {
        magic: read_u32(raw, 0).unwrap_or_default(),
        version: read_u32(raw, 4).unwrap_or_default(),
        length: read_u32(raw, 8).unwrap_or_default(),
    };
    if header.magic != MAGIC {
        return Err(Error::NotContainer("bad magic"));
    }
    Ok(header)
}

/// Reads the chunk starting at `at`. `Ok(None)` when `at` is exactly the end
/// of the container.
fn read_chunk(raw: &[u8], at: usize) -> Result<Option<Chunk>> {
    if at == raw.len() {
        return Ok(None);
    }
    let (Some(length), Some(tag)) = (read_u32(raw, at), read_u32(raw, at + 4)) else {
        return Err(Error::Malformed("truncated chunk header"));
    };
    let chunk = Chunk {
        length,
        tag,
        data_offset: at + CHUNK_HEADER_LEN,
    };
    if chunk.range().end > raw.len() {
        return Err(Error::Malformed("chunk extends past end of container"));
    }
    Ok(Some(chunk))
}
