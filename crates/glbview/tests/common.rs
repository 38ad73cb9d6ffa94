#![allow(missing_docs, dead_code)]

use glbview::{CHUNK_BIN, CHUNK_JSON, MAGIC};
use tracing_subscriber::EnvFilter;

/// Routes the crate's `tracing` output to the test writer. Set `RUST_LOG`
/// (e.g. `RUST_LOG=glbview=trace`) to see it.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

/// Builds a version 2 container around `json` and an optional blob.
pub fn container(json: &str, blob: Option<&[u8]>) -> Vec<u8> {
    let mut metadata = json.as_bytes().to_vec();
    metadata.resize(metadata.len().next_multiple_of(4), b' ');

    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    for (tag, data) in [(CHUNK_JSON, Some(metadata.as_slice())), (CHUNK_BIN, blob)] {
        let Some(data) = data else { continue };
        out.extend_from_slice(&u32::try_from(data.len()).unwrap().to_le_bytes());
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(data);
    }
    let total = u32::try_from(out.len()).unwrap();
    out[8..12].copy_from_slice(&total.to_le_bytes());
    out
}

pub const TRIANGLE: &str = r#"{
    "asset": {"generator": "glbview tests", "version": "2.0"},
    "scene": 0,
    "scenes": [{"name": "main", "nodes": [0]}],
    "nodes": [
        {"name": "root", "mesh": 0, "children": [1]},
        {"name": "leaf", "translation": [0, 1, 0]}
    ],
    "meshes": [
        {"name": "tri", "primitives": [{"attributes": {"POSITION": 0, "NORMAL": 1}, "indices": 2}]}
    ],
    "accessors": [
        {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
        {"bufferView": 0, "byteOffset": 36, "componentType": 5126, "count": 3, "type": "VEC3"},
        {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
    ],
    "bufferViews": [
        {"buffer": 0, "byteLength": 72, "byteStride": 12},
        {"buffer": 0, "byteOffset": 72, "byteLength": 6}
    ],
    "buffers": [{"byteLength": 80}]
}"#;
