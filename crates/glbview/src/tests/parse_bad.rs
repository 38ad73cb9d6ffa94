use core::mem::size_of;

use rstest::rstest;

use super::container;
use crate::{
    Budget, Error, Unbounded,
    model::Node,
    parse,
    scanner::{Symbol, count_symbols},
};

#[rstest]
#[case::dangling_scene_node(
    r#"{"nodes":[{"name":"N"}],"scenes":[{"nodes":[5]}]}"#,
    Error::IndexOutOfRange { field: "scene node", index: 5, len: 1 }
)]
#[case::default_scene_missing(
    r#"{"scene":1,"scenes":[{}]}"#,
    Error::IndexOutOfRange { field: "scene", index: 1, len: 1 }
)]
#[case::dangling_mesh(
    r#"{"nodes":[{"mesh":0}],"meshes":[]}"#,
    Error::IndexOutOfRange { field: "node mesh", index: 0, len: 0 }
)]
#[case::material_past_count(
    r#"{"materials":[{}],"meshes":[{"primitives":[{"attributes":{},"material":1}]}]}"#,
    Error::IndexOutOfRange { field: "material", index: 1, len: 1 }
)]
#[case::dangling_buffer(
    r#"{"bufferViews":[{"buffer":0,"byteLength":4}],"buffers":[]}"#,
    Error::IndexOutOfRange { field: "buffer", index: 0, len: 0 }
)]
#[case::unterminated_string(
    r#"{"asset":{"generator":"x}}"#,
    Error::Malformed("unterminated string")
)]
#[case::array_of_arrays(
    r#"{"scenes":[[0]]}"#,
    Error::UnexpectedSymbol { symbol: Symbol::OpenArray, offset: 11 }
)]
#[case::not_a_number(
    r#"{"scene":zero}"#,
    Error::BadNumber { offset: 9 }
)]
fn rejects_metadata(#[case] json: &str, #[case] expected: Error) {
    let raw = container(json, None);
    assert_eq!(parse(&raw, &Unbounded), Err(expected));
}

#[rstest]
#[case::empty(&[], Error::NotContainer("buffer shorter than header"))]
#[case::short(b"glTF\x02\x00\x00", Error::NotContainer("buffer shorter than header"))]
#[case::bad_magic(b"GLTF\x02\x00\x00\x00\x0c\x00\x00\x00", Error::NotContainer("bad magic"))]
#[case::no_chunks(b"glTF\x02\x00\x00\x00\x0c\x00\x00\x00", Error::Malformed("missing metadata chunk"))]
#[case::overlong(b"glTF\x02\x00\x00\x00\xff\x00\x00\x00", Error::Malformed("declared length exceeds buffer"))]
fn rejects_envelope(#[case] raw: &[u8], #[case] expected: Error) {
    assert_eq!(parse(raw, &Unbounded), Err(expected));
}

#[test]
fn rejects_swapped_chunk_tags() {
    let mut raw = container("{}", Some(&[0; 4][..]));
    raw[16..20].copy_from_slice(b"BIN\0");
    assert_eq!(
        parse(&raw, &Unbounded),
        Err(Error::Malformed("first chunk is not metadata"))
    );

    let mut raw = container("{}", Some(&[0; 4][..]));
    raw[28..32].copy_from_slice(b"JSON");
    assert_eq!(
        parse(&raw, &Unbounded),
        Err(Error::Malformed("second chunk is not a binary blob"))
    );
}

#[test]
fn rejects_truncated_chunk() {
    let mut raw = container(r#"{"asset":{}}"#, None);
    raw[12..16].copy_from_slice(&1000u32.to_le_bytes());
    assert_eq!(
        parse(&raw, &Unbounded),
        Err(Error::Malformed("chunk extends past end of container"))
    );
}

#[test]
fn refused_symbol_stream_fails_first() {
    let raw = container("{}", None);
    assert_eq!(
        parse(&raw, &Budget::new(0)),
        Err(Error::AllocationFailed { bytes: 2 })
    );
}

#[test]
fn refused_model_array_aborts_the_parse() {
    let json = r#"{"nodes":[{},{}]}"#;
    let raw = container(json, None);
    let stream = count_symbols(json.as_bytes()) * (size_of::<Symbol>() + size_of::<u32>());
    assert_eq!(
        parse(&raw, &Budget::new(stream)),
        Err(Error::AllocationFailed {
            bytes: 2 * size_of::<Node<'_>>()
        })
    );
}

#[test]
fn strict_sections_still_fail_when_present() {
    let raw = container(r#"{"nodes":[{"name":"N"}],"scenes":[{"nodes":[0,3]}]}"#, None);
    assert_eq!(
        parse(&raw, &Unbounded),
        Err(Error::IndexOutOfRange {
            field: "scene node",
            index: 3,
            len: 1
        })
    );
    let raw = container(r#"{"scenes":[{"nodes":[0]}],"nodes":[]}"#, None);
    assert!(parse(&raw, &Unbounded).is_err());
}
