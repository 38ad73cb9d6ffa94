#![allow(clippy::float_cmp)]

use core::mem::size_of;

use super::container;
use crate::{
    Budget, ParseOptions, Unbounded,
    model::{AccessorType, ComponentType, Node, Scene},
    parse, parse_json, parse_with_options,
    scanner::{Symbol, count_symbols},
};

#[test]
fn asset_only_document() {
    let raw = container(r#"{"asset":{"generator":"x","version":"2.0"}}"#, None);
    let model = parse(&raw, &Unbounded).unwrap();
    assert_eq!(model.asset.generator, "x");
    assert_eq!(model.asset.version, "2.0");
    assert_eq!(model.scene, None);
    assert!(model.scenes.is_empty());
    assert!(model.nodes.is_empty());
    assert!(model.meshes.is_empty());
    assert!(model.accessors.is_empty());
    assert!(model.buffer_views.is_empty());
    assert!(model.buffers.is_empty());
    assert_eq!(model.material_count, 0);
    assert_eq!(model.blob, None);
}

#[test]
fn scene_may_name_nodes_of_an_absent_section() {
    let raw = container(r#"{"scenes":[{"name":"S","nodes":[0,1]}]}"#, None);
    let model = parse(&raw, &Unbounded).unwrap();
    assert_eq!(model.scenes.len(), 1);
    assert_eq!(model.scenes[0].name, "S");
    assert_eq!(model.scenes[0].nodes, [0, 1]);
    assert!(model.nodes.is_empty());
    assert!(model.omitted.nodes);
    assert!(!model.omitted.scenes);
}

#[test]
fn scene_lists_its_nodes() {
    let raw = container(
        r#"{"scenes":[{"name":"S","nodes":[0,1]}],"nodes":[{},{}]}"#,
        None,
    );
    let model = parse(&raw, &Unbounded).unwrap();
    assert_eq!(model.scenes.len(), 1);
    assert_eq!(model.scenes[0].name, "S");
    assert_eq!(model.scenes[0].nodes, [0, 1]);
    assert_eq!(model.nodes.len(), 2);
}

#[test]
fn views_point_into_the_input() {
    let raw = container(
        r#"{"buffers":[{"byteLength":4}],"nodes":[{"name":"root"}]}"#,
        Some(&[1, 2, 3, 4][..]),
    );
    let model = parse(&raw, &Unbounded).unwrap();
    let input = raw.as_ptr_range();

    let blob = model.blob.unwrap();
    assert_eq!(blob.as_bytes(), [1, 2, 3, 4]);
    assert!(input.contains(&blob.as_bytes().as_ptr()));

    let name = model.nodes[0].name;
    assert_eq!(name, "root");
    assert!(input.contains(&name.as_bytes().as_ptr()));
}

#[test]
fn triangle() {
    let json = r#"{
        "asset": {"version": "2.0", "generator": "hand written"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"name": "tri", "mesh": 0, "children": [1]}, {"scale": [1, 2, 1]}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 1}, "indices": 0}]}],
        "buffers": [{"byteLength": 44}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 6, "target": 34963},
            {"buffer": 0, "byteOffset": 8, "byteLength": 36, "target": 34962}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5123, "count": 3, "type": "SCALAR",
             "max": [2], "min": [0]},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3",
             "max": [1.0, 1.0, 0.0], "min": [0.0, 0.0, 0.0]}
        ]
    }"#;
    let blob = [0u8; 44];
    let raw = container(json, Some(&blob[..]));
    let model = parse(&raw, &Unbounded).unwrap();

    assert_eq!(model.scene, Some(0));
    assert_eq!(model.asset.generator, "hand written");
    assert_eq!(model.nodes[0].children, [1]);
    assert_eq!(model.nodes[1].scale, [1.0, 2.0, 1.0]);

    let primitive = model.meshes[0].primitives[0];
    assert_eq!(primitive.indices, Some(0));
    assert_eq!(primitive.attributes.iter().collect::<alloc::vec::Vec<_>>(), [("POSITION", 1)]);

    let indices = &model.accessors[0];
    assert_eq!(indices.component(), Some(ComponentType::U16));
    assert_eq!(indices.kind, Some(AccessorType::Scalar));
    let positions = &model.accessors[1];
    assert_eq!(positions.kind.map(AccessorType::components), Some(3));
    assert_eq!(positions.max.as_deref(), Some(&[1.0, 1.0, 0.0][..]));

    assert_eq!(model.buffer_views[1].byte_offset, 8);
    assert_eq!(model.buffers[0].byte_length, 44);
    assert_eq!(model.blob.map(|blob| blob.len()), Some(44));
}

#[test]
fn bare_metadata_parses_without_container() {
    let json = br#"{"scenes":[{"name":"only"}]}"#;
    let model = parse_json(json, &Unbounded, &ParseOptions::default()).unwrap();
    assert_eq!(model.scenes[0].name, "only");
    assert_eq!(model.blob, None);
}

#[test]
fn options_bound_the_stack() {
    let raw = container(r#"{"asset":{"extras":{"a":{}}}}"#, None);
    assert!(parse_with_options(&raw, &Unbounded, &ParseOptions::new().with_max_depth(8)).is_ok());
    assert!(parse_with_options(&raw, &Unbounded, &ParseOptions::new().with_max_depth(5)).is_err());
}

#[test]
fn budget_accounts_for_every_array() {
    let raw = container(r#"{"scenes":[{"nodes":[0]}],"nodes":[{}]}"#, None);
    let budget = Budget::new(usize::MAX);
    let model = parse(&raw, &budget).unwrap();
    assert_eq!(model.nodes.len(), 1);
    let json = &raw[20..];
    let stream = count_symbols(json) * (size_of::<Symbol>() + size_of::<u32>());
    let arrays = size_of::<Scene<'_>>() + size_of::<u32>() + size_of::<Node<'_>>();
    assert_eq!(budget.used(), stream + arrays);
}
