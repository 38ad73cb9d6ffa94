//! Benchmark – `glbview::parse` on synthetic scene graphs
#![allow(missing_docs)]

use std::{fmt::Write, time::Duration};

use criterion::{
    BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use glbview::{Budget, CHUNK_JSON, MAGIC, Unbounded, parse, scanner};

/// A deterministic document with `nodes` nodes chained parent to child, one
/// mesh per node and one accessor per mesh.
fn make_document(nodes: usize) -> String {
    let mut json = String::from(r#"{"asset":{"version":"2.0"},"scene":0,"scenes":[{"nodes":[0]}],"nodes":["#);
    for i in 0..nodes {
        if i > 0 {
            json.push(',');
        }
        write!(json, r#"{{"name":"node {i}","mesh":{i},"translation":[{i},0.5,-1]"#).unwrap();
        if i + 1 < nodes {
            write!(json, r#","children":[{}]"#, i + 1).unwrap();
        }
        json.push('}');
    }
    json.push_str(r#"],"meshes":["#);
    for i in 0..nodes {
        if i > 0 {
            json.push(',');
        }
        write!(
            json,
            r#"{{"primitives":[{{"attributes":{{"POSITION":{i}}},"mode":4}}]}}"#
        )
        .unwrap();
    }
    json.push_str(r#"],"accessors":["#);
    for i in 0..nodes {
        if i > 0 {
            json.push(',');
        }
        json.push_str(r#"{"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,1]}"#);
    }
    json.push_str("]}");
    json
}

fn make_container(json: &str) -> Vec<u8> {
    let mut metadata = json.as_bytes().to_vec();
    metadata.resize(metadata.len().next_multiple_of(4), b' ');
    let total = u32::try_from(20 + metadata.len()).expect("container fits in u32");

    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&u32::try_from(metadata.len()).expect("chunk fits in u32").to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&metadata);
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_container");

    for &nodes in &[10usize, 1_000, 10_000] {
        let raw = make_container(&make_document(nodes));
        group.throughput(Throughput::Bytes(raw.len() as u64));

        group.bench_with_input(BenchmarkId::new("unbounded", nodes), &raw, |b, raw| {
            b.iter(|| {
                let model = parse(black_box(raw), &Unbounded).unwrap();
                black_box(model.nodes.len());
            });
        });
        group.bench_with_input(BenchmarkId::new("budget", nodes), &raw, |b, raw| {
            b.iter(|| {
                let budget = Budget::new(usize::MAX);
                let model = parse(black_box(raw), &budget).unwrap();
                black_box(budget.used());
                black_box(model.nodes.len());
            });
        });
        group.bench_with_input(BenchmarkId::new("count_symbols", nodes), &raw, |b, raw| {
            b.iter(|| black_box(scanner::count_symbols(black_box(&raw[20..]))));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_parse }
criterion_main!(benches);
