#![no_main]

use arbitrary::Arbitrary;
use glbview::{Budget, CHUNK_JSON, MAGIC, ParseOptions, Unbounded, parse, parse_json};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    max_depth: u8,
    budget: Option<u16>,
    /// Wrap `metadata` in a well-formed container instead of parsing `raw`.
    wrap: bool,
    metadata: &'a [u8],
    raw: &'a [u8],
}

fn wrap(metadata: &[u8]) -> Vec<u8> {
    let total = 20 + metadata.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(metadata);
    out
}

fuzz_target!(|input: Input<'_>| {
    let options = ParseOptions::new().with_max_depth(usize::from(input.max_depth));

    // Neither entry point may panic, whatever the bytes or the allocator.
    let budget = input.budget.map(|limit| Budget::new(usize::from(limit)));
    let from_json = match &budget {
        Some(budget) => parse_json(input.metadata, budget, &options),
        None => parse_json(input.metadata, &Unbounded, &options),
    };

    if input.wrap {
        let raw = wrap(input.metadata);
        let wrapped = glbview::parse_with_options(&raw, &Unbounded, &options);
        if input.budget.is_none() {
            assert_eq!(wrapped.map(|model| model.blob.is_none()), from_json.map(|_| true));
        }
    } else {
        let _ = parse(input.raw, &Unbounded);
    }
});
