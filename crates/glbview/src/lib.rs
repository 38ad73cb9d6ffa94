//! Zero-copy reader for binary glTF (`.glb`) containers.
//!
//! [`parse`] slices the container into its metadata and blob chunks, scans
//! the metadata for structural symbols and walks them once with a bounded
//! frame stack, producing a typed [`Model`]. Arrays are sized before they are
//! requested from the caller's [`Allocator`] and live there; names and URIs
//! borrow from the input.
//!
//! ```rust
//! use glbview::{Unbounded, parse_json, ParseOptions};
//!
//! let json = br#"{"asset":{"version":"2.0"},"scenes":[{"name":"main"}]}"#;
//! let model = parse_json(json, &Unbounded, &ParseOptions::default()).unwrap();
//! assert_eq!(model.asset.version, "2.0");
//! assert_eq!(model.scenes[0].name, "main");
//! ```
//!
//! This is not a general JSON reader: escape sequences are not decoded and an
//! escaped quote ends a string.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod allocator;
mod byte_view;
mod container;
mod error;
pub mod model;
mod options;
mod parser;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use allocator::{AllocError, Allocator, Arena, Budget, List, Unbounded};
pub use byte_view::ByteView;
pub use container::{CHUNK_BIN, CHUNK_JSON, Container, MAGIC};
pub use error::Error;
pub use model::Model;
pub use options::ParseOptions;

/// Result type returned by every fallible operation of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Parses a binary glTF container with default options.
///
/// # Errors
///
/// See [`parse_with_options`].
pub fn parse<'a>(buffer: &'a [u8], allocator: Arena<'a>) -> Result<Model<'a>> {
    parse_with_options(buffer, allocator, &ParseOptions::default())
}

/// Parses a binary glTF container.
///
/// The returned model borrows names, URIs and the blob chunk from `buffer`;
/// its arrays live in `allocator`.
///
/// # Errors
///
/// - [`Error::NotContainer`] or [`Error::Malformed`] when the envelope is
///   invalid.
/// - Any error of [`parse_json`] for the metadata chunk.
pub fn parse_with_options<'a>(
    buffer: &'a [u8],
    allocator: Arena<'a>,
    options: &ParseOptions,
) -> Result<Model<'a>> {
    let container = Container::read(buffer)?;
    let json = buffer
        .get(container.json.clone())
        .ok_or(Error::Malformed("metadata chunk out of bounds"))?;
    let mut model = parse_json(json, allocator, options)?;
    model.blob = container
        .blob
        .and_then(|range| buffer.get(range))
        .map(ByteView::new);
    Ok(model)
}

/// Parses bare metadata text, without a container around it.
///
/// # Errors
///
/// - [`Error::UnexpectedSymbol`] for a structural symbol in a position that
///   cannot accept it, including arrays nested directly in arrays.
/// - [`Error::StackOverflow`] when nesting exceeds
///   [`ParseOptions::max_depth`].
/// - [`Error::BadNumber`] for a malformed number in a known numeric field.
/// - [`Error::Malformed`] for an unterminated string, array or document.
/// - [`Error::IndexOutOfRange`] for a reference to a missing element of a
///   section the metadata contains.
/// - [`Error::AllocationFailed`] when `allocator` refuses a request.
pub fn parse_json<'a>(
    json: &'a [u8],
    allocator: Arena<'a>,
    options: &ParseOptions,
) -> Result<Model<'a>> {
    let symbols = scanner::scan(json, allocator)?;
    let model = parser::Parser::new(json, &symbols, allocator, options.max_depth).run()?;
    model.check_references()?;
    tracing::debug!(
        symbols = symbols.len(),
        scenes = model.scenes.len(),
        nodes = model.nodes.len(),
        meshes = model.meshes.len(),
        accessors = model.accessors.len(),
        "parsed metadata"
    );
    Ok(model)
}
