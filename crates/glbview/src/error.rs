use thiserror::Error;

use crate::scanner::Symbol;

/// Why a container could not be decoded.
///
/// Every variant is terminal: the parse stops at the first error and no
/// partially populated model is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The buffer is too short for a header or does not start with the
    /// container magic.
    #[error("not a binary glTF container: {0}")]
    NotContainer(&'static str),
    /// The envelope or the metadata is structurally incomplete.
    #[error("malformed container: {0}")]
    Malformed(&'static str),
    /// A structural symbol arrived in a state that cannot accept it.
    #[error("unexpected {symbol} at byte {offset}")]
    UnexpectedSymbol {
        /// The offending symbol.
        symbol: Symbol,
        /// Byte offset of the symbol in the metadata chunk.
        offset: usize,
    },
    /// Nesting went deeper than the configured frame bound.
    #[error("nesting deeper than {limit} frames at byte {offset}")]
    StackOverflow {
        /// The configured bound.
        limit: usize,
        /// Byte offset of the symbol that would have exceeded it.
        offset: usize,
    },
    /// A bare literal routed to a numeric field is not a number of the
    /// expected shape.
    #[error("ill-formed number at byte {offset}")]
    BadNumber {
        /// Byte offset where the literal starts.
        offset: usize,
    },
    /// A stored index does not address an element of the array it refers to.
    #[error("{field} index {index} out of range ({len} available)")]
    IndexOutOfRange {
        /// Which reference was checked.
        field: &'static str,
        /// The decoded index.
        index: usize,
        /// Length of the referenced array.
        len: usize,
    },
    /// The allocator refused a request.
    #[error("allocation of {bytes} bytes failed")]
    AllocationFailed {
        /// Size of the refused request.
        bytes: usize,
    },
}

