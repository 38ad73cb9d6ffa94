//! Scanner: classifies the structural bytes of the metadata chunk.
//!
//! Only `{ } [ ] : , "` are reported; numbers, literals and whitespace are
//! left in place and recovered later from the bytes between two symbol
//! offsets. Inside a string only the next `"` is structural, so braces or
//! commas in names never reach the parser.
//!
//! Strings are opaque: an escaped quote (`\"`) still ends the string. Producers
//! that emit escaped quotes in names or URIs are not supported.
//!
//! The stream is built in two passes over the same walker: the first counts
//! symbols so the second can fill arrays of exactly that size.

use core::fmt;

use memchr::memchr;

use crate::{
    Error, Result,
    allocator::{Arena, List, reserve_array},
};

/// A structural character of the metadata text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Symbol {
    /// `[`
    OpenArray,
    /// `]`
    CloseArray,
    /// `{`
    OpenObject,
    /// `}`
    CloseObject,
    /// The `"` that opens a string.
    BeginString,
    /// The `"` that closes a string.
    EndString,
    /// `:`
    Colon,
    /// `,`
    Comma,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Symbol::OpenArray => "'['",
            Symbol::CloseArray => "']'",
            Symbol::OpenObject => "'{'",
            Symbol::CloseObject => "'}'",
            Symbol::BeginString => "opening quote",
            Symbol::EndString => "closing quote",
            Symbol::Colon => "':'",
            Symbol::Comma => "','",
        })
    }
}

/// Symbols of one metadata chunk with their byte offsets, held in the
/// allocator they were scanned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolStream<'a> {
    symbols: List<'a, Symbol>,
    offsets: List<'a, u32>,
    open_string: bool,
}

impl SymbolStream<'_> {
    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// `true` when the text had no structural characters at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbol at `index` and its byte offset.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<(Symbol, usize)> {
        let symbol = *self.symbols.get(index)?;
        let offset = *self.offsets.get(index)?;
        Some((symbol, offset as usize))
    }

    /// All symbols, in text order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Byte offset of each symbol, parallel to [`SymbolStream::symbols`].
    #[must_use]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// `true` when the text ended inside a string.
    #[must_use]
    pub fn unterminated_string(&self) -> bool {
        self.open_string
    }

    /// Iterates `(symbol, offset)` pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Symbol, usize)> + '_ {
        self.symbols
            .iter()
            .zip(&self.offsets)
            .map(|(&symbol, &offset)| (symbol, offset as usize))
    }
}

/// Counts the symbols [`scan`] would emit for `json`.
#[must_use]
pub fn count_symbols(json: &[u8]) -> usize {
    let mut count = 0;
    walk(json, |_, _| count += 1);
    count
}

/// Builds the symbol stream for `json`, drawing both arrays from `allocator`:
/// the symbols first, then their offsets.
///
/// # Errors
///
/// [`Error::Malformed`] when `json` is too large for 32-bit offsets,
/// [`Error::AllocationFailed`] when the allocator refuses the stream.
pub fn scan<'a>(json: &[u8], allocator: Arena<'a>) -> Result<SymbolStream<'a>> {
    if u32::try_from(json.len()).is_err() {
        return Err(Error::Malformed("metadata larger than 4 GiB"));
    }
    let count = count_symbols(json);
    let mut symbols = reserve_array(allocator, count)?;
    let mut offsets = reserve_array(allocator, count)?;
    #[allow(clippy::cast_possible_truncation)]
    let open_string = walk(json, |symbol, offset| {
        symbols.push(symbol);
        offsets.push(offset as u32);
    });
    debug_assert_eq!(symbols.len(), count);
    Ok(SymbolStream {
        symbols,
        offsets,
        open_string,
    })
}

/// Calls `emit` for every structural byte. Returns `true` if the text ends
/// inside a string.
fn walk(json: &[u8], mut emit: impl FnMut(Symbol, usize)) -> bool {
    let mut at = 0;
    while let Some(&byte) = json.get(at) {
        let symbol = match byte {
            b'"' => {
                emit(Symbol::BeginString, at);
                let Some(len) = memchr(b'"', &json[at + 1..]) else {
                    return true;
                };
                at += len + 1;
                Symbol::EndString
            }
            b'[' => Symbol::OpenArray,
            b']' => Symbol::CloseArray,
            b'{' => Symbol::OpenObject,
            b'}' => Symbol::CloseObject,
            b':' => Symbol::Colon,
            b',' => Symbol::Comma,
            _ => {
                at += 1;
                continue;
            }
        };
        emit(symbol, at);
        at += 1;
    }
    false
}
