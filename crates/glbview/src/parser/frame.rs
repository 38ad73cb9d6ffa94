use super::route::{ArraySlot, Member, ObjectSlot};
use crate::ByteView;

/// One entry of the parser stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Frame<'a> {
    /// Bottom of the stack; accepts exactly one top-level object.
    Root { opened: bool },
    /// Inside `{...}`.
    Object {
        slot: ObjectSlot,
        state: ObjectState,
    },
    /// A key whose value is pending or being read.
    Key {
        name: ByteView<'a>,
        member: Member,
        state: ValueState,
    },
    /// Inside `[...]`. `len` comes from the forward scan done when the
    /// array opened; `index` is the element being filled.
    Array {
        slot: ArraySlot,
        len: usize,
        index: usize,
        state: ValueState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectState {
    /// Just after `{`.
    Empty,
    /// Just after `,`.
    AwaitKey,
    /// Reading a key; `start` is the first byte after the quote.
    InKey { start: usize },
    /// At least one member has been read; a `Key` frame may sit above.
    HasMember,
}

/// Progress of a key's value or of the current array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueState {
    /// Key read, `:` not yet seen. Never used by arrays.
    AwaitColon,
    /// Nothing but (possibly) a bare literal since `start`.
    AwaitValue { start: usize },
    /// Inside a quoted value; `start` is the first byte after the quote.
    InString { start: usize },
    /// A string, object or array value has been consumed; `end` is the
    /// first byte after it.
    Done { end: usize },
}
