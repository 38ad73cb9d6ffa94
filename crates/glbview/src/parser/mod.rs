//! The structural parser: one pass over the symbol stream with an explicit
//! frame stack, routing values into a [`Model`] as they complete.
//!
//! Strings are routed when their closing quote arrives. Bare literals
//! (numbers, `true`, `null`, ...) have no symbol of their own, so they are
//! routed when the `,`, `}` or `]` that ends them arrives, using the text
//! between the value start and that symbol. Once a value is complete only
//! whitespace may follow it before the next `,`, `}` or `]`.

mod frame;
mod numbers;
mod route;


use alloc::vec::Vec;

use frame::{Frame, ObjectState, ValueState};
use route::{ArraySlot, Member, ObjectSlot, Section};

use crate::{
    ByteView, Error, Model, Result,
    allocator::Arena,
    model::Sections,
    scanner::{Symbol, SymbolStream},
};

pub(crate) struct Parser<'a, 'p> {
    json: &'a [u8],
    symbols: &'p SymbolStream<'a>,
    arena: Arena<'a>,
    model: Model<'a>,
    stack: Vec<Frame<'a>>,
    max_depth: usize,
    section: Section,
}

impl<'a, 'p> Parser<'a, 'p> {
    pub(crate) fn new(
        json: &'a [u8],
        symbols: &'p SymbolStream<'a>,
        arena: Arena<'a>,
        max_depth: usize,
    ) -> Self {
        let mut stack = Vec::new();
        stack.push(Frame::Root { opened: false });
        // Sections are marked present as their arrays are allocated.
        let mut model = Model::new_in(arena);
        model.omitted = Sections::ALL;
        Self {
            json,
            symbols,
            arena,
            model,
            stack,
            max_depth,
            section: Section::None,
        }
    }

    /// Walks every symbol once and returns the populated model.
    pub(crate) fn run(mut self) -> Result<Model<'a>> {
        let symbols = self.symbols;
        for (index, (symbol, offset)) in symbols.iter().enumerate() {
            self.step(index, symbol, offset)?;
        }

        if self.symbols.unterminated_string() {
            return Err(Error::Malformed("unterminated string"));
        }
        match self.stack.as_slice() {
            [Frame::Root { opened: true }] => Ok(self.model),
            [Frame::Root { opened: false }] => Err(Error::Malformed("no top-level object")),
            _ => Err(Error::Malformed("unexpected end of metadata")),
        }
    }

    fn step(&mut self, index: usize, symbol: Symbol, offset: usize) -> Result<()> {
        match symbol {
            Symbol::OpenObject => self.open_object(offset),
            Symbol::CloseObject => self.close_object(offset),
            Symbol::OpenArray => self.open_array(index, offset),
            Symbol::CloseArray => self.close_array(offset),
            Symbol::BeginString => self.begin_string(offset),
            Symbol::EndString => self.end_string(offset),
            Symbol::Colon => self.colon(offset),
            Symbol::Comma => self.comma(offset),
        }
    }

    fn open_object(&mut self, offset: usize) -> Result<()> {
        let slot = match self.peek() {
            Frame::Root { opened: false } => {
                self.set_top(Frame::Root { opened: true });
                ObjectSlot::Document
            }
            Frame::Key {
                name,
                member,
                state: ValueState::AwaitValue { start },
            } if self.is_blank(start, offset) => {
                self.set_value_state(ValueState::Done { end: offset + 1 });
                match member {
                    Member::Object(slot) => slot,
                    Member::Skip => ObjectSlot::Skip,
                    other => {
                        mismatch(name, other, "object");
                        ObjectSlot::Skip
                    }
                }
            }
            Frame::Array {
                slot,
                index,
                state: ValueState::AwaitValue { start },
                ..
            } if self.is_blank(start, offset) => {
                self.set_value_state(ValueState::Done { end: offset + 1 });
                slot.element_object(self.section, index)
                    .ok_or_else(|| unexpected(Symbol::OpenObject, offset))?
            }
            _ => return Err(unexpected(Symbol::OpenObject, offset)),
        };
        self.push(
            Frame::Object {
                slot,
                state: ObjectState::Empty,
            },
            offset,
        )
    }

    fn close_object(&mut self, offset: usize) -> Result<()> {
        if let Frame::Key { .. } = self.peek() {
            self.finish_key(Symbol::CloseObject, offset)?;
        }
        match self.peek() {
            Frame::Object {
                state: ObjectState::Empty | ObjectState::HasMember,
                ..
            } => self.pop(Symbol::CloseObject, offset),
            _ => Err(unexpected(Symbol::CloseObject, offset)),
        }
    }

    fn open_array(&mut self, index: usize, offset: usize) -> Result<()> {
        let slot = match self.peek() {
            Frame::Key {
                name,
                member,
                state: ValueState::AwaitValue { start },
            } if self.is_blank(start, offset) => match member {
                Member::Array(slot) => slot,
                Member::Skip => ArraySlot::Skip,
                other => {
                    mismatch(name, other, "array");
                    ArraySlot::Skip
                }
            },
            _ => return Err(unexpected(Symbol::OpenArray, offset)),
        };

        let len = self.count_elements(index, offset)?;
        slot.allocate(&mut self.model, self.section, len, self.arena)?;
        self.set_value_state(ValueState::Done { end: offset + 1 });
        self.push(
            Frame::Array {
                slot,
                len,
                index: 0,
                state: ValueState::AwaitValue { start: offset + 1 },
            },
            offset,
        )
    }

    fn close_array(&mut self, offset: usize) -> Result<()> {
        let Frame::Array {
            slot,
            len,
            index,
            state,
        } = self.peek()
        else {
            return Err(unexpected(Symbol::CloseArray, offset));
        };

        let filled = match state {
            ValueState::AwaitValue { start } if index == 0 && self.is_blank(start, offset) => 0,
            ValueState::AwaitValue { start } => {
                self.write_element(slot, index, start, offset, Symbol::CloseArray)?;
                index + 1
            }
            ValueState::Done { end } if self.is_blank(end, offset) => index + 1,
            ValueState::Done { .. } | ValueState::AwaitColon | ValueState::InString { .. } => {
                return Err(unexpected(Symbol::CloseArray, offset));
            }
        };
        if filled != len {
            return Err(unexpected(Symbol::CloseArray, offset));
        }
        self.pop(Symbol::CloseArray, offset)
    }

    fn begin_string(&mut self, offset: usize) -> Result<()> {
        let start = offset + 1;
        match self.peek() {
            Frame::Object {
                slot,
                state: ObjectState::Empty | ObjectState::AwaitKey,
            } => {
                self.set_top(Frame::Object {
                    slot,
                    state: ObjectState::InKey { start },
                });
                Ok(())
            }
            Frame::Array {
                slot,
                state: ValueState::AwaitValue { .. },
                ..
            } if slot.is_numeric() => Err(unexpected(Symbol::BeginString, offset)),
            Frame::Key {
                state: ValueState::AwaitValue { start: value },
                ..
            }
            | Frame::Array {
                state: ValueState::AwaitValue { start: value },
                ..
            } if self.is_blank(value, offset) => {
                self.set_value_state(ValueState::InString { start });
                Ok(())
            }
            _ => Err(unexpected(Symbol::BeginString, offset)),
        }
    }

    fn end_string(&mut self, offset: usize) -> Result<()> {
        match self.peek() {
            Frame::Object {
                slot,
                state: ObjectState::InKey { start },
            } => {
                let name = self.slice(start, offset);
                if slot == ObjectSlot::Document {
                    self.enter_section(name);
                }
                let member = slot.member(self.section, &name);
                self.set_top(Frame::Object {
                    slot,
                    state: ObjectState::HasMember,
                });
                self.push(
                    Frame::Key {
                        name,
                        member,
                        state: ValueState::AwaitColon,
                    },
                    offset,
                )
            }
            Frame::Key {
                name,
                member,
                state: ValueState::InString { start },
            } => {
                let text = self.slice(start, offset);
                match member {
                    Member::Text(field) => field.write(&mut self.model, text)?,
                    Member::Skip => {}
                    other => mismatch(name, other, "string"),
                }
                self.set_value_state(ValueState::Done { end: offset + 1 });
                Ok(())
            }
            Frame::Array {
                slot,
                state: ValueState::InString { .. },
                ..
            } => {
                if slot != ArraySlot::Skip {
                    tracing::trace!(?slot, "ignoring string element");
                }
                self.set_value_state(ValueState::Done { end: offset + 1 });
                Ok(())
            }
            _ => Err(unexpected(Symbol::EndString, offset)),
        }
    }

    fn colon(&mut self, offset: usize) -> Result<()> {
        match self.peek() {
            Frame::Key {
                state: ValueState::AwaitColon,
                ..
            } => {
                self.set_value_state(ValueState::AwaitValue { start: offset + 1 });
                Ok(())
            }
            _ => Err(unexpected(Symbol::Colon, offset)),
        }
    }

    fn comma(&mut self, offset: usize) -> Result<()> {
        match self.peek() {
            Frame::Key { .. } => {
                self.finish_key(Symbol::Comma, offset)?;
                let Frame::Object { slot, .. } = self.peek() else {
                    return Err(unexpected(Symbol::Comma, offset));
                };
                self.set_top(Frame::Object {
                    slot,
                    state: ObjectState::AwaitKey,
                });
                Ok(())
            }
            Frame::Array {
                slot,
                len,
                index,
                state,
            } => {
                match state {
                    ValueState::AwaitValue { start } => {
                        self.write_element(slot, index, start, offset, Symbol::Comma)?;
                    }
                    ValueState::Done { end } if self.is_blank(end, offset) => {}
                    ValueState::Done { .. }
                    | ValueState::AwaitColon
                    | ValueState::InString { .. } => {
                        return Err(unexpected(Symbol::Comma, offset));
                    }
                }
                self.set_top(Frame::Array {
                    slot,
                    len,
                    index: index + 1,
                    state: ValueState::AwaitValue { start: offset + 1 },
                });
                Ok(())
            }
            _ => Err(unexpected(Symbol::Comma, offset)),
        }
    }

    /// Completes the key on top of the stack, routing a pending bare literal,
    /// and pops it.
    fn finish_key(&mut self, symbol: Symbol, offset: usize) -> Result<()> {
        let Frame::Key {
            name,
            member,
            state,
        } = self.peek()
        else {
            return Err(unexpected(symbol, offset));
        };
        match state {
            ValueState::AwaitValue { start } => {
                let (at, literal) = self.literal(start, offset);
                if literal.is_empty() {
                    return Err(unexpected(symbol, offset));
                }
                match member {
                    Member::Integer(field) => {
                        let value = numbers::decode_unsigned(literal)
                            .ok_or(Error::BadNumber { offset: at })?;
                        field.write(&mut self.model, value)?;
                    }
                    Member::Skip => {}
                    other => mismatch(name, other, "literal"),
                }
            }
            ValueState::Done { end } if self.is_blank(end, offset) => {}
            ValueState::Done { .. } | ValueState::AwaitColon | ValueState::InString { .. } => {
                return Err(unexpected(symbol, offset));
            }
        }
        self.pop(symbol, offset)?;
        if let Frame::Object {
            slot: ObjectSlot::Document,
            ..
        } = self.peek()
        {
            self.section = Section::None;
        }
        Ok(())
    }

    /// Routes the bare literal ending at `offset` into element `index`.
    fn write_element(
        &mut self,
        slot: ArraySlot,
        index: usize,
        start: usize,
        offset: usize,
        symbol: Symbol,
    ) -> Result<()> {
        let (at, literal) = self.literal(start, offset);
        if literal.is_empty() {
            return Err(unexpected(symbol, offset));
        }
        slot.write_literal(&mut self.model, index, at, literal)
    }

    /// Counts the elements of the array opened by symbol `index` without
    /// consuming anything: top-level commas plus one, or zero when nothing
    /// but whitespace sits between the brackets.
    fn count_elements(&self, index: usize, offset: usize) -> Result<usize> {
        let mut depth = 0_usize;
        let mut commas = 0_usize;
        let mut nested = false;
        for (symbol, at) in self.symbols.iter().skip(index + 1) {
            match symbol {
                Symbol::OpenObject | Symbol::OpenArray => {
                    depth += 1;
                    nested = true;
                }
                Symbol::CloseObject | Symbol::CloseArray if depth > 0 => depth -= 1,
                Symbol::CloseArray => {
                    let len = if commas > 0 {
                        commas + 1
                    } else {
                        usize::from(nested || !self.is_blank(offset + 1, at))
                    };
                    return Ok(len);
                }
                Symbol::CloseObject => return Err(unexpected(symbol, at)),
                Symbol::Comma if depth == 0 => commas += 1,
                Symbol::Comma | Symbol::Colon | Symbol::BeginString | Symbol::EndString => {}
            }
        }
        Err(Error::Malformed("unterminated array"))
    }

    fn enter_section(&mut self, key: ByteView<'a>) {
        self.section = Section::from_key(&key);
        if self.section == Section::Ignored {
            tracing::debug!(section = %key, "skipping unknown section");
        }
    }

    fn peek(&self) -> Frame<'a> {
        // The root frame is never popped.
        self.stack
            .last()
            .copied()
            .unwrap_or(Frame::Root { opened: true })
    }

    fn set_top(&mut self, frame: Frame<'a>) {
        if let Some(top) = self.stack.last_mut() {
            *top = frame;
        }
    }

    /// Updates the value state of the `Key` or `Array` on top.
    fn set_value_state(&mut self, next: ValueState) {
        match self.stack.last_mut() {
            Some(Frame::Key { state, .. } | Frame::Array { state, .. }) => *state = next,
            Some(Frame::Root { .. } | Frame::Object { .. }) | None => {}
        }
    }

    fn push(&mut self, frame: Frame<'a>, offset: usize) -> Result<()> {
        if self.stack.len() >= self.max_depth {
            return Err(Error::StackOverflow {
                limit: self.max_depth,
                offset,
            });
        }
        self.stack.push(frame);
        Ok(())
    }

    /// Pops the top frame. The value it held ends at `offset`.
    fn pop(&mut self, symbol: Symbol, offset: usize) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(unexpected(symbol, offset));
        }
        self.stack.pop();
        self.set_value_state(ValueState::Done { end: offset + 1 });
        Ok(())
    }

    fn slice(&self, start: usize, end: usize) -> ByteView<'a> {
        ByteView::new(self.json.get(start..end).unwrap_or_default())
    }

    /// The whitespace-trimmed text in `start..end` and the offset it begins
    /// at.
    fn literal(&self, start: usize, end: usize) -> (usize, &'a [u8]) {
        let text = self.slice(start, end).as_bytes();
        let lead = text
            .iter()
            .position(|byte| !byte.is_ascii_whitespace())
            .unwrap_or(text.len());
        (start + lead, text[lead..].trim_ascii_end())
    }

    fn is_blank(&self, start: usize, end: usize) -> bool {
        self.slice(start, end).trim_ascii().is_empty()
    }
}

fn unexpected(symbol: Symbol, offset: usize) -> Error {
    Error::UnexpectedSymbol { symbol, offset }
}

fn mismatch(key: ByteView<'_>, member: Member, found: &str) {
    tracing::trace!(key = %key, ?member, found, "value kind does not match field");
}
