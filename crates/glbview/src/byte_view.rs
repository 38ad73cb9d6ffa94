use core::{fmt, ops::Deref};

use bstr::BStr;

/// A borrowed run of bytes inside the container that was parsed.
///
/// Names, URIs and the metadata chunk itself are handed out as views so that
/// nothing is copied out of the input. A view cannot outlive the buffer it was
/// taken from; the `'a` lifetime ties every [`Model`](crate::Model) to that
/// buffer.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteView<'a>(&'a [u8]);

impl<'a> ByteView<'a> {
    /// Wraps a byte slice.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    /// The viewed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// The viewed bytes as a [`BStr`], for display and byte-string helpers.
    #[must_use]
    pub fn as_bstr(&self) -> &'a BStr {
        BStr::new(self.0)
    }

    /// The viewed bytes as UTF-8, if they are valid.
    #[must_use]
    pub fn to_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.0).ok()
    }

    /// Number of viewed bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when the view covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Byte-for-byte equality with `text`.
    #[must_use]
    pub fn text_equals(&self, text: &[u8]) -> bool {
        self.0 == text
    }
}

impl Deref for ByteView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.0
    }
}

impl<'a> From<&'a [u8]> for ByteView<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

impl<'a> From<&'a str> for ByteView<'a> {
    fn from(text: &'a str) -> Self {
        Self(text.as_bytes())
    }
}

impl PartialEq<str> for ByteView<'_> {
    fn eq(&self, other: &str) -> bool {
        self.text_equals(other.as_bytes())
    }
}

impl PartialEq<&str> for ByteView<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.text_equals(other.as_bytes())
    }
}

impl fmt::Debug for ByteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_bstr(), f)
    }
}

impl fmt::Display for ByteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ByteView<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_str() {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_bytes(self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ByteView;

    #[test]
    fn compares_bytewise() {
        let view = ByteView::from("POSITION");
        assert!(view.text_equals(b"POSITION"));
        assert!(!view.text_equals(b"POSITION_"));
        assert!(!view.text_equals(b"position"));
        assert_eq!(view, "POSITION");
    }

    #[test]
    fn debug_escapes_non_utf8() {
        let view = ByteView::new(b"a\xffb");
        assert_eq!(alloc::format!("{view:?}"), "\"a\\xffb\"");
        assert_eq!(view.to_str(), None);
    }
}
