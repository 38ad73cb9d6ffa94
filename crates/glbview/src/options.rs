/// Configuration for a single parse call.
///
/// # Default
///
/// `max_depth` defaults to [`ParseOptions::DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of frames on the parser stack, counting the root frame.
    ///
    /// Every object, array and pending key occupies one frame, so a document
    /// nested `n` containers deep needs roughly `2n` frames. Exceeding the
    /// bound fails with [`Error::StackOverflow`](crate::Error::StackOverflow).
    ///
    /// # Default
    ///
    /// `255`
    pub max_depth: usize,
}

impl ParseOptions {
    /// Default frame bound.
    pub const DEFAULT_MAX_DEPTH: usize = 255;

    /// Same as [`ParseOptions::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`ParseOptions::max_depth`].
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
