/// Configuration options for the streaming extractor.
///
/// # Examples
///
/// ```rust
/// use jsontap::{ExtractorOptions, StreamingExtractor};
///
/// let parser = StreamingExtractor::new(ExtractorOptions {
///     max_depth: Some(64),
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// Unlimited depth, no pre-allocated buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractorOptions {
    /// Maximum number of simultaneously open structures.
    ///
    /// Each open object or array occupies one stack frame until it closes.
    /// Exceeding the limit fails the triggering `write` with
    /// [`ParserError::DepthLimitExceeded`](crate::ParserError::DepthLimitExceeded).
    /// Useful as a resource guard when the stream is not trusted to nest
    /// reasonably.
    ///
    /// # Default
    ///
    /// `None` (unlimited)
    pub max_depth: Option<usize>,

    /// Initial capacity, in bytes, of the retained input buffer.
    ///
    /// The parser keeps every written byte until it is finished; when the
    /// approximate document size is known up front, pre-allocating avoids
    /// regrowth during `write`.
    ///
    /// # Default
    ///
    /// `0`
    pub initial_buffer_capacity: usize,
}
