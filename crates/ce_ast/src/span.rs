//! Source spans for parse diagnostics and fidelity metadata.
//!
//! Byte offsets into the original LaTeX string.

/// Source location span (byte offsets).
///
/// Represents a range `[start, end)` in the input string. Uses byte offsets
/// (not char indices) so spans can slice the source directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`.
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// The covered text, or `None` if the span does not fall on char
    /// boundaries of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::at(3).is_empty());
    }

    #[test]
    fn test_span_merge_covers_both() {
        let merged = Span::new(4, 6).merge(Span::new(1, 3));
        assert_eq!(merged, Span::new(1, 6));
    }

    #[test]
    fn test_span_slice() {
        let src = "\\frac{1}{2}";
        assert_eq!(Span::new(0, 5).slice(src), Some("\\frac"));
        assert_eq!(Span::new(10, 40).slice(src), None);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(10, 20)), "10..20");
    }
}
