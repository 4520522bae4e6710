use std::ops::Range;

/// Windowed text slice of the input buffer suspected to hold one GPS sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBlock {
    /// Byte range of the window within the input buffer
    pub span: Range<usize>,
    /// ISO-8859-1 decoded window text
    pub text: String,
}

impl CandidateBlock {
    pub fn new(span: Range<usize>, text: String) -> Self {
        Self { span, text }
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}
