//! Token types for the lumen highlighters.

/// The kind of highlighting applied to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// A malformed but recognized construct.
    Error,
    /// Comment content.
    Comment,
    /// The delimiting characters of a comment.
    CommentDelimiter,
    /// An escape sequence, like `\{`.
    Escape,
    /// A tag-like name in markup, such as a directive name.
    MarkupTag,
    /// An attribute-like name in markup, such as an argument name.
    MarkupAttribute,
    /// Punctuation separating other content, like `,` or `=`.
    Punctuation,
    /// Square brackets where they have special meaning.
    Bracket,
    /// Braces where they have special meaning.
    Brace,
}

impl HighlightKind {
    /// Stable lower-case name, usable as a CSS class or output label.
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightKind::Error => "error",
            HighlightKind::Comment => "comment",
            HighlightKind::CommentDelimiter => "comment-delim",
            HighlightKind::Escape => "escape",
            HighlightKind::MarkupTag => "markup-tag",
            HighlightKind::MarkupAttribute => "markup-attr",
            HighlightKind::Punctuation => "punct",
            HighlightKind::Bracket => "bracket",
            HighlightKind::Brace => "brace",
        }
    }
}

/// One highlighted span of source text.
///
/// Positions and lengths are in code points, not bytes: a multi-byte
/// character occupies a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Index of the first code point of the token within the source.
    pub begin: usize,
    /// Length of the token, in code points.
    pub length: usize,
    /// The kind of highlighting applied to the token.
    pub kind: HighlightKind,
}

impl Token {
    /// Create a new token.
    pub fn new(begin: usize, length: usize, kind: HighlightKind) -> Self {
        Self {
            begin,
            length,
            kind,
        }
    }

    /// Index one past the last code point of the token.
    #[inline]
    pub fn end(&self) -> usize {
        self.begin + self.length
    }
}
