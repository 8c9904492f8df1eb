//! Output buffer for highlight tokens.

use tracing::trace;

use crate::{HighlightKind, Token};

/// Options controlling how highlight tokens are produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightOptions {
    /// Merge adjacent tokens that have the same highlight kind.
    pub coalescing: bool,
}

/// An append-only buffer of highlight tokens, positioned by a cursor over
/// the source text.
///
/// The lexers measure everything in byte lengths of the UTF-8 source;
/// emitted tokens are indexed in code points. The sink keeps both cursors
/// in sync and does the conversion on every advance.
pub struct TokenSink<'src> {
    /// The unconsumed suffix of the source.
    remaining: &'src str,
    /// Cursor position in bytes.
    pos: usize,
    /// Cursor position in code points.
    char_pos: usize,
    tokens: Vec<Token>,
    options: HighlightOptions,
}

impl<'src> TokenSink<'src> {
    /// Create a sink with its cursor at the start of `source`.
    pub fn new(source: &'src str, options: HighlightOptions) -> Self {
        Self {
            remaining: source,
            pos: 0,
            char_pos: 0,
            tokens: Vec::new(),
            options,
        }
    }

    /// The unconsumed suffix of the source.
    #[inline]
    pub fn remainder(&self) -> &'src str {
        self.remaining
    }

    /// The current byte position of the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The current code-point position of the cursor.
    #[inline]
    pub fn char_position(&self) -> usize {
        self.char_pos
    }

    /// Whether the cursor has reached the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The tokens emitted so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consume the sink, returning the emitted tokens.
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Move the cursor forward by `byte_len` bytes without emitting.
    ///
    /// Returns the number of code points advanced over. `byte_len` must
    /// lie on a character boundary of the remaining input.
    pub fn advance(&mut self, byte_len: usize) -> usize {
        let char_len = self.remaining[..byte_len].chars().count();
        self.pos += byte_len;
        self.char_pos += char_len;
        self.remaining = &self.remaining[byte_len..];
        char_len
    }

    /// Emit one token of `kind` spanning the next `byte_len` bytes, then
    /// advance the cursor past them.
    pub fn emit_and_advance(&mut self, byte_len: usize, kind: HighlightKind) {
        let begin = self.char_pos;
        let length = self.advance(byte_len);
        trace!("token {} at {}..{}", kind.as_str(), begin, begin + length);
        if self.options.coalescing
            && let Some(last) = self.tokens.last_mut()
            && last.kind == kind
            && last.end() == begin
        {
            last.length += length;
            return;
        }
        self.tokens.push(Token::new(begin, length, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_counts_code_points() {
        let mut sink = TokenSink::new("aé日x", HighlightOptions::default());
        assert_eq!(sink.advance(1), 1); // a
        assert_eq!(sink.advance(2), 1); // é
        assert_eq!(sink.advance(3), 1); // 日
        assert_eq!(sink.position(), 6);
        assert_eq!(sink.char_position(), 3);
        assert_eq!(sink.remainder(), "x");
        assert!(!sink.is_eof());
    }

    #[test]
    fn emit_uses_code_point_positions() {
        let mut sink = TokenSink::new("é=x", HighlightOptions::default());
        sink.advance(2);
        sink.emit_and_advance(1, HighlightKind::Punctuation);
        assert_eq!(
            sink.tokens(),
            &[Token::new(1, 1, HighlightKind::Punctuation)]
        );
    }

    #[test]
    fn coalescing_merges_adjacent_same_kind() {
        let mut sink = TokenSink::new(
            "[[,",
            HighlightOptions { coalescing: true },
        );
        sink.emit_and_advance(1, HighlightKind::Bracket);
        sink.emit_and_advance(1, HighlightKind::Bracket);
        sink.emit_and_advance(1, HighlightKind::Punctuation);
        assert_eq!(
            sink.tokens(),
            &[
                Token::new(0, 2, HighlightKind::Bracket),
                Token::new(2, 1, HighlightKind::Punctuation),
            ]
        );
    }

    #[test]
    fn coalescing_skips_non_adjacent_tokens() {
        let mut sink = TokenSink::new(
            "[ [",
            HighlightOptions { coalescing: true },
        );
        sink.emit_and_advance(1, HighlightKind::Bracket);
        sink.advance(1);
        sink.emit_and_advance(1, HighlightKind::Bracket);
        assert_eq!(
            sink.tokens(),
            &[
                Token::new(0, 1, HighlightKind::Bracket),
                Token::new(2, 1, HighlightKind::Bracket),
            ]
        );
    }
}
