//! Syntax-highlighting lexer for the MMML markup language.
//!
//! MMML documents are plain text interspersed with directives of the form
//! `\name[arg, key = arg]{ body }`, where both the argument list and the
//! block are optional and blocks nest recursively. The lexer walks this
//! grammar with mutually recursive matchers that report every recognized
//! construct to a [`Consume`] strategy; the strategy decides which spans
//! become highlight tokens. No syntax tree is built: matching is cursor
//! arithmetic over the remaining input plus a pair of bracket depth
//! counters.

use lumen_token::{HighlightKind, TokenSink};
use tracing::trace;

use crate::chars::{
    is_argument_name, is_directive_name, is_directive_name_start, is_escapeable,
    is_html_whitespace,
};

/// Directive names (backslash included) whose body is treated as an opaque
/// comment rather than markup.
const COMMENT_DIRECTIVES: [&[u8]; 2] = [b"\\comment", b"\\-comment"];

/// Highlight an MMML document into `sink`.
pub(crate) fn highlight(sink: &mut TokenSink<'_>) {
    let source = sink.remainder();
    let mut consumer = DispatchConsumer::new(sink);
    match_content_sequence(&mut consumer, source, ContentContext::Document);
}

// Primitive matchers. Each consumes a prefix of the given input and
// returns its byte length; zero means no match.

/// Length of the maximal HTML-whitespace prefix of `s`.
fn match_whitespace(s: &str) -> usize {
    s.bytes().take_while(|&b| is_html_whitespace(b)).count()
}

fn match_name(s: &str, class: impl Fn(char) -> bool) -> usize {
    match s.as_bytes().first() {
        None => 0,
        Some(b) if b.is_ascii_digit() => 0,
        Some(_) => s.chars().take_while(|&c| class(c)).map(char::len_utf8).sum(),
    }
}

/// Length of the directive name at the start of `s`. Zero if `s` is empty
/// or starts with an ASCII digit.
fn match_directive_name(s: &str) -> usize {
    match_name(s, is_directive_name)
}

/// Length of the argument name at the start of `s`. Zero if `s` is empty
/// or starts with an ASCII digit.
fn match_argument_name(s: &str) -> usize {
    match_name(s, is_argument_name)
}

/// Whether `s` begins with `\` followed by an escapable character or a
/// code point that can start a directive name. Lookahead only; consumes
/// nothing.
fn starts_with_escape_or_directive(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'\\' {
        return false;
    }
    if is_escapeable(bytes[1]) {
        return true;
    }
    s[1..].chars().next().is_some_and(is_directive_name_start)
}

/// The decomposed lengths of a `name =` prefix of an argument.
///
/// A zero `length` means the argument is unnamed. When present, the
/// sub-lengths sum to `length` exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NamedArgumentPrefix {
    length: usize,
    leading_whitespace: usize,
    name_length: usize,
    trailing_whitespace: usize,
}

impl NamedArgumentPrefix {
    fn is_present(&self) -> bool {
        self.length != 0
    }
}

/// Match `WS* name WS* "="` at the start of `s`.
fn match_named_argument_prefix(s: &str) -> NamedArgumentPrefix {
    let leading_whitespace = match_whitespace(s);
    let mut length = leading_whitespace;
    if length >= s.len() {
        return NamedArgumentPrefix::default();
    }

    let name_length = match_argument_name(&s[length..]);
    if name_length == 0 {
        return NamedArgumentPrefix::default();
    }
    length += name_length;

    let trailing_whitespace = match_whitespace(&s[length..]);
    length += trailing_whitespace;
    if s.as_bytes().get(length) != Some(&b'=') {
        return NamedArgumentPrefix::default();
    }
    length += 1;
    debug_assert_eq!(
        length,
        leading_whitespace + name_length + trailing_whitespace + 1
    );

    NamedArgumentPrefix {
        length,
        leading_whitespace,
        name_length,
        trailing_whitespace,
    }
}

// Grammar matchers. Mutually recursive; recursion depth is bounded by the
// nesting depth of directives in the input.

/// Which characters terminate a plain content run at bracket depth zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentContext {
    /// The whole document; only input exhaustion ends it.
    Document,
    /// A single argument within `[...]`.
    ArgumentValue,
    /// A `{...}` block.
    Block,
}

impl ContentContext {
    fn is_terminated_by(self, c: u8) -> bool {
        match self {
            ContentContext::ArgumentValue => matches!(c, b',' | b']' | b'}'),
            ContentContext::Block => c == b'}',
            ContentContext::Document => false,
        }
    }
}

/// Unmatched `[` and `{` depth seen while scanning argument content.
#[derive(Debug, Default)]
struct BracketLevels {
    square: usize,
    brace: usize,
}

/// Tokenization strategy driven by the grammar matchers.
///
/// The matchers report every construct they recognize through these
/// callbacks, in source order; implementations decide which of them become
/// tokens. Lengths are byte lengths of the construct at the strategy's
/// current position.
trait Consume {
    fn text(&mut self, length: usize);
    fn whitespace_in_arguments(&mut self, length: usize);
    fn opening_square(&mut self);
    fn closing_square(&mut self);
    fn comma(&mut self);
    fn argument_name(&mut self, length: usize);
    fn equals(&mut self);
    fn directive_name(&mut self, length: usize);
    fn opening_brace(&mut self);
    fn closing_brace(&mut self);
    fn escape(&mut self);

    fn push_directive(&mut self) {}
    fn pop_directive(&mut self) {}
    fn push_arguments(&mut self) {}
    fn pop_arguments(&mut self) {}
    fn unexpected_eof(&mut self) {}
}

/// Match a two-byte `\` + escapable-character sequence.
fn match_escape(out: &mut impl Consume, s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'\\' || !is_escapeable(bytes[1]) {
        return 0;
    }
    out.escape();
    2
}

/// Match one piece of content: an escape, a directive, or a maximal run of
/// plain characters honoring `context` at the current bracket depth.
fn match_content(
    out: &mut impl Consume,
    s: &str,
    context: ContentContext,
    levels: &mut BracketLevels,
) -> usize {
    let escape_length = match_escape(out, s);
    if escape_length != 0 {
        return escape_length;
    }
    let directive_length = match_directive(out, s);
    if directive_length != 0 {
        return directive_length;
    }

    let bytes = s.as_bytes();
    let mut plain_length = 0;
    while plain_length < bytes.len() {
        let c = bytes[plain_length];
        if c == b'\\' {
            if starts_with_escape_or_directive(&s[plain_length..]) {
                break;
            }
            plain_length += 1;
            continue;
        }
        if context == ContentContext::Document {
            plain_length += 1;
            continue;
        }
        if context == ContentContext::ArgumentValue && levels.brace == 0 {
            if levels.square == 0 && c == b',' {
                break;
            }
            if c == b'[' {
                levels.square += 1;
            }
            if c == b']' {
                if levels.square == 0 {
                    break;
                }
                levels.square -= 1;
            }
        }
        if c == b'{' {
            levels.brace += 1;
        }
        if c == b'}' {
            if levels.brace == 0 {
                break;
            }
            levels.brace -= 1;
        }
        plain_length += 1;
    }

    out.text(plain_length);
    plain_length
}

/// Match content pieces until input is exhausted or the next character
/// terminates `context`. Returns the total byte length consumed.
fn match_content_sequence(out: &mut impl Consume, s: &str, context: ContentContext) -> usize {
    let mut levels = BracketLevels::default();
    let mut length = 0;

    loop {
        let rest = &s[length..];
        match rest.as_bytes().first() {
            None => break,
            Some(&c) if context.is_terminated_by(c) => break,
            Some(_) => {}
        }
        let content_length = match_content(out, rest, context, &mut levels);
        debug_assert_ne!(content_length, 0, "content matcher made no progress");
        length += content_length;
    }
    length
}

/// Match one argument: an optional `name =` prefix followed by a content
/// sequence in argument-value context.
fn match_argument(out: &mut impl Consume, s: &str) -> usize {
    let name = match_named_argument_prefix(s);
    if name.is_present() {
        if name.leading_whitespace != 0 {
            out.whitespace_in_arguments(name.leading_whitespace);
        }
        out.argument_name(name.name_length);
        if name.trailing_whitespace != 0 {
            out.whitespace_in_arguments(name.trailing_whitespace);
        }
        out.equals();
    }
    let content_length =
        match_content_sequence(out, &s[name.length..], ContentContext::ArgumentValue);
    name.length + content_length
}

/// Match a `[...]` argument list. A `}` in terminating position ends the
/// list without being consumed; it belongs to the enclosing block.
fn match_argument_list(out: &mut impl Consume, s: &str) -> usize {
    if !s.starts_with('[') {
        return 0;
    }
    out.push_arguments();
    out.opening_square();

    let mut length = 1;
    while length < s.len() {
        length += match_argument(out, &s[length..]);

        match s.as_bytes().get(length) {
            None => break,
            Some(b'}') => {
                out.pop_arguments();
                return length;
            }
            Some(b']') => {
                out.closing_square();
                out.pop_arguments();
                return length + 1;
            }
            Some(b',') => {
                out.comma();
                length += 1;
            }
            Some(_) => unreachable!("argument terminated by a character outside its ruleset"),
        }
    }

    out.unexpected_eof();
    length
}

/// Match a `{...}` block.
fn match_block(out: &mut impl Consume, s: &str) -> usize {
    if !s.starts_with('{') {
        return 0;
    }
    out.opening_brace();

    let content_length = match_content_sequence(out, &s[1..], ContentContext::Block);
    if s[1 + content_length..].starts_with('}') {
        out.closing_brace();
        content_length + 2
    } else {
        debug_assert_eq!(1 + content_length, s.len());
        out.unexpected_eof();
        content_length + 1
    }
}

/// Match a `\name[...]{...}` directive. The name is mandatory; the
/// argument list and the block are both optional.
fn match_directive(out: &mut impl Consume, s: &str) -> usize {
    if !s.starts_with('\\') {
        return 0;
    }
    let name_length = match_directive_name(&s[1..]);
    if name_length == 0 {
        return 0;
    }
    out.push_directive();
    out.directive_name(1 + name_length);

    let args_length = match_argument_list(out, &s[1 + name_length..]);
    let block_length = match_block(out, &s[1 + name_length + args_length..]);
    out.pop_directive();
    1 + name_length + args_length + block_length
}

// Consumers.

/// Default strategy: every classified construct becomes one token at the
/// sink's cursor; plain text and whitespace advance without a token.
struct NormalConsumer<'s, 'src> {
    sink: &'s mut TokenSink<'src>,
}

impl Consume for NormalConsumer<'_, '_> {
    fn text(&mut self, length: usize) {
        self.sink.advance(length);
    }
    fn whitespace_in_arguments(&mut self, length: usize) {
        self.sink.advance(length);
    }
    fn opening_square(&mut self) {
        self.sink.emit_and_advance(1, HighlightKind::Bracket);
    }
    fn closing_square(&mut self) {
        self.sink.emit_and_advance(1, HighlightKind::Bracket);
    }
    fn comma(&mut self) {
        self.sink.emit_and_advance(1, HighlightKind::Punctuation);
    }
    fn argument_name(&mut self, length: usize) {
        self.sink.emit_and_advance(length, HighlightKind::MarkupAttribute);
    }
    fn equals(&mut self) {
        self.sink.emit_and_advance(1, HighlightKind::Punctuation);
    }
    fn directive_name(&mut self, length: usize) {
        self.sink.emit_and_advance(length, HighlightKind::MarkupTag);
    }
    fn opening_brace(&mut self) {
        self.sink.emit_and_advance(1, HighlightKind::Brace);
    }
    fn closing_brace(&mut self) {
        self.sink.emit_and_advance(1, HighlightKind::Brace);
    }
    fn escape(&mut self) {
        self.sink.emit_and_advance(2, HighlightKind::Escape);
    }
}

/// Where a code-block consumer stands relative to the raw `{...}` body of
/// its directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    BeforeBlock,
    InBlock,
    Done,
}

/// Strategy for directives whose block holds embedded code in another
/// language.
///
/// Bare text at block depth one is captured raw into a side buffer instead
/// of being tokenized, together with a table mapping each captured byte
/// back to its original offset; the snippet can then be re-lexed in the
/// embedded language and its tokens merged at the remapped positions.
/// Everything else, including directive-shaped syntax nested inside the
/// block, still goes through the normal strategy.
#[allow(dead_code)]
struct CodeBlockConsumer<'s, 'src> {
    normal: NormalConsumer<'s, 'src>,
    /// Raw bytes of the captured snippet.
    snippet: String,
    /// Original byte offset of each snippet byte.
    remap: Vec<usize>,
    arguments_level: usize,
    brace_level: usize,
    state: BlockState,
}

#[allow(dead_code)]
impl<'s, 'src> CodeBlockConsumer<'s, 'src> {
    fn new(sink: &'s mut TokenSink<'src>) -> Self {
        Self {
            normal: NormalConsumer { sink },
            snippet: String::new(),
            remap: Vec::new(),
            arguments_level: 0,
            brace_level: 0,
            state: BlockState::BeforeBlock,
        }
    }

    fn done(&self) -> bool {
        self.state == BlockState::Done
    }

    /// Hand off the captured snippet and its offset remap table.
    fn into_snippet(self) -> (String, Vec<usize>) {
        (self.snippet, self.remap)
    }
}

impl Consume for CodeBlockConsumer<'_, '_> {
    fn text(&mut self, length: usize) {
        if self.arguments_level != 0 || self.brace_level > 1 {
            self.normal.text(length);
        } else {
            debug_assert_eq!(self.brace_level, 1);
            let code = &self.normal.sink.remainder()[..length];
            let base = self.normal.sink.position();
            self.snippet.push_str(code);
            self.remap.extend(base..base + length);
            self.normal.sink.advance(length);
        }
    }
    fn whitespace_in_arguments(&mut self, length: usize) {
        self.normal.whitespace_in_arguments(length);
    }
    fn opening_square(&mut self) {
        self.normal.opening_square();
    }
    fn closing_square(&mut self) {
        self.normal.closing_square();
    }
    fn comma(&mut self) {
        self.normal.comma();
    }
    fn argument_name(&mut self, length: usize) {
        self.normal.argument_name(length);
    }
    fn equals(&mut self) {
        self.normal.equals();
    }
    fn directive_name(&mut self, length: usize) {
        self.normal.directive_name(length);
    }
    fn opening_brace(&mut self) {
        self.normal.opening_brace();
        if self.arguments_level == 0 && self.brace_level == 0 {
            debug_assert_eq!(self.state, BlockState::BeforeBlock);
            self.state = BlockState::InBlock;
        }
        self.brace_level += 1;
    }
    fn closing_brace(&mut self) {
        self.normal.closing_brace();
        self.brace_level -= 1;
        if self.arguments_level == 0 && self.brace_level == 0 {
            self.state = BlockState::Done;
        }
    }
    fn escape(&mut self) {
        self.normal.escape();
    }

    fn push_arguments(&mut self) {
        self.arguments_level += 1;
    }
    fn pop_arguments(&mut self) {
        self.arguments_level -= 1;
    }
    fn unexpected_eof(&mut self) {
        self.state = BlockState::Done;
    }
}

/// Which length counter a comment consumer is currently filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentPhase {
    Prefix,
    Content,
    Suffix,
}

/// Strategy that reduces one comment directive to three spans: the opening
/// delimiter (name through `{`), the opaque content, and the closing `}`.
///
/// Every callback adds its length to the counter selected by the current
/// phase; the phase advances when the directive's own block opens and
/// closes. Nested constructs inside the body are swallowed into the
/// content counter rather than tokenized.
struct CommentConsumer {
    prefix: usize,
    content: usize,
    suffix: usize,
    arguments_level: usize,
    brace_level: usize,
    phase: CommentPhase,
}

impl CommentConsumer {
    fn new() -> Self {
        Self {
            prefix: 0,
            content: 0,
            suffix: 0,
            arguments_level: 0,
            brace_level: 0,
            phase: CommentPhase::Prefix,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn done(&self) -> bool {
        self.phase == CommentPhase::Suffix
    }

    fn add(&mut self, length: usize) {
        match self.phase {
            CommentPhase::Prefix => self.prefix += length,
            CommentPhase::Content => self.content += length,
            CommentPhase::Suffix => self.suffix += length,
        }
    }
}

impl Consume for CommentConsumer {
    fn text(&mut self, length: usize) {
        self.add(length);
    }
    fn whitespace_in_arguments(&mut self, length: usize) {
        self.add(length);
    }
    fn opening_square(&mut self) {
        self.add(1);
    }
    fn closing_square(&mut self) {
        self.add(1);
    }
    fn comma(&mut self) {
        self.add(1);
    }
    fn argument_name(&mut self, length: usize) {
        self.add(length);
    }
    fn equals(&mut self) {
        self.add(1);
    }
    fn directive_name(&mut self, length: usize) {
        self.add(length);
    }
    fn opening_brace(&mut self) {
        self.add(1);
        if self.arguments_level == 0 && self.brace_level == 0 {
            debug_assert_ne!(self.prefix, 0);
            self.phase = CommentPhase::Content;
        }
        self.brace_level += 1;
    }
    fn closing_brace(&mut self) {
        self.brace_level -= 1;
        if self.arguments_level == 0 && self.brace_level == 0 && self.phase == CommentPhase::Content
        {
            self.phase = CommentPhase::Suffix;
        }
        self.add(1);
    }
    fn escape(&mut self) {
        self.add(2);
    }

    fn push_arguments(&mut self) {
        self.arguments_level += 1;
    }
    fn pop_arguments(&mut self) {
        self.arguments_level -= 1;
    }
    fn unexpected_eof(&mut self) {
        self.phase = CommentPhase::Suffix;
        debug_assert!(self.done());
    }
}

/// Which strategy currently receives callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Current {
    Normal,
    Comment,
}

/// Pass-level coordinator.
///
/// Routes callbacks to the normal strategy until a recognized comment
/// directive's name is seen, then to the comment accumulator until that
/// directive closes and its three spans are flushed to the sink. At most
/// one directive is in comment mode at a time; directives nested inside a
/// comment body are swallowed by the accumulator.
struct DispatchConsumer<'s, 'src> {
    normal: NormalConsumer<'s, 'src>,
    comment: CommentConsumer,
    current: Current,
}

impl<'s, 'src> DispatchConsumer<'s, 'src> {
    fn new(sink: &'s mut TokenSink<'src>) -> Self {
        Self {
            normal: NormalConsumer { sink },
            comment: CommentConsumer::new(),
            current: Current::Normal,
        }
    }

    fn try_flush_comment(&mut self) {
        if self.current != Current::Comment || !self.comment.done() {
            return;
        }
        let sink = &mut *self.normal.sink;
        debug_assert_ne!(self.comment.prefix, 0);
        sink.emit_and_advance(self.comment.prefix, HighlightKind::CommentDelimiter);
        if self.comment.content != 0 {
            sink.emit_and_advance(self.comment.content, HighlightKind::Comment);
        }
        if self.comment.suffix != 0 {
            debug_assert_eq!(self.comment.suffix, 1);
            sink.emit_and_advance(self.comment.suffix, HighlightKind::CommentDelimiter);
        }
        self.comment.reset();
        self.current = Current::Normal;
    }
}

impl Consume for DispatchConsumer<'_, '_> {
    fn text(&mut self, length: usize) {
        debug_assert_ne!(length, 0);
        match self.current {
            Current::Normal => self.normal.text(length),
            Current::Comment => self.comment.text(length),
        }
    }
    fn whitespace_in_arguments(&mut self, length: usize) {
        debug_assert_ne!(length, 0);
        match self.current {
            Current::Normal => self.normal.whitespace_in_arguments(length),
            Current::Comment => self.comment.whitespace_in_arguments(length),
        }
    }
    fn opening_square(&mut self) {
        match self.current {
            Current::Normal => self.normal.opening_square(),
            Current::Comment => self.comment.opening_square(),
        }
    }
    fn closing_square(&mut self) {
        match self.current {
            Current::Normal => self.normal.closing_square(),
            Current::Comment => self.comment.closing_square(),
        }
    }
    fn comma(&mut self) {
        match self.current {
            Current::Normal => self.normal.comma(),
            Current::Comment => self.comment.comma(),
        }
    }
    fn argument_name(&mut self, length: usize) {
        debug_assert_ne!(length, 0);
        match self.current {
            Current::Normal => self.normal.argument_name(length),
            Current::Comment => self.comment.argument_name(length),
        }
    }
    fn equals(&mut self) {
        match self.current {
            Current::Normal => self.normal.equals(),
            Current::Comment => self.comment.equals(),
        }
    }
    fn directive_name(&mut self, length: usize) {
        debug_assert_ne!(length, 0);
        // The sink's remainder is only caught up with the matcher while in
        // normal mode, which is exactly when the comparison matters; in
        // comment mode a stale read can at worst re-select comment mode.
        let name = &self.normal.sink.remainder().as_bytes()[..length];
        if COMMENT_DIRECTIVES.contains(&name) {
            trace!("comment directive, switching consumer");
            self.current = Current::Comment;
        }
        match self.current {
            Current::Normal => self.normal.directive_name(length),
            Current::Comment => self.comment.directive_name(length),
        }
    }
    fn opening_brace(&mut self) {
        match self.current {
            Current::Normal => self.normal.opening_brace(),
            Current::Comment => self.comment.opening_brace(),
        }
    }
    fn closing_brace(&mut self) {
        match self.current {
            Current::Normal => self.normal.closing_brace(),
            Current::Comment => self.comment.closing_brace(),
        }
    }
    fn escape(&mut self) {
        match self.current {
            Current::Normal => self.normal.escape(),
            Current::Comment => self.comment.escape(),
        }
    }

    fn push_directive(&mut self) {
        // Deliberately nothing: the directive name decides which strategy
        // handles the directive, and it has not been seen yet.
    }
    fn pop_directive(&mut self) {
        self.try_flush_comment();
    }
    fn push_arguments(&mut self) {
        match self.current {
            Current::Normal => self.normal.push_arguments(),
            Current::Comment => self.comment.push_arguments(),
        }
    }
    fn pop_arguments(&mut self) {
        match self.current {
            Current::Normal => self.normal.pop_arguments(),
            Current::Comment => self.comment.pop_arguments(),
        }
    }
    fn unexpected_eof(&mut self) {
        match self.current {
            Current::Normal => self.normal.unexpected_eof(),
            Current::Comment => self.comment.unexpected_eof(),
        }
        self.try_flush_comment();
    }
}
