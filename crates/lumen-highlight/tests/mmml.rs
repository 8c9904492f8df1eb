//! End-to-end tests for the MMML highlighter through the public API.

use lumen_highlight::{HighlightKind, HighlightOptions, Lang, Token, highlight};

fn mmml(source: &str) -> Vec<Token> {
    highlight(source, Lang::Mmml, HighlightOptions::default())
}

fn dump(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}..{} {}", t.begin, t.end(), t.kind.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Emitted spans are ordered, disjoint, and within the source.
fn assert_well_formed(source: &str, tokens: &[Token]) {
    let total = source.chars().count();
    let mut pos = 0;
    for token in tokens {
        assert!(token.begin >= pos, "overlapping token {token:?} in {source:?}");
        assert!(token.end() <= total, "token {token:?} out of bounds in {source:?}");
        pos = token.end();
    }
}

#[test]
fn plain_text_emits_no_tokens() {
    assert_eq!(mmml("just some text, nothing else."), []);
    assert_eq!(mmml(""), []);
}

#[test]
fn escapes_are_atomic_two_unit_tokens() {
    assert_eq!(
        mmml("a\\{b"),
        [Token::new(1, 2, HighlightKind::Escape)]
    );
}

#[test]
fn escaped_backslash_is_not_a_directive() {
    // `\\` is an escape; the `d` after it is plain text.
    assert_eq!(
        mmml("\\\\d"),
        [Token::new(0, 2, HighlightKind::Escape)]
    );
}

#[test]
fn brackets_and_braces_balance_in_well_formed_input() {
    let tokens = mmml("\\d[a]{b}");
    let count = |kind| tokens.iter().filter(|t| t.kind == kind).count();
    assert_eq!(count(HighlightKind::Bracket), 2);
    assert_eq!(count(HighlightKind::Brace), 2);
    assert_well_formed("\\d[a]{b}", &tokens);
}

#[test]
fn comment_body_is_opaque() {
    let source = "\\comment{anything[with]{nested}brackets}";
    assert_eq!(
        mmml(source),
        [
            Token::new(0, 9, HighlightKind::CommentDelimiter),
            Token::new(9, 30, HighlightKind::Comment),
            Token::new(39, 1, HighlightKind::CommentDelimiter),
        ]
    );
}

#[test]
fn unterminated_argument_list_truncates_quietly() {
    // The directive name, the opening bracket, and the comma are lexed;
    // there is no closing bracket token and no failure.
    assert_eq!(
        mmml("\\d[a,b"),
        [
            Token::new(0, 2, HighlightKind::MarkupTag),
            Token::new(2, 1, HighlightKind::Bracket),
            Token::new(4, 1, HighlightKind::Punctuation),
        ]
    );
}

#[test]
fn named_argument_token_order() {
    assert_eq!(
        mmml("\\d[ x = 1 ]"),
        [
            Token::new(0, 2, HighlightKind::MarkupTag),
            Token::new(2, 1, HighlightKind::Bracket),
            Token::new(4, 1, HighlightKind::MarkupAttribute),
            Token::new(6, 1, HighlightKind::Punctuation),
            Token::new(10, 1, HighlightKind::Bracket),
        ]
    );
}

#[test]
fn highlighting_is_deterministic() {
    let sources = [
        "",
        "plain",
        "\\d[a,b]{c}",
        "\\comment{[}",
        "\\a{\\b{\\c}}",
        "\\d[a,b",
        "text \\\\ more \\{ text",
    ];
    for source in sources {
        assert_eq!(mmml(source), mmml(source), "re-lexing {source:?} diverged");
    }
}

#[test]
fn token_spans_are_ordered_and_in_bounds() {
    let sources = [
        "\\d[ x = 1 ]{body}",
        "\\comment{abc}tail",
        "\\d[a}rest",
        "\\é{日本}",
        "\\d[a,b",
        "\\d{unclosed",
    ];
    for source in sources {
        assert_well_formed(source, &mmml(source));
    }
}

#[test]
fn coalescing_merges_adjacent_braces() {
    let source = "\\a{\\b{}}";
    let plain = mmml(source);
    let coalesced = highlight(source, Lang::Mmml, HighlightOptions { coalescing: true });
    assert!(plain.len() > coalesced.len());
    // `{` and `}` share a kind, so the trailing `{}}` run becomes one token.
    let last = coalesced.last().unwrap();
    assert_eq!(last.kind, HighlightKind::Brace);
    assert_eq!(last.length, 3);
}

#[test]
fn mixed_document_snapshot() {
    insta::assert_snapshot!(
        dump(&mmml("Hello \\b{world}\\comment{ignore me}!")),
        @r"
    6..8 markup-tag
    8..9 brace
    14..15 brace
    15..24 comment-delim
    24..33 comment
    33..34 comment-delim
    "
    );
}

#[test]
fn argument_list_snapshot() {
    insta::assert_snapshot!(
        dump(&mmml("\\img[ src = a.png, alt = logo ]")),
        @r"
    0..4 markup-tag
    4..5 bracket
    6..9 markup-attr
    10..11 punct
    17..18 punct
    19..22 markup-attr
    23..24 punct
    30..31 bracket
    "
    );
}
