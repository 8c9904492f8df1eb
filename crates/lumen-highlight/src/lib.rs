//! Syntax-highlighting lexers for the lumen family.
//!
//! Given raw source text in a known language, these lexers produce an
//! ordered stream of classified [`Token`]s without building a syntax tree.
//! Pick a language with [`Lang::from_name`] and run [`highlight`].

pub use lumen_token::{HighlightKind, HighlightOptions, Token, TokenSink};

pub mod chars;

mod lang;
pub use lang::Lang;

mod mmml;

/// Highlight `source` as `lang`, returning the ordered token stream.
///
/// Highlighting cannot fail: a truncated construct ends the pass early and
/// the tokens already emitted for the well-formed prefix stand.
pub fn highlight(source: &str, lang: Lang, options: HighlightOptions) -> Vec<Token> {
    let mut sink = TokenSink::new(source, options);
    match lang {
        Lang::Mmml => mmml::highlight(&mut sink),
    }
    sink.into_tokens()
}
