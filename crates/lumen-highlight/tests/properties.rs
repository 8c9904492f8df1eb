//! Property tests for the markup lexer.

use lumen_highlight::{HighlightOptions, Lang, highlight};
use proptest::prelude::*;

proptest! {
    /// Emitted tokens never overlap, never run backwards, and never leave
    /// the source.
    #[test]
    fn tokens_are_ordered_and_disjoint(source in ".*") {
        let tokens = highlight(&source, Lang::Mmml, HighlightOptions::default());
        let total = source.chars().count();
        let mut pos = 0;
        for token in &tokens {
            prop_assert!(token.begin >= pos);
            prop_assert!(token.end() <= total);
            prop_assert!(token.length > 0);
            pos = token.end();
        }
    }

    /// The lexer is a pure function of its input.
    #[test]
    fn highlighting_is_deterministic(source in ".*") {
        let first = highlight(&source, Lang::Mmml, HighlightOptions::default());
        let second = highlight(&source, Lang::Mmml, HighlightOptions::default());
        prop_assert_eq!(first, second);
    }

    /// Inputs dense in markup structure stay well formed too.
    #[test]
    fn markup_heavy_inputs_stay_in_bounds(source in r"[\\a-z\[\]{},= ]{0,64}") {
        let tokens = highlight(&source, Lang::Mmml, HighlightOptions::default());
        let total = source.chars().count();
        let mut pos = 0;
        for token in &tokens {
            prop_assert!(token.begin >= pos);
            prop_assert!(token.end() <= total);
            pos = token.end();
        }
    }

    /// With coalescing on, no two neighboring tokens of the same kind abut.
    #[test]
    fn coalesced_tokens_never_abut(source in r"[\\a-z\[\]{},= ]{0,64}") {
        let tokens = highlight(&source, Lang::Mmml, HighlightOptions { coalescing: true });
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].kind != pair[1].kind || pair[0].end() != pair[1].begin);
        }
    }
}
