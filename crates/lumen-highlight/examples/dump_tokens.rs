use std::io::Read;

use lumen_highlight::{HighlightOptions, Lang, highlight};

fn main() {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source).unwrap();

    for token in highlight(&source, Lang::Mmml, HighlightOptions::default()) {
        println!(
            "{}..{} {}",
            token.begin,
            token.end(),
            token.kind.as_str()
        );
    }
}
