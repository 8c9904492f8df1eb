//! Token model and output buffer for the lumen syntax highlighters.

mod token;
pub use token::{HighlightKind, Token};

mod sink;
pub use sink::{HighlightOptions, TokenSink};
