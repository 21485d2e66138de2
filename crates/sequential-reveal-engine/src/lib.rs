pub mod error;
pub mod io;
pub mod notebook;
pub mod parsing;
pub mod reveal;
pub mod style;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use error::Error;
pub use io::*;
pub use notebook::*;
pub use parsing::{CodeFence, Document, Section, SplitError, split, split_with_fence};
pub use reveal::{
    Reveal, RevealError, RevealOptions, RevealProgress, render, render_with_options,
    resolve_visible_count, reveal_next,
};
pub use style::StyleSource;
