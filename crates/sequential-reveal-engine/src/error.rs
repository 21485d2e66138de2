use crate::{io::IoError, notebook::NotebookError, parsing::SplitError, reveal::RevealError};

/// Any failure surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Reveal(#[from] RevealError),
    #[error(transparent)]
    Notebook(#[from] NotebookError),
    #[error(transparent)]
    Io(#[from] IoError),
}
