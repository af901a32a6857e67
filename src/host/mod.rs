//! Host editor contract.
//!
//! The plugin only needs three things from an editor: the active file's
//! contents, the cursor position and a way to insert text.  [`EditorView`]
//! captures that; [`TextDocument`] and [`FileView`] implement it.

pub mod document;

pub use document::{FileView, TextDocument};

use thiserror::Error;

/// Zero-based editor coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The active view of a host editor.
pub trait EditorView {
    /// Contents of the file behind this view, or `None` when the view has no
    /// backing file.
    fn file_contents(&self) -> Result<Option<String>, HostError>;

    /// Current cursor position.
    fn cursor(&self) -> Position;

    /// Insert `text` at `pos`.
    fn insert_text(&mut self, pos: Position, text: &str) -> Result<(), HostError>;
}
