//! Editor views: an in-memory [`TextDocument`] and a disk-backed [`FileView`].

use std::path::{Path, PathBuf};

use super::{EditorView, HostError, Position};

// ---------------------------------------------------------------------------
// TextDocument
// ---------------------------------------------------------------------------

/// In-memory document with a cursor.
///
/// Positions are `(line, ch)` with `ch` counted in `char`s.  Out-of-range
/// positions clamp: a `ch` past the end of its line lands at the end of that
/// line, a `line` past the last line lands at the end of the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDocument {
    text: String,
    cursor: Position,
    has_file: bool,
}

impl TextDocument {
    /// Document backed by a file, cursor at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: Position::default(),
            has_file: true,
        }
    }

    /// Document assembled from `lines` joined with `\n`.
    pub fn from_lines(lines: &[&str]) -> Self {
        Self::new(lines.join("\n"))
    }

    /// Scratch buffer with no backing file.
    pub fn unsaved(text: impl Into<String>) -> Self {
        Self {
            has_file: false,
            ..Self::new(text)
        }
    }

    pub fn with_cursor(mut self, cursor: Position) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Byte offset of `pos`, clamped as described on the type.
    fn offset_of(&self, pos: Position) -> usize {
        let mut start = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            if i == pos.line {
                let within = line
                    .char_indices()
                    .nth(pos.ch)
                    .map(|(b, _)| b)
                    .unwrap_or(line.len());
                return start + within;
            }
            start += line.len() + 1;
        }
        self.text.len()
    }
}

impl EditorView for TextDocument {
    fn file_contents(&self) -> Result<Option<String>, HostError> {
        Ok(self.has_file.then(|| self.text.clone()))
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn insert_text(&mut self, pos: Position, text: &str) -> Result<(), HostError> {
        let offset = self.offset_of(pos);
        self.text.insert_str(offset, text);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileView
// ---------------------------------------------------------------------------

/// A file on disk viewed with a fixed cursor line.
///
/// Every insertion re-reads the file, applies the edit and writes it back.
#[derive(Debug, Clone)]
pub struct FileView {
    path: PathBuf,
    cursor: Position,
}

impl FileView {
    pub fn new(path: impl Into<PathBuf>, cursor: Position) -> Self {
        Self {
            path: path.into(),
            cursor,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EditorView for FileView {
    fn file_contents(&self) -> Result<Option<String>, HostError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.path)?))
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn insert_text(&mut self, pos: Position, text: &str) -> Result<(), HostError> {
        let mut doc = TextDocument::new(std::fs::read_to_string(&self.path)?);
        doc.insert_text(pos, text)?;
        std::fs::write(&self.path, doc.text())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
