//! Prompt construction for dictated-line correction.
//!
//! The model sees the whole document so it can use the surrounding text as
//! context, with the line to fix tagged by [`SENTINEL`].  [`PromptBuilder`]
//! returns the `(system_msg, user_msg)` pair sent to an OpenAI-compatible
//! `/v1/chat/completions` endpoint.

use thiserror::Error;

/// Label prefixed to the dictated line.
pub const SENTINEL: &str = "[DICTATED] ";

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION: &str = "\
You are a voice-dictation post-correction assistant.
The user sends a whole document. Exactly one line starts with the marker \"[DICTATED] \".
That line was produced by speech recognition and may contain transcription errors.

Rules:
1. Fix mis-transcribed words (homophones, words that sound similar but are wrong in context).
2. Fix punctuation, capitalisation and spacing.
3. Use the rest of the document only as context; do not correct other lines.
4. Preserve technical terms, proper nouns, markdown and code exactly.
5. Reply with ONLY the corrected version of the marked line, without the marker and without explanation.
6. If the line is already correct, return it unchanged.";

// ---------------------------------------------------------------------------
// PromptError
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// The requested line does not exist in the document.
    #[error("line {line} is out of range (document has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
}

// ---------------------------------------------------------------------------
// Line tagging
// ---------------------------------------------------------------------------

/// Number of lines in `text` as an editor counts them: an empty document has
/// one empty line and a trailing newline opens a final empty line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Return `text` with line `line` (zero-based) prefixed by [`SENTINEL`].
///
/// Every other byte of the document, including `\r` line endings and a
/// trailing newline, is left as is.
pub fn tag_line(text: &str, line: usize) -> Result<String, PromptError> {
    let line_count = line_count(text);
    if line >= line_count {
        return Err(PromptError::LineOutOfRange { line, line_count });
    }

    let tagged = text
        .split('\n')
        .enumerate()
        .map(|(i, l)| {
            if i == line {
                format!("{SENTINEL}{l}")
            } else {
                l.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(tagged)
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the two chat messages for a correction request.
///
/// ```rust
/// use talon_corrector::llm::PromptBuilder;
///
/// let (system, user) = PromptBuilder::new().build_chat("foo\nbar", 1).unwrap();
/// assert!(system.contains("[DICTATED]"));
/// assert_eq!(user, "foo\n[DICTATED] bar");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// The fixed system instruction.
    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    /// Build a **(system_msg, user_msg)** pair; the user message is the
    /// tagged document.
    pub fn build_chat(&self, document: &str, line: usize) -> Result<(String, String), PromptError> {
        let user_msg = tag_line(document, line)?;
        Ok((self.system_instruction().to_string(), user_msg))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
