//! The `correct-current-line` command handler.

use thiserror::Error;

use crate::host::{EditorView, HostError, Position};
use crate::llm::{line_count, CorrectionError, Corrector};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("correction failed: {0}")]
    Correction(#[from] CorrectionError),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// What a command invocation did to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The view had no backing file; nothing happened.
    NoActiveFile,
    /// `text` was inserted at `at`.
    Inserted { at: Position, text: String },
}

/// `"\r\n"` when the document already uses CRLF endings, `"\n"` otherwise.
fn line_ending(contents: &str) -> &'static str {
    if contents.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Correct the line under the cursor and insert the result below it.
///
/// The original line is left untouched.  Inserted text always ends up on its
/// own line: normally `"{corrected}\n"` at the start of the next line, or
/// `"\n{corrected}"` at the end of the document when the cursor is on the
/// last line.  CRLF documents get `"\r\n"` instead of `"\n"`.
pub async fn correct_current_line(
    corrector: &Corrector,
    view: &mut dyn EditorView,
) -> Result<CommandOutcome, CommandError> {
    let Some(contents) = view.file_contents()? else {
        return Ok(CommandOutcome::NoActiveFile);
    };
    let line = view.cursor().line;

    let corrected = corrector.correct_line(&contents, line).await?;

    let eol = line_ending(&contents);
    let (at, text) = if line + 1 < line_count(&contents) {
        (Position::new(line + 1, 0), format!("{corrected}{eol}"))
    } else {
        (Position::new(line, usize::MAX), format!("{eol}{corrected}"))
    };
    view.insert_text(at, &text)?;

    log::info!("inserted correction below line {}", line + 1);
    Ok(CommandOutcome::Inserted { at, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompletionConfig;
    use crate::host::TextDocument;
    use crate::llm::{ChatRequest, CompletionApi, LlmError};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Reply(&'static str);

    #[async_trait]
    impl CompletionApi for Reply {
        async fn complete(&self, _request: &ChatRequest) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    #[async_trait]
    impl CompletionApi for Offline {
        async fn complete(&self, _request: &ChatRequest) -> Result<String, LlmError> {
            Err(LlmError::Request("connection refused".into()))
        }
    }

    fn corrector(api: impl CompletionApi + 'static) -> Corrector {
        Corrector::new(Arc::new(api), CompletionConfig::default())
    }

    #[tokio::test]
    async fn inserts_correction_below_cursor_line() {
        let mut doc =
            TextDocument::from_lines(&["foo", "bar", "baz"]).with_cursor(Position::new(1, 2));

        let outcome = correct_current_line(&corrector(Reply("Bar.")), &mut doc)
            .await
            .unwrap();

        assert_eq!(doc.lines(), vec!["foo", "bar", "Bar.", "baz"]);
        assert_eq!(
            outcome,
            CommandOutcome::Inserted {
                at: Position::new(2, 0),
                text: "Bar.\n".into()
            }
        );
    }

    #[tokio::test]
    async fn last_line_correction_gets_its_own_line() {
        let mut doc = TextDocument::from_lines(&["foo", "bar"]).with_cursor(Position::new(1, 0));

        correct_current_line(&corrector(Reply(" Bar. ")), &mut doc)
            .await
            .unwrap();

        assert_eq!(doc.lines(), vec!["foo", "bar", "Bar."]);
    }

    #[tokio::test]
    async fn trailing_newline_document() {
        let mut doc = TextDocument::new("bar\n").with_cursor(Position::new(0, 0));

        correct_current_line(&corrector(Reply("Bar.")), &mut doc)
            .await
            .unwrap();

        assert_eq!(doc.text(), "bar\nBar.\n");
    }

    #[tokio::test]
    async fn crlf_document_keeps_crlf_endings() {
        let mut doc = TextDocument::new("one\r\ntwo\r\nthree").with_cursor(Position::new(0, 0));

        correct_current_line(&corrector(Reply("One.")), &mut doc)
            .await
            .unwrap();
        assert_eq!(doc.text(), "one\r\nOne.\r\ntwo\r\nthree");

        let mut doc = TextDocument::new("one\r\ntwo").with_cursor(Position::new(1, 0));
        correct_current_line(&corrector(Reply("Two.")), &mut doc)
            .await
            .unwrap();
        assert_eq!(doc.text(), "one\r\ntwo\r\nTwo.");
    }

    #[tokio::test]
    async fn blank_reply_leaves_document_untouched() {
        let mut doc =
            TextDocument::from_lines(&["foo", "bar", "baz"]).with_cursor(Position::new(1, 0));

        let err = correct_current_line(&corrector(Reply("  \n ")), &mut doc)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::Correction(CorrectionError::Llm(LlmError::EmptyResponse))
        ));
        assert_eq!(doc.text(), "foo\nbar\nbaz");
    }

    #[tokio::test]
    async fn no_file_is_a_silent_no_op() {
        let mut doc = TextDocument::unsaved("foo");

        let outcome = correct_current_line(&corrector(Offline), &mut doc)
            .await
            .unwrap();

        assert_eq!(outcome, CommandOutcome::NoActiveFile);
        assert_eq!(doc.text(), "foo");
    }

    #[tokio::test]
    async fn api_failure_leaves_document_untouched() {
        let mut doc = TextDocument::from_lines(&["foo", "bar"]);

        let err = correct_current_line(&corrector(Offline), &mut doc)
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::Correction(_)));
        assert_eq!(doc.text(), "foo\nbar");
    }
}
