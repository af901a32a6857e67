//! Talon line corrector.
//!
//! Sends the dictated line under the cursor, together with the rest of the
//! document, to a chat-completion API and inserts the model's corrected
//! version on the line below.
//!
//! * [`config`] — persisted [`Settings`](config::Settings) and the host
//!   settings store.
//! * [`host`] — the editor contract ([`EditorView`](host::EditorView)) with
//!   in-memory and on-disk views.
//! * [`llm`] — line tagging, prompt building and the completion client.
//! * [`plugin`] — lifecycle hooks and the `correct-current-line` command.

pub mod config;
pub mod host;
pub mod llm;
pub mod plugin;
