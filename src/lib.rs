// Library root
// -----------
// This crate exposes the pieces of the FileShare terminal client. The
// binary (`main.rs`) wires them together into the interactive session.
//
// Module responsibilities:
// - `state`: the session data (screens, text buffers, file list, status).
// - `transition`: the keyboard/completion state machine over `state`.
// - `command`: the asynchronous operations a transition can schedule and
//   the completion values they report back.
// - `executor`: runs commands off the event loop against `api`,
//   `credentials` and the file picker.
// - `api`: blocking HTTP client for the remote site/file endpoints.
// - `credentials`: the on-disk `auth_token=` store.
// - `render`: pure function from session to a text frame.
// - `ui`: crossterm terminal driver and the event loop.
// - `config`, `logging`, `error`: ambient plumbing.
pub mod api;
pub mod command;
pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod logging;
pub mod render;
pub mod state;
pub mod transition;
pub mod ui;
