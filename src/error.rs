// Error types shared by the API client, the credential store and the
// command executor. Every variant renders to the text shown to the user
// in the status line, so Display impls carry the underlying cause.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Failure of a scheduled command. Never fatal: the transition function
/// turns it into `StatusMessage::Failure` and returns to the main menu.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("error connecting to server: {0}")]
    Connection(String),

    /// Non-success status. `message` is the server's error text.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("error parsing server response: {0}")]
    Parse(String),

    #[error("{context}: {source}")]
    LocalIo {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("error selecting file: {0}")]
    Picker(String),

    /// The credential file exists but is not valid `KEY=value` syntax.
    #[error("error reading credential file: {0}")]
    Credentials(String),

    #[error("auth token is missing, access or create a site first")]
    MissingToken,

    #[error("file uploaded but error refreshing list: {0}")]
    RefreshAfterUpload(#[source] Box<CommandError>),

    #[error("command aborted unexpectedly: {0}")]
    Crashed(String),
}

impl CommandError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        CommandError::LocalIo {
            context: context.into(),
            source,
        }
    }

    /// Wrap a transport error, keeping its whole source chain in the text.
    /// reqwest's own Display omits the inner cause (refused, timed out...).
    pub fn connection(err: &(dyn StdError + 'static)) -> Self {
        CommandError::Connection(describe_chain(err))
    }
}

/// Joins an error and all of its sources with ": ".
pub fn describe_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        current = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_message_only() {
        let err = CommandError::Server {
            status: 401,
            message: "bad password".into(),
        };
        assert_eq!(err.to_string(), "bad password");
    }

    #[test]
    fn refresh_failure_mentions_successful_upload() {
        let inner = CommandError::Connection("connection refused".into());
        let err = CommandError::RefreshAfterUpload(Box::new(inner));
        assert_eq!(
            err.to_string(),
            "file uploaded but error refreshing list: error connecting to server: connection refused"
        );
    }

    #[test]
    fn chain_includes_nested_causes() {
        let inner = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let outer = CommandError::io("error saving file", inner);
        assert_eq!(describe_chain(&outer), "error saving file: refused");
    }
}
