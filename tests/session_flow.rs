// End-to-end flows: keys through the transition function, commands through
// the executor and the real API client, completions back into the session.

mod common;

use std::fs;
use std::sync::{mpsc, Arc};
use std::path::PathBuf;

use fileshare_cli::api::ApiClient;
use fileshare_cli::command::Completion;
use fileshare_cli::credentials::CredentialStore;
use fileshare_cli::error::CommandError;
use fileshare_cli::executor::{Executor, FilePicker};
use fileshare_cli::state::{Screen, Session, StatusMessage};
use fileshare_cli::transition::{update, Effect, Event, Key};

use common::{config_for, serve_once};

struct NoPicker;

impl FilePicker for NoPicker {
    fn pick(&self) -> Result<Option<PathBuf>, CommandError> {
        Ok(None)
    }
}

fn executor_for(base: &str, dir: &std::path::Path) -> Executor {
    let api = ApiClient::new(&config_for(base)).unwrap();
    Executor::new(
        Arc::new(api),
        Arc::new(NoPicker),
        CredentialStore::new(dir.join(".env")),
        dir.join("downloads"),
    )
}

fn press(session: &mut Session, key: Key) -> Effect {
    update(session, Event::Key(key))
}

fn type_text(session: &mut Session, text: &str) {
    for c in text.chars() {
        press(session, Key::Char(c));
    }
}

#[test]
fn creating_a_site_stores_the_token() {
    let dir = tempfile::tempdir().unwrap();
    let (base, server) = serve_once("201 Created", r#"{"message":"ok","auth_token":"tok-1"}"#);
    let executor = executor_for(&base, dir.path());

    let mut session = Session::new();
    press(&mut session, Key::Down);
    press(&mut session, Key::Enter);
    type_text(&mut session, "myblog");
    press(&mut session, Key::Enter);
    type_text(&mut session, "secret123");
    let command = match press(&mut session, Key::Enter) {
        Effect::Dispatch(command) => command,
        other => panic!("expected a command, got {other:?}"),
    };

    let completion = executor.run(command);
    update(&mut session, Event::Completed(completion));
    server.join().unwrap();

    assert_eq!(session.screen, Screen::MainMenu);
    assert!(matches!(session.status, Some(StatusMessage::Success(_))));
    assert_eq!(
        CredentialStore::new(dir.path().join(".env")).load().unwrap().as_deref(),
        Some("tok-1")
    );
}

#[test]
fn wrong_password_returns_to_menu_with_server_message() {
    let dir = tempfile::tempdir().unwrap();
    let (base, server) = serve_once("401 Unauthorized", "bad password");
    let executor = executor_for(&base, dir.path());

    let mut session = Session::new();
    press(&mut session, Key::Enter);
    type_text(&mut session, "myblog");
    press(&mut session, Key::Enter);
    type_text(&mut session, "guess");
    let command = match press(&mut session, Key::Enter) {
        Effect::Dispatch(command) => command,
        other => panic!("expected a command, got {other:?}"),
    };
    assert_eq!(session.screen, Screen::EnterPasswordForAccess);

    update(&mut session, Event::Completed(executor.run(command)));
    server.join().unwrap();

    assert_eq!(session.screen, Screen::MainMenu);
    assert_eq!(
        session.status,
        Some(StatusMessage::Failure("bad password".into()))
    );
    assert!(session.files.is_empty());
    assert!(!dir.path().join(".env").exists());
}

#[test]
fn dispatched_download_lands_on_menu_and_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let (base, server) = serve_once("200 OK", r#"{"message":"ok","file":"contents"}"#);
    let executor = executor_for(&base, dir.path());

    let mut session = Session::new();
    session.screen = Screen::FileList;
    session.auth_token = "tok-1".into();
    session.set_files(vec![fileshare_cli::state::FileEntry {
        id: 5,
        name: "notes.txt".into(),
    }]);

    let command = match press(&mut session, Key::Enter) {
        Effect::Dispatch(command) => command,
        other => panic!("expected a command, got {other:?}"),
    };
    let (tx, rx) = mpsc::channel();
    executor.dispatch(command, tx).join().unwrap();
    let event = rx.recv().unwrap();
    assert!(matches!(
        &event,
        Event::Completed(Completion::FileDownloaded(Ok(_)))
    ));
    update(&mut session, event);
    server.join().unwrap();

    assert_eq!(session.screen, Screen::MainMenu);
    assert_eq!(
        fs::read_to_string(dir.path().join("downloads").join("notes.txt")).unwrap(),
        "contents"
    );
}
