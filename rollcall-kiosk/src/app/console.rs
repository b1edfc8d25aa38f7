//! Line-oriented console front end
//!
//! Reads commands from stdin, turns them into [`SessionMessage`]s and prints
//! the session as it changes. Backend operations run as background tasks so
//! the prompt stays responsive while a request is in flight.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use crate::domains::session::{Mode, SessionController, SessionMessage, UpdateOutcome, update};
use crate::view;

pub const HELP: &str = "\
Commands:
  go <home|register|scan|log>   switch screen
  name <text>                   set the registration name
  roll <text>                   set the registration roll number
  image <path>                  use a picture file for registration
  clear-image                   remove the registration picture
  capture                       take a photo from the camera (Scan screen)
  register                      submit the registration form
  scan                          submit the captured photo
  train                         retrain the recognizer
  fetch-log                     download the attendance log
  dismiss                       clear the current message
  show                          print the current screen
  help                          print this text
  quit                          release the camera and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message(SessionMessage),
    Show,
    Help,
    Quit,
    Nothing,
}

fn parse_mode(word: &str) -> Option<Mode> {
    match word.to_ascii_lowercase().as_str() {
        "home" => Some(Mode::Home),
        "register" => Some(Mode::Register),
        "scan" => Some(Mode::Scan),
        "log" => Some(Mode::Log),
        _ => None,
    }
}

/// Parse one input line. Arguments keep their inner whitespace.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let message = match word.to_ascii_lowercase().as_str() {
        "go" => match parse_mode(rest) {
            Some(mode) => SessionMessage::Navigate(mode),
            None => return Err(format!("unknown screen '{rest}'")),
        },
        "name" => SessionMessage::UpdateName(rest.to_string()),
        "roll" => SessionMessage::UpdateRollNo(rest.to_string()),
        "image" if rest.is_empty() => return Err("image needs a path".to_string()),
        "image" => SessionMessage::PickImage(PathBuf::from(rest)),
        "clear-image" => SessionMessage::ClearImage,
        "capture" => SessionMessage::Capture,
        "register" => SessionMessage::Register,
        "scan" => SessionMessage::Scan,
        "train" => SessionMessage::Train,
        "fetch-log" => SessionMessage::FetchLog,
        "dismiss" => SessionMessage::DismissNotification,
        "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Command::Message(message))
}

/// Print a status line every time the visible state changes.
fn spawn_renderer(controller: &SessionController) -> tokio::task::JoinHandle<()> {
    let mut receiver = controller.subscribe();
    tokio::spawn(async move {
        let mut last = String::new();
        while receiver.changed().await.is_ok() {
            let snapshot = receiver.borrow_and_update().clone();
            let line = view::status_line(&snapshot);
            if line != last {
                println!("{line}");
                last = line;
            }
        }
    })
}

fn log_outcome(name: &str, outcome: &UpdateOutcome) {
    if outcome.is_failure() {
        log::debug!("[Console] {} finished with {:?}", name, outcome);
    } else {
        log::trace!("[Console] {} finished with {:?}", name, outcome);
    }
}

/// Run until `quit` or end of input, then stop the controller.
pub async fn run(controller: SessionController) -> anyhow::Result<()> {
    let renderer = spawn_renderer(&controller);
    let mut operations = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", view::render(&controller.snapshot()));
    println!("{HELP}");

    while let Some(line) = lines.next_line().await? {
        let message = match parse_command(&line) {
            Ok(Command::Message(message)) => message,
            Ok(Command::Show) => {
                println!("{}", view::render(&controller.snapshot()));
                continue;
            }
            Ok(Command::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Command::Quit) => break,
            Ok(Command::Nothing) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        let name = message.name();
        if message.is_backend_operation() {
            let controller = controller.clone();
            operations.spawn(async move {
                let outcome = update(&controller, message).await;
                log_outcome(name, &outcome);
            });
        } else {
            let navigating = matches!(message, SessionMessage::Navigate(_));
            let outcome = update(&controller, message).await;
            log_outcome(name, &outcome);
            if navigating {
                println!("{}", view::render(&controller.snapshot()));
            }
        }

        while let Some(joined) = operations.try_join_next() {
            if let Err(err) = joined {
                log::error!("[Console] Operation task failed: {}", err);
            }
        }
    }

    if !operations.is_empty() {
        log::info!("[Console] Abandoning {} request(s) in flight", operations.len());
        operations.shutdown().await;
    }
    controller.stop().await;
    renderer.abort();
    Ok(())
}
