//! Interactive terminal client.
//!
//! `rustyline` runs on its own thread and forwards lines and keystrokes to
//! the async loop, which also drains server events from the session.

use agora_server::infrastructure::dto::{MessageDto, websocket::ServerEvent};
use rustyline::{
    Cmd, ConditionalEventHandler, DefaultEditor, Event, EventContext, EventHandler, KeyCode,
    KeyEvent, RepeatCount, error::ReadlineError,
};
use tokio::sync::mpsc;

use crate::{
    command::Command, config::ClientConfig, error::ClientError, history::fetch_history,
    session::ChatSession, typing::TypingDebouncer,
};

enum Input {
    Line(String),
    Keystroke,
    Eof,
    Failed(ReadlineError),
}

/// Reports editing keys without altering rustyline's own handling
struct KeystrokeHook {
    input: mpsc::UnboundedSender<Input>,
}

impl ConditionalEventHandler for KeystrokeHook {
    fn handle(&self, evt: &Event, _: RepeatCount, _: bool, _: &EventContext) -> Option<Cmd> {
        if let Some(KeyEvent(KeyCode::Char(_) | KeyCode::Backspace, _)) = evt.get(0) {
            let _ = self.input.send(Input::Keystroke);
        }
        None
    }
}

/// Author shown for messages this client sent
const LOCAL_AUTHOR: &str = "You";

/// The room the prompt is currently in
struct ActiveRoom {
    name: String,
    typing: TypingDebouncer,
}

/// Connect, optionally join `config.room`, and run the prompt until `/quit`,
/// end of input or disconnect
pub async fn run(config: ClientConfig) -> Result<(), ClientError> {
    let mut session = ChatSession::connect(&config.server).await?;
    let http = reqwest::Client::new();

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Input>();
    // Detached: a blocked readline must not keep the runtime alive on exit
    std::thread::spawn(move || read_lines(input_tx));

    println!("Connected to {}. Commands: /join <room>, /leave, /quit", config.server);

    let mut current: Option<ActiveRoom> = None;
    if let Some(room) = &config.room {
        current = Some(enter_room(&session, &http, &config.server, room).await?);
    }

    loop {
        tokio::select! {
            input = input_rx.recv() => match input {
                Some(Input::Keystroke) => {
                    if let Some(active) = &current {
                        active.typing.keystroke();
                    }
                }
                Some(Input::Line(line)) => match Command::parse(&line) {
                    Command::Join(room) => {
                        if let Some(previous) = current.take() {
                            previous.typing.stop();
                        }
                        current = Some(enter_room(&session, &http, &config.server, &room).await?);
                    }
                    Command::Leave => {
                        if let Some(previous) = current.take() {
                            previous.typing.stop();
                            session.leave_room()?;
                            println!("Left room {}", previous.name);
                        }
                    }
                    Command::Quit => break,
                    Command::Message(text) => match &current {
                        Some(active) => {
                            active.typing.stop();
                            let time =
                                session.send_message(&active.name, config.author.as_deref(), &text)?;
                            print_message(&local_echo(text, time));
                        }
                        None => println!("Join a room first with /join <room>"),
                    },
                    Command::Invalid(reason) => println!("{reason}"),
                    Command::Empty => {}
                },
                Some(Input::Failed(e)) => {
                    session.close().await;
                    return Err(e.into());
                }
                Some(Input::Eof) | None => break,
            },
            event = session.next_event() => match event {
                Some(event) => print_event(&event),
                None => {
                    println!("Disconnected from server");
                    break;
                }
            },
        }
    }

    if let Some(active) = current.take() {
        active.typing.stop();
    }
    session.close().await;
    Ok(())
}

async fn enter_room(
    session: &ChatSession,
    http: &reqwest::Client,
    server: &str,
    room: &str,
) -> Result<ActiveRoom, ClientError> {
    session.join_room(room)?;
    println!("Joined room {room}");
    for message in fetch_history(http, server, room).await {
        print_message(&message);
    }

    let handle = session.handle();
    let name = room.to_string();
    let typing = TypingDebouncer::new(move |active| {
        if let Err(e) = handle.typing(&name, active) {
            tracing::warn!("Failed to send typing state: {}", e);
        }
    });
    Ok(ActiveRoom {
        name: room.to_string(),
        typing,
    })
}

fn read_lines(input: mpsc::UnboundedSender<Input>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = input.send(Input::Failed(e));
            return;
        }
    };
    editor.bind_sequence(
        Event::Any,
        EventHandler::Conditional(Box::new(KeystrokeHook {
            input: input.clone(),
        })),
    );

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if input.send(Input::Line(line)).is_err() {
                    return;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                let _ = input.send(Input::Failed(e));
                return;
            }
        }
    }
    let _ = input.send(Input::Eof);
}

fn print_event(event: &ServerEvent) {
    match event {
        ServerEvent::ReceiveMessage(message) => print_message(message),
        ServerEvent::DisplayTyping(true) => println!("  (someone is typing...)"),
        ServerEvent::DisplayTyping(false) => {}
        ServerEvent::Error(error) => println!("! {:?}: {}", error.kind, error.message),
    }
}

fn local_echo(text: String, time: String) -> MessageDto {
    MessageDto {
        author: LOCAL_AUTHOR.to_string(),
        message: text,
        time,
    }
}

fn print_message(message: &MessageDto) {
    println!("{}", format_message(message));
}

fn format_message(message: &MessageDto) -> String {
    format!("[{}] {}: {}", message.time, message.author, message.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_message_is_echoed_as_you() {
        // テスト項目: 自分の送信メッセージは "You" と送信時刻で表示される
        // given (前提条件):
        let text = "hello".to_string();

        // when (操作):
        let echo = local_echo(text, "10:00:00".to_string());

        // then (期待する結果):
        assert_eq!(format_message(&echo), "[10:00:00] You: hello");
    }

    #[test]
    fn test_received_message_shows_its_author() {
        // テスト項目: 受信メッセージは送信者名で表示される
        let message = MessageDto {
            author: "A".to_string(),
            message: "hi".to_string(),
            time: "10:00".to_string(),
        };
        assert_eq!(format_message(&message), "[10:00] A: hi");
    }
}
