//! WebSocket client implementation.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::error::ClientError;
use crate::models::Question;
use crate::protocol::{ClientMessage, ServerMessage, validate_username};
use crate::round::{RoundController, RoundPhase, Submission};
use crate::terminal;

use super::ClientConfig;
use super::judge::SocketJudge;
use super::state::{ClientApp, Screen};
use super::ui;

type Controller = RoundController<ClientApp>;

/// What the receive task forwards to the event loop.
enum Inbound {
    Message(ServerMessage),
    Closed(String),
}

/// Run the quiz client.
pub async fn run(config: ClientConfig) -> Result<(), ClientError> {
    let url = format!("ws://{}:{}", config.host, config.port);
    info!("Connecting to {url}");

    let (ws_stream, _) = tokio_tungstenite::connect_async(&url).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();

    // Spawn task to send messages
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to encode {msg:?}: {e}");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let judge = Arc::new(SocketJudge::new(tx.clone()));

    // Spawn task to receive messages. Verdicts go straight to the judge so a
    // pending submission resolves without waiting on the event loop.
    let (inbound_tx, mut inbound_rx) = mpsc::unbounded_channel::<Inbound>();
    let recv_judge = Arc::clone(&judge);
    let recv_task = tokio::spawn(async move {
        let reason = loop {
            let text = match ws_receiver.next().await {
                Some(Ok(Message::Text(text))) => text.to_string(),
                Some(Ok(Message::Close(_))) | None => break "Connection closed by server".to_string(),
                Some(Err(e)) => break format!("Connection error: {e}"),
                Some(Ok(_)) => continue,
            };

            let server_msg: ServerMessage = match serde_json::from_str(&text) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Ignoring unreadable server message: {e}");
                    continue;
                }
            };

            match server_msg {
                ServerMessage::Verdict { request_id, judgment } => {
                    recv_judge.resolve(request_id, judgment).await;
                }
                ServerMessage::AnswerRejected { request_id, reason } => {
                    recv_judge.reject(request_id, reason).await;
                }
                other => {
                    if inbound_tx.send(Inbound::Message(other)).is_err() {
                        return;
                    }
                }
            }
        };
        recv_judge.fail_all().await;
        let _ = inbound_tx.send(Inbound::Closed(reason));
    });

    let (mut controller, mut round_rx) =
        RoundController::new(ClientApp::new(config.host.clone(), config.port), config.round.clone());
    controller.connect_judge(judge);

    let mut keys = spawn_key_reader();
    let mut terminal = terminal::init()?;

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::render(frame, controller.renderer())) {
            break Err(e.into());
        }

        tokio::select! {
            Some(event) = round_rx.recv() => {
                if let Err(e) = controller.handle_event(event) {
                    error!("Round event failed: {e}");
                }
            }
            Some(inbound) = inbound_rx.recv() => match inbound {
                Inbound::Message(msg) => handle_server_message(&mut controller, &tx, &config, msg),
                Inbound::Closed(reason) => {
                    info!("{reason}");
                    disconnect(&mut controller, reason);
                }
            },
            key = keys.recv() => match key {
                Some(key) => {
                    if handle_input(&mut controller, &tx, key) {
                        break Ok(());
                    }
                }
                None => break Ok(()),
            },
        }
    };

    terminal::restore()?;
    recv_task.abort();
    result
}

/// Handle a message from the server.
fn handle_server_message(
    controller: &mut Controller,
    tx: &mpsc::UnboundedSender<ClientMessage>,
    config: &ClientConfig,
    msg: ServerMessage,
) {
    debug!("Server message: {msg:?}");

    match msg {
        ServerMessage::ConnectionAck => match &config.username {
            Some(username) => {
                let _ = tx.send(ClientMessage::Join {
                    username: username.clone(),
                });
            }
            None => controller.renderer_mut().enter_name_entry(),
        },
        ServerMessage::JoinAccepted { username } => {
            info!("Joined as {username}");
            controller.renderer_mut().join_accepted(username);
        }
        ServerMessage::JoinRejected { reason } => {
            warn!("Join rejected: {reason}");
            if !matches!(controller.renderer().screen, Screen::NameEntry { .. }) {
                controller.renderer_mut().enter_name_entry();
            }
            controller.renderer_mut().set_name_error(reason);
        }
        ServerMessage::WaitingForNextRound => controller.show_waiting(),
        ServerMessage::Question { question } => match Question::try_from(question) {
            Ok(question) => controller.present_question(question),
            Err(e) => error!("Cannot present question: {e}"),
        },
        ServerMessage::Stats { question, judgment } => {
            if let Err(e) = controller.present_round_stats(question, &judgment) {
                error!("Cannot present stats: {e}");
            }
        }
        ServerMessage::Scoreboard { scores } => controller.present_scoreboard(&scores),
        ServerMessage::ServerClosing => {
            disconnect(controller, "Server is shutting down".to_string());
        }
        ServerMessage::Verdict { .. } | ServerMessage::AnswerRejected { .. } => {
            debug!("Verdict reached the event loop, already handled by the judge");
        }
    }
}

/// Stop the round before showing why the session ended, so no pending
/// transition draws over the message.
fn disconnect(controller: &mut Controller, message: String) {
    controller.halt();
    controller.renderer_mut().disconnect(message);
}

/// Read terminal keys on a blocking thread.
fn spawn_key_reader() -> mpsc::UnboundedReceiver<KeyCode> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(50)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    error!("Failed to poll terminal events: {e}");
                    break;
                }
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(key.code).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read terminal event: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Which part of the screen receives keys.
enum Focus {
    NameEntry { empty: bool },
    TextAnswer,
    Choice,
    Disconnected,
    Idle,
}

fn focus(app: &ClientApp) -> Focus {
    match &app.screen {
        Screen::NameEntry { input, .. } => Focus::NameEntry {
            empty: input.is_empty(),
        },
        Screen::Playing(view) if view.takes_text() => Focus::TextAnswer,
        Screen::Playing(_) => Focus::Choice,
        Screen::Disconnected { .. } => Focus::Disconnected,
        Screen::Connecting | Screen::Waiting | Screen::Stats { .. } | Screen::Scoreboard { .. } => {
            Focus::Idle
        }
    }
}

/// Handle keyboard input. Returns true when the client should quit.
fn handle_input(
    controller: &mut Controller,
    tx: &mpsc::UnboundedSender<ClientMessage>,
    key: KeyCode,
) -> bool {
    if key == KeyCode::Esc {
        return true;
    }
    let quit_key = matches!(key, KeyCode::Char('q') | KeyCode::Char('Q'));

    match focus(controller.renderer()) {
        Focus::NameEntry { empty } => match key {
            KeyCode::Char(_) if quit_key && empty => return true,
            KeyCode::Char(c) => controller.renderer_mut().input_push(c),
            KeyCode::Backspace => controller.renderer_mut().input_pop(),
            KeyCode::Enter => {
                let app = controller.renderer_mut();
                let username = app.name_input().trim().to_string();
                match validate_username(&username) {
                    Ok(()) => {
                        let _ = tx.send(ClientMessage::Join { username });
                    }
                    Err(reason) => app.set_name_error(reason.to_string()),
                }
            }
            _ => {}
        },
        Focus::TextAnswer => match key {
            KeyCode::Char(c) => controller.renderer_mut().input_push(c),
            KeyCode::Backspace => controller.renderer_mut().input_pop(),
            KeyCode::Enter => submit(controller),
            _ => {}
        },
        Focus::Choice => match key {
            KeyCode::Up | KeyCode::Char('k') => controller.renderer_mut().select_previous_option(),
            KeyCode::Down | KeyCode::Char('j') => controller.renderer_mut().select_next_option(),
            KeyCode::Enter | KeyCode::Char(' ') => submit(controller),
            _ => return quit_key,
        },
        Focus::Disconnected => return quit_key || key == KeyCode::Enter,
        Focus::Idle => return quit_key,
    }

    false
}

fn submit(controller: &mut Controller) {
    if controller.phase() != RoundPhase::Playing {
        return;
    }
    let Some(answer) = controller.renderer().play_view().map(|view| view.answer()) else {
        return;
    };
    let answer = match answer {
        Ok(answer) => answer,
        Err(reason) => {
            controller.renderer_mut().set_input_error(reason);
            return;
        }
    };

    match controller.submit_answer(answer) {
        Ok(Submission::Sent) => debug!("Answer sent"),
        Ok(Submission::Ignored) => {}
        Err(e) => {
            warn!("Answer not submitted: {e}");
            controller.renderer_mut().set_input_error(e.to_string());
        }
    }
}
