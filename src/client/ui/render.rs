//! Screen dispatch and the small status screens.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::client::state::{ClientApp, Screen};

use super::{name_entry, play, scoreboard, stats, waiting};

const TITLE: &str = "TRIVIA";

/// Draw whatever screen the client is on.
pub fn render(frame: &mut Frame, app: &ClientApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match &app.screen {
        Screen::Connecting => render_connecting(frame, area, app),
        Screen::NameEntry { input, error } => {
            name_entry::render(frame, area, app, input, error.as_deref())
        }
        Screen::Waiting => waiting::render(frame, area, app.username.as_deref()),
        Screen::Playing(view) => play::render(frame, area, view),
        Screen::Stats { prompt, view } => stats::render(frame, area, prompt, view),
        Screen::Scoreboard { standings } => {
            scoreboard::render(frame, area, standings, app.username.as_deref())
        }
        Screen::Disconnected { message } => render_disconnected(frame, area, message),
    }
}

/// Title line shared by the centered screens.
pub(super) fn title() -> Line<'static> {
    Line::from(Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()))
}

pub(super) fn hint(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// Draw `lines` centered in a band of the screen, title first.
pub(super) fn centered_card(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    let height = lines.len() as u16 + 3;
    let [_, band, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);

    let mut content = Vec::with_capacity(lines.len() + 3);
    content.push(Line::from(""));
    content.push(title());
    content.push(Line::from(""));
    content.extend(lines);

    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), band);
}

fn render_connecting(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let status = Span::styled(
        format!("Connecting to {}...", app.server_addr()),
        Style::default().fg(Color::Yellow),
    );
    centered_card(frame, area, vec![Line::from(status)]);
}

fn render_disconnected(frame: &mut Frame, area: Rect, message: &str) {
    centered_card(
        frame,
        area,
        vec![
            Line::from(Span::styled(message, Style::default().fg(Color::Red).bold())),
            Line::from(""),
            hint("[Enter] or [Q] to exit"),
        ],
    );
}
