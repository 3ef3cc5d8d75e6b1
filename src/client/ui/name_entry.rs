//! Username prompt shown after the coordinator acknowledged the connection.

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::client::state::ClientApp;
use crate::protocol::USERNAME_MAX_LENGTH;

use super::render::{centered_card, hint};

pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp, input: &str, error: Option<&str>) {
    let [card, field, footer] = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let connected = Span::styled(
        format!("Connected to {}", app.server_addr()),
        Style::default().fg(Color::Green),
    );
    centered_card(frame, card, vec![Line::from(connected)]);

    let [_, field, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(USERNAME_MAX_LENGTH as u16 + 4),
        Constraint::Fill(1),
    ])
    .areas(field);
    let typed = Line::from(vec![
        Span::styled(input, Style::default().fg(Color::Yellow)),
        Span::styled("_", Style::default().fg(Color::Yellow).slow_blink()),
    ]);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(" Your name ");
    frame.render_widget(Paragraph::new(typed).block(block), field);

    let status = match error {
        Some(err) => Line::from(Span::styled(err, Style::default().fg(Color::Red))),
        None => Line::from(""),
    };
    let lines = vec![status, Line::from(""), hint("[Enter] to join  ·  [Esc] to quit")];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), footer);
}
