//! Screen between rounds.

use ratatui::prelude::*;

use super::render::{centered_card, hint};

pub fn render(frame: &mut Frame, area: Rect, username: Option<&str>) {
    let greeting = match username {
        Some(username) => Line::from(vec![
            Span::raw("Welcome, "),
            Span::styled(username, Style::default().fg(Color::Green).bold()),
            Span::raw("!"),
        ]),
        None => Line::from(""),
    };

    centered_card(
        frame,
        area,
        vec![
            greeting,
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for the next round...",
                Style::default().fg(Color::Yellow),
            )),
            Line::from(""),
            hint("[Q] to quit"),
        ],
    );
}
