//! Scoreboard screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use super::stats::render_bars;

const SCOREBOARD_ROWS: usize = 10;

/// Render the scoreboard.
pub fn render(frame: &mut Frame, area: Rect, standings: &[(String, u64)], username: Option<&str>) {
    let chunks = Layout::vertical([
        Constraint::Length(3),  // Title
        Constraint::Min(8),     // Chart
        Constraint::Length(12), // Ranking
        Constraint::Length(2),  // Controls
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "SCOREBOARD",
        Style::default().fg(Color::Cyan).bold(),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let data: Vec<(&str, u64)> = standings
        .iter()
        .take(SCOREBOARD_ROWS)
        .map(|(name, score)| (name.as_str(), *score))
        .collect();
    render_bars(frame, chunks[1], " Points ", &data);

    let lines: Vec<Line> = standings
        .iter()
        .take(SCOREBOARD_ROWS)
        .enumerate()
        .map(|(i, (name, score))| {
            let rank = i + 1;
            let rank_style = match rank {
                1 => Style::default().fg(Color::Yellow).bold(),
                2 => Style::default().fg(Color::White),
                3 => Style::default().fg(Color::LightRed),
                _ => Style::default().fg(Color::DarkGray),
            };
            let is_you = username == Some(name.as_str());
            let name_style = if is_you {
                Style::default().fg(Color::Green).bold()
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(format!("  {rank}. "), rank_style),
                Span::styled(format!("{name:<16}"), name_style),
                Span::styled(format!("{score}"), Style::default().fg(Color::DarkGray)),
                Span::styled(if is_you { " <- You" } else { "" }, Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let ranking = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Ranking ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(ranking, chunks[2]);

    let controls = Paragraph::new("q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}
