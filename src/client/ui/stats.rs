//! Round statistics screen.

use ratatui::prelude::*;
use ratatui::widgets::{BarChart, Block, Borders, Padding, Paragraph, Wrap};

use crate::models::CHOICE_LETTERS;
use crate::round::stats::{ChoiceStats, EstimateStats, OpenStats, StatsView};

const ANSWER_PREVIEW_LENGTH: usize = 12;

/// Render the stats screen.
pub fn render(frame: &mut Frame, area: Rect, prompt: &str, view: &StatsView) {
    let chunks = Layout::vertical([
        Constraint::Length(4), // Prompt
        Constraint::Length(3), // Verdict
        Constraint::Min(8),    // Type-specific body
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    let prompt_widget = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(prompt_widget, chunks[0]);

    let close_enough = match view {
        StatsView::Choice(stats) => stats.picked_correct,
        StatsView::Estimate(stats) => stats.close_enough,
        StatsView::Open(stats) => stats.close_enough,
    };
    render_verdict(frame, chunks[1], close_enough);

    match view {
        StatsView::Choice(stats) => render_choice(frame, chunks[2], stats),
        StatsView::Estimate(stats) => render_estimate(frame, chunks[2], stats),
        StatsView::Open(stats) => render_open(frame, chunks[2], stats),
    }

    let controls = Paragraph::new("q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}

fn render_verdict(frame: &mut Frame, area: Rect, correct: bool) {
    let line = if correct {
        Line::from(Span::styled("You got it!", Style::default().fg(Color::Green).bold()))
    } else {
        Line::from(Span::styled("Not this time.", Style::default().fg(Color::Red).bold()))
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1))
}

fn render_choice(frame: &mut Frame, area: Rect, stats: &ChoiceStats) {
    let chunks = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area);

    let lines: Vec<Line> = stats
        .options
        .iter()
        .zip(stats.counts)
        .enumerate()
        .map(|(i, (option, count))| {
            let style = if i == stats.solution {
                Style::default().fg(Color::Green).bold()
            } else {
                Style::default().fg(Color::Red)
            };
            Line::from(vec![
                Span::styled(format!("{}) ", CHOICE_LETTERS[i]), style),
                Span::styled(format!("{option}  "), style),
                Span::styled(format!("{count}"), Style::default().fg(Color::White)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(titled_block(" Answers ")), chunks[0]);

    let labels: Vec<String> = CHOICE_LETTERS.iter().map(char::to_string).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(stats.counts)
        .map(|(label, count)| (label.as_str(), u64::from(count)))
        .collect();
    render_bars(frame, chunks[1], " Distribution ", &data);
}

fn render_estimate(frame: &mut Frame, area: Rect, stats: &EstimateStats) {
    let value = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v}"));

    let row = |label: &'static str, text: String| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().fg(Color::DarkGray)),
            Span::styled(text, Style::default().fg(Color::White).bold()),
        ])
    };

    let lines = vec![
        row("Answer", format!("{}", stats.exact)),
        Line::from(""),
        row("Average", value(stats.avg)),
        row("Lowest", value(stats.min)),
        row("Highest", value(stats.max)),
        Line::from(""),
        row("Correct", stats.correct.to_string()),
    ];
    frame.render_widget(Paragraph::new(lines).block(titled_block(" Estimates ")), area);
}

fn render_open(frame: &mut Frame, area: Rect, stats: &OpenStats) {
    let chunks = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(stats.solution.as_str(), Style::default().fg(Color::Green).bold()),
        ]),
        Line::from(""),
    ];
    lines.extend(stats.rows.iter().map(|row| {
        let color = if row.close_enough { Color::Green } else { Color::Red };
        Line::from(vec![
            Span::styled(format!("{:>3}  ", row.count), Style::default().fg(Color::White)),
            Span::styled(row.answer.as_str(), Style::default().fg(color)),
        ])
    }));
    frame.render_widget(Paragraph::new(lines).block(titled_block(" Answers ")), chunks[0]);

    let labels: Vec<String> = stats.rows.iter().map(|row| truncate(&row.answer)).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&stats.rows)
        .map(|(label, row)| (label.as_str(), u64::from(row.count)))
        .collect();
    render_bars(frame, chunks[1], " Distribution ", &data);
}

pub(super) fn render_bars(frame: &mut Frame, area: Rect, title: &str, data: &[(&str, u64)]) {
    let chart = BarChart::default()
        .block(titled_block(title))
        .data(data)
        .bar_width(ANSWER_PREVIEW_LENGTH as u16)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        .label_style(Style::default().fg(Color::White));

    frame.render_widget(chart, area);
}

fn truncate(text: &str) -> String {
    if text.chars().count() > ANSWER_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(ANSWER_PREVIEW_LENGTH - 1).collect();
        format!("{truncated}…")
    } else {
        text.to_string()
    }
}
