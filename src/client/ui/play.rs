//! Play screen: the current question and the participant's answer.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap};

use crate::client::state::{AnswerMark, PlayView};
use crate::models::{CHOICE_LETTERS, QuestionType, Solution};
use crate::round::Urgency;

/// Render the play screen.
pub fn render(frame: &mut Frame, area: Rect, view: &PlayView) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Countdown
        Constraint::Length(7), // Prompt
        Constraint::Min(6),    // Options or input
        Constraint::Length(2), // Status
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_countdown(frame, chunks[0], view);
    render_prompt(frame, chunks[1], &view.prompt);

    match &view.options {
        Some(options) => render_options(frame, chunks[2], options, view),
        None => render_input(frame, chunks[2], view),
    }

    render_status(frame, chunks[3], view);
    render_controls(frame, chunks[4], view);
}

fn mark_color(mark: AnswerMark) -> Color {
    match mark {
        AnswerMark::Open => Color::Cyan,
        AnswerMark::Pending => Color::Yellow,
        AnswerMark::Correct => Color::Green,
        AnswerMark::Wrong => Color::Red,
    }
}

fn render_countdown(frame: &mut Frame, area: Rect, view: &PlayView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(mark_color(view.mark)));

    let Some(countdown) = view.countdown else {
        frame.render_widget(block, area);
        return;
    };

    let color = match countdown.urgency {
        Urgency::Normal => Color::Green,
        Urgency::Warning => Color::Yellow,
        Urgency::Critical => Color::Red,
    };
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color))
        .ratio((countdown.width_percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{}s", countdown.remaining_secs));

    frame.render_widget(gauge, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &str) {
    let widget = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, options: &[String; 4], view: &PlayView) {
    let solution = match view.solution {
        Some(Solution::Choice(idx)) => Some(idx),
        _ => None,
    };

    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let is_selected = view.mark == AnswerMark::Open && i == view.selected;
            let is_picked = view.picked == Some(i);
            let prefix = if is_selected || is_picked { "> " } else { "  " };

            let style = match (solution, is_picked) {
                (Some(correct), _) if correct == i => Style::default().fg(Color::Green).bold(),
                (Some(_), true) => Style::default().fg(Color::Red).bold(),
                (None, true) => Style::default().fg(Color::Yellow).bold(),
                _ if is_selected => Style::default().fg(Color::Yellow).bold(),
                _ if view.picked.is_some() => Style::default().fg(Color::DarkGray),
                _ => Style::default().fg(Color::White),
            };

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}) ", CHOICE_LETTERS[i]), style),
                Span::styled(opt.as_str(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_input(frame: &mut Frame, area: Rect, view: &PlayView) {
    let title = match view.question_type {
        QuestionType::Estimate => " Your estimate ",
        _ => " Your answer ",
    };
    let color = mark_color(view.mark);
    let cursor = if view.takes_text() { "_" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled(view.input.as_str(), Style::default().fg(color).bold()),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])];
    if let Some(error) = &view.input_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, view: &PlayView) {
    let mut spans = match view.mark {
        AnswerMark::Open => vec![],
        AnswerMark::Pending => vec![Span::styled(
            "Answer sent, waiting for the verdict...",
            Style::default().fg(Color::Yellow),
        )],
        AnswerMark::Correct => vec![Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        )],
        AnswerMark::Wrong => vec![Span::styled(
            "Wrong.",
            Style::default().fg(Color::Red).bold(),
        )],
    };
    if let Some(solution) = &view.solution {
        spans.push(Span::styled(
            format!("  Answer: {solution}"),
            Style::default().fg(Color::White),
        ));
    }
    if view.close_enough == Some(true) && view.mark == AnswerMark::Wrong {
        spans.push(Span::styled(
            "  (close enough)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, view: &PlayView) {
    let text = match (view.question_type, view.mark) {
        (_, mark) if mark != AnswerMark::Open => "Esc quit",
        (QuestionType::Choice, _) => "j/k or arrows to select  ·  Enter/Space to submit  ·  q quit",
        _ => "type your answer  ·  Enter to submit  ·  Esc quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
