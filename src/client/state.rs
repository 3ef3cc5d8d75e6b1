//! Client state management.
//!
//! [`ClientApp`] is the terminal view model. It implements [`Renderer`] so the
//! round controller can drive it; the ratatui screens in `ui` only read it.

use crate::models::{
    AnswerPayload, CHOICE_COUNT, Question, QuestionKind, QuestionType, Scores, Solution, standings,
};
use crate::protocol::USERNAME_MAX_LENGTH;
use crate::round::{AnswerVerdict, Countdown, Renderer, StatsView};

/// Where the participant's answer stands on the play screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMark {
    Open,
    Pending,
    Correct,
    Wrong,
}

/// Data for the question being played.
#[derive(Debug, Clone)]
pub struct PlayView {
    pub prompt: String,
    pub question_type: QuestionType,
    pub options: Option<[String; CHOICE_COUNT]>,
    /// Highlighted option for choice questions.
    pub selected: usize,
    /// Text typed for estimate and open questions.
    pub input: String,
    pub input_error: Option<String>,
    pub picked: Option<usize>,
    pub mark: AnswerMark,
    pub solution: Option<Solution>,
    /// Advisory fuzzy match for open answers.
    pub close_enough: Option<bool>,
    pub countdown: Option<Countdown>,
}

impl PlayView {
    fn new(question: &Question) -> Self {
        let options = match question.kind() {
            QuestionKind::Choice { options } => Some(options.clone()),
            QuestionKind::Estimate | QuestionKind::Open => None,
        };
        Self {
            prompt: question.prompt().to_string(),
            question_type: question.question_type(),
            options,
            selected: 0,
            input: String::new(),
            input_error: None,
            picked: None,
            mark: AnswerMark::Open,
            solution: None,
            close_enough: None,
            countdown: None,
        }
    }

    /// Whether keys should go into the text input.
    pub fn takes_text(&self) -> bool {
        self.question_type != QuestionType::Choice && self.mark == AnswerMark::Open
    }

    /// Build the payload for the current selection or input.
    pub fn answer(&self) -> Result<AnswerPayload, String> {
        match self.question_type {
            QuestionType::Choice => Ok(AnswerPayload::Choice { idx: self.selected }),
            QuestionType::Estimate => self
                .input
                .trim()
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(|estimate| AnswerPayload::Estimate { estimate })
                .ok_or_else(|| format!("'{}' is not a number", self.input.trim())),
            QuestionType::Open => Ok(AnswerPayload::Open {
                answer: self.input.trim().to_string(),
            }),
        }
    }
}

/// Current screen of the client.
#[derive(Debug, Clone)]
pub enum Screen {
    /// Connecting to server.
    Connecting,

    /// Entering username.
    NameEntry {
        input: String,
        error: Option<String>,
    },

    /// Waiting for the next question.
    Waiting,

    /// Answering a question.
    Playing(PlayView),

    /// Round statistics.
    Stats { prompt: String, view: StatsView },

    /// Standings, highest score first.
    Scoreboard { standings: Vec<(String, u64)> },

    /// Disconnected from server.
    Disconnected { message: String },
}

/// Client application state.
pub struct ClientApp {
    /// Current screen.
    pub screen: Screen,
    /// Accepted username.
    pub username: Option<String>,
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl ClientApp {
    /// Create a new client app.
    pub fn new(host: String, port: u16) -> Self {
        Self {
            screen: Screen::Connecting,
            username: None,
            host,
            port,
        }
    }

    /// Get the server address string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Move to name entry state.
    pub fn enter_name_entry(&mut self) {
        self.screen = Screen::NameEntry {
            input: String::new(),
            error: None,
        };
    }

    /// Remember the accepted name. The coordinator follows up with the
    /// current round state.
    pub fn join_accepted(&mut self, username: String) {
        self.username = Some(username);
        if matches!(self.screen, Screen::NameEntry { .. } | Screen::Connecting) {
            self.screen = Screen::Waiting;
        }
    }

    /// Move to disconnected state.
    pub fn disconnect(&mut self, message: String) {
        self.screen = Screen::Disconnected { message };
    }

    pub fn play_view(&self) -> Option<&PlayView> {
        match &self.screen {
            Screen::Playing(view) => Some(view),
            _ => None,
        }
    }

    fn play_view_mut(&mut self) -> Option<&mut PlayView> {
        match &mut self.screen {
            Screen::Playing(view) => Some(view),
            _ => None,
        }
    }

    /// Select next option in a choice question.
    pub fn select_next_option(&mut self) {
        if let Some(view) = self.play_view_mut() {
            view.selected = (view.selected + 1) % CHOICE_COUNT;
        }
    }

    /// Select previous option in a choice question.
    pub fn select_previous_option(&mut self) {
        if let Some(view) = self.play_view_mut() {
            view.selected = (view.selected + CHOICE_COUNT - 1) % CHOICE_COUNT;
        }
    }

    /// Add a character to whichever text input is active.
    pub fn input_push(&mut self, c: char) {
        match &mut self.screen {
            Screen::NameEntry { input, error } => {
                *error = None;
                if input.chars().count() < USERNAME_MAX_LENGTH {
                    input.push(c);
                }
            }
            Screen::Playing(view) if view.takes_text() => {
                view.input_error = None;
                view.input.push(c);
            }
            _ => {}
        }
    }

    /// Remove a character from whichever text input is active.
    pub fn input_pop(&mut self) {
        match &mut self.screen {
            Screen::NameEntry { input, error } => {
                *error = None;
                input.pop();
            }
            Screen::Playing(view) if view.takes_text() => {
                view.input_error = None;
                view.input.pop();
            }
            _ => {}
        }
    }

    /// Get name input value.
    pub fn name_input(&self) -> &str {
        if let Screen::NameEntry { input, .. } = &self.screen {
            input
        } else {
            ""
        }
    }

    /// Set name entry error.
    pub fn set_name_error(&mut self, err: String) {
        if let Screen::NameEntry { error, .. } = &mut self.screen {
            *error = Some(err);
        }
    }

    pub fn set_input_error(&mut self, err: String) {
        if let Some(view) = self.play_view_mut() {
            view.input_error = Some(err);
        }
    }
}

impl Renderer for ClientApp {
    fn enter_waiting(&mut self) {
        self.screen = Screen::Waiting;
    }

    fn enter_playing(&mut self, question: &Question) {
        self.screen = Screen::Playing(PlayView::new(question));
    }

    fn decorate_answer_pending(&mut self, answer: &AnswerPayload) {
        if let Some(view) = self.play_view_mut() {
            view.mark = AnswerMark::Pending;
            if let AnswerPayload::Choice { idx } = answer {
                view.picked = Some(*idx);
            }
        }
    }

    fn decorate_answer_result(&mut self, verdict: &AnswerVerdict) {
        if let Some(view) = self.play_view_mut() {
            view.mark = if verdict.success {
                AnswerMark::Correct
            } else {
                AnswerMark::Wrong
            };
            view.solution = Some(verdict.solution.clone());
            view.close_enough = verdict.local_match;
        }
    }

    fn enter_stats(&mut self, question: &Question, _answer: Option<&AnswerPayload>, stats: &StatsView) {
        self.screen = Screen::Stats {
            prompt: question.prompt().to_string(),
            view: stats.clone(),
        };
    }

    fn enter_scoreboard(&mut self, scores: &Scores) {
        self.screen = Screen::Scoreboard {
            standings: standings(scores)
                .into_iter()
                .map(|(name, score)| (name.to_string(), score))
                .collect(),
        };
    }

    fn tick_countdown(&mut self, countdown: &Countdown) {
        if let Some(view) = self.play_view_mut() {
            view.countdown = Some(*countdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn app_playing(kind: QuestionKind) -> ClientApp {
        let start = Utc::now();
        let question = Question::new("Q?", kind, start, start + Duration::seconds(10)).unwrap();
        let mut app = ClientApp::new("localhost".to_string(), 8712);
        app.enter_playing(&question);
        app
    }

    #[test]
    fn test_option_selection_wraps() {
        let mut app = app_playing(QuestionKind::Choice {
            options: ["A", "B", "C", "D"].map(String::from),
        });
        app.select_previous_option();
        assert_eq!(app.play_view().unwrap().selected, 3);
        app.select_next_option();
        app.select_next_option();
        assert_eq!(app.play_view().unwrap().selected, 1);
        assert_eq!(app.play_view().unwrap().answer(), Ok(AnswerPayload::Choice { idx: 1 }));
    }

    #[test]
    fn test_estimate_input_parsing() {
        let mut app = app_playing(QuestionKind::Estimate);
        for c in "12,5".chars() {
            app.input_push(c);
        }
        assert_eq!(
            app.play_view().unwrap().answer(),
            Ok(AnswerPayload::Estimate { estimate: 12.5 })
        );

        app.input_push('x');
        assert!(app.play_view().unwrap().answer().is_err());
    }

    #[test]
    fn test_input_locked_after_submission() {
        let mut app = app_playing(QuestionKind::Open);
        app.input_push('P');
        app.decorate_answer_pending(&AnswerPayload::Open { answer: "P".into() });
        app.input_push('x');
        assert_eq!(app.play_view().unwrap().input, "P");
        assert_eq!(app.play_view().unwrap().mark, AnswerMark::Pending);
    }

    #[test]
    fn test_verdict_decoration() {
        let mut app = app_playing(QuestionKind::Choice {
            options: ["A", "B", "C", "D"].map(String::from),
        });
        app.decorate_answer_pending(&AnswerPayload::Choice { idx: 1 });
        app.decorate_answer_result(&AnswerVerdict {
            success: false,
            solution: Solution::Choice(2),
            local_match: None,
        });

        let view = app.play_view().unwrap();
        assert_eq!(view.picked, Some(1));
        assert_eq!(view.mark, AnswerMark::Wrong);
        assert_eq!(view.solution, Some(Solution::Choice(2)));
    }

    #[test]
    fn test_decoration_ignored_off_play_screen() {
        let mut app = ClientApp::new("localhost".to_string(), 8712);
        app.enter_waiting();
        app.decorate_answer_result(&AnswerVerdict {
            success: true,
            solution: Solution::Open("x".into()),
            local_match: Some(true),
        });
        assert!(matches!(app.screen, Screen::Waiting));
    }

    #[test]
    fn test_scoreboard_standings() {
        let mut app = ClientApp::new("localhost".to_string(), 8712);
        app.enter_scoreboard(&Scores::from([("bo".to_string(), 2), ("al".to_string(), 9)]));
        let Screen::Scoreboard { standings } = &app.screen else {
            panic!("expected scoreboard");
        };
        assert_eq!(standings[0], ("al".to_string(), 9));
    }

    #[test]
    fn test_name_entry_limits_length() {
        let mut app = ClientApp::new("localhost".to_string(), 8712);
        app.enter_name_entry();
        for _ in 0..20 {
            app.input_push('a');
        }
        assert_eq!(app.name_input().len(), USERNAME_MAX_LENGTH);
        app.join_accepted("aaa".to_string());
        assert!(matches!(app.screen, Screen::Waiting));
    }
}
