//! Round state and answer submission.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::error::{JudgeError, RoundError};
use crate::models::{AnswerPayload, Judgment, Question, Scores};
use crate::protocol::QuestionMessage;

use super::clock::Countdown;
use super::fuzzy;
use super::judge::AnswerJudge;
use super::renderer::{AnswerVerdict, Renderer};
use super::stats::StatsView;
use super::timer::ScheduledTask;

/// Default pause between the verdict and the stats screen.
pub const STATS_DELAY: Duration = Duration::from_millis(1500);

/// Default countdown refresh period, about 60 Hz.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub struct RoundConfig {
    pub stats_delay: Duration,
    pub tick_interval: Duration,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            stats_delay: STATS_DELAY,
            tick_interval: TICK_INTERVAL,
        }
    }
}

/// Coarse display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Waiting,
    Playing,
    Stats,
    Scoreboard,
}

/// Events produced by tasks the controller started. Feed them back through
/// [`RoundController::handle_event`].
#[derive(Debug)]
pub enum RoundEvent {
    Tick(DateTime<Utc>),
    Judged {
        generation: u64,
        result: Result<Judgment, JudgeError>,
    },
    StatsDue {
        generation: u64,
    },
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Sent to the judge.
    Sent,
    /// Dropped: nothing to answer, or already answered.
    Ignored,
}

struct ActiveQuestion {
    question: Question,
    generation: u64,
    answer: Option<AnswerPayload>,
    /// Held until the stats screen is shown.
    judgment: Option<Judgment>,
}

/// Owns the current question and enforces one answer per question.
///
/// Every question gets a new generation number. Judge results and scheduled
/// transitions carry the generation they were started for and are dropped
/// when it is no longer current.
pub struct RoundController<R> {
    renderer: R,
    judge: Option<Arc<dyn AnswerJudge>>,
    config: RoundConfig,
    events: mpsc::UnboundedSender<RoundEvent>,
    phase: RoundPhase,
    generation: u64,
    active: Option<ActiveQuestion>,
    stats_timer: Option<ScheduledTask>,
    _ticker: ScheduledTask,
}

impl<R: Renderer> RoundController<R> {
    /// Create a controller and start its countdown ticker. Must be called
    /// inside a tokio runtime.
    pub fn new(renderer: R, config: RoundConfig) -> (Self, mpsc::UnboundedReceiver<RoundEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let ticker = ScheduledTask::repeating(config.tick_interval, events.clone(), || {
            RoundEvent::Tick(Utc::now())
        });

        let controller = Self {
            renderer,
            judge: None,
            config,
            events,
            phase: RoundPhase::Waiting,
            generation: 0,
            active: None,
            stats_timer: None,
            _ticker: ticker,
        };
        (controller, rx)
    }

    pub fn connect_judge(&mut self, judge: Arc<dyn AnswerJudge>) {
        self.judge = Some(judge);
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_scoreboard(&self) -> bool {
        self.phase == RoundPhase::Scoreboard
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.active.as_ref().map(|active| &active.question)
    }

    /// Whether the current question has been answered.
    pub fn is_answered(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.answer.is_some())
    }

    /// Show a new question, dropping everything tied to the previous one.
    pub fn present_question(&mut self, question: Question) {
        self.generation += 1;
        self.stats_timer = None;
        self.phase = RoundPhase::Playing;
        self.renderer.enter_playing(&question);

        info!(
            "Presenting {} question #{}: {}",
            question.question_type(),
            self.generation,
            question.prompt()
        );
        self.active = Some(ActiveQuestion {
            question,
            generation: self.generation,
            answer: None,
            judgment: None,
        });
    }

    /// Leave the current question and wait for the next round.
    pub fn show_waiting(&mut self) {
        self.generation += 1;
        self.stats_timer = None;
        self.active = None;
        self.phase = RoundPhase::Waiting;
        self.renderer.enter_waiting();
    }

    /// Stop the current round without drawing anything, e.g. once the
    /// connection is gone. In-flight judgments and the stats transition are
    /// dropped when they arrive.
    pub fn halt(&mut self) {
        self.generation += 1;
        self.stats_timer = None;
        self.active = None;
        self.phase = RoundPhase::Waiting;
        info!("Round halted");
    }

    /// Submit the participant's answer for the current question.
    ///
    /// The question is marked answered before the judge is called, so a
    /// second submission is ignored even while the first is in flight.
    pub fn submit_answer(&mut self, answer: AnswerPayload) -> Result<Submission, RoundError> {
        if self.phase != RoundPhase::Playing {
            debug!("Ignoring answer outside of play");
            return Ok(Submission::Ignored);
        }
        let Some(active) = self.active.as_mut() else {
            debug!("Ignoring answer, no question is current");
            return Ok(Submission::Ignored);
        };
        if active.answer.is_some() {
            debug!("Ignoring duplicate answer for question #{}", active.generation);
            return Ok(Submission::Ignored);
        }
        active.question.check_answer(&answer)?;
        let judge = self.judge.clone().ok_or(RoundError::NoJudgeConnected)?;

        active.answer = Some(answer.clone());
        self.renderer.decorate_answer_pending(&answer);

        let generation = active.generation;
        let events = self.events.clone();
        debug!("Submitting answer for question #{generation}");
        tokio::spawn(async move {
            let result = judge.judge(answer).await;
            let _ = events.send(RoundEvent::Judged { generation, result });
        });

        Ok(Submission::Sent)
    }

    /// Apply an event from one of the controller's tasks.
    pub fn handle_event(&mut self, event: RoundEvent) -> Result<(), RoundError> {
        match event {
            RoundEvent::Tick(now) => {
                self.tick(now);
                Ok(())
            }
            RoundEvent::Judged { generation, result } => self.handle_judgment(generation, result),
            RoundEvent::StatsDue { generation } => self.show_scheduled_stats(generation),
        }
    }

    fn tick(&mut self, now: DateTime<Utc>) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        let Some(active) = &self.active else {
            return;
        };
        if let Some(countdown) = Countdown::at(now, active.question.start(), active.question.end()) {
            self.renderer.tick_countdown(&countdown);
        }
    }

    fn handle_judgment(
        &mut self,
        generation: u64,
        result: Result<Judgment, JudgeError>,
    ) -> Result<(), RoundError> {
        let Some(active) = self
            .active
            .as_mut()
            .filter(|active| active.generation == generation)
        else {
            debug!("Discarding judgment for superseded question #{generation}: {result:?}");
            return Ok(());
        };
        if self.phase != RoundPhase::Playing {
            debug!("Discarding judgment for question #{generation}, play screen is gone");
            return Ok(());
        }
        let judgment = result?;
        if judgment.question_type() != active.question.question_type() {
            return Err(RoundError::JudgmentMismatch {
                question: active.question.question_type(),
                judgment: judgment.question_type(),
            });
        }

        let local_match = match (&active.answer, &judgment) {
            (Some(AnswerPayload::Open { answer }), Judgment::Open { solution, .. }) => {
                Some(fuzzy::is_close_enough(solution, answer))
            }
            _ => None,
        };
        let verdict = AnswerVerdict {
            success: judgment.success(),
            solution: judgment.solution(),
            local_match,
        };
        if local_match.is_some_and(|local| local != verdict.success) {
            debug!(
                "Local match {:?} disagrees with judge verdict {} for question #{generation}",
                local_match, verdict.success
            );
        }
        info!(
            "Question #{generation} judged {}",
            if verdict.success { "correct" } else { "wrong" }
        );
        self.renderer.decorate_answer_result(&verdict);

        active.judgment = Some(judgment);
        self.stats_timer = Some(ScheduledTask::once(
            self.config.stats_delay,
            self.events.clone(),
            RoundEvent::StatsDue { generation },
        ));
        Ok(())
    }

    fn show_scheduled_stats(&mut self, generation: u64) -> Result<(), RoundError> {
        if self.phase != RoundPhase::Playing {
            debug!("Dropping stats transition for question #{generation}, phase is {:?}", self.phase);
            return Ok(());
        }
        let Some(active) = self
            .active
            .as_mut()
            .filter(|active| active.generation == generation)
        else {
            debug!("Dropping stats transition for superseded question #{generation}");
            return Ok(());
        };
        let Some(judgment) = active.judgment.take() else {
            warn!("Stats transition for question #{generation} without a judgment");
            return Ok(());
        };

        let question = active.question.clone();
        let answer = active.answer.clone();
        self.present_stats(&question, answer.as_ref(), &judgment)
    }

    /// Show the statistics screen for `question`.
    pub fn present_stats(
        &mut self,
        question: &Question,
        answer: Option<&AnswerPayload>,
        judgment: &Judgment,
    ) -> Result<(), RoundError> {
        let view = StatsView::build(question, answer, judgment)?;
        self.stats_timer = None;
        self.phase = RoundPhase::Stats;
        self.renderer.enter_stats(question, answer, &view);
        Ok(())
    }

    /// Show statistics broadcast by the coordinator. The participant's own
    /// answer is attached when the question is the current one.
    pub fn present_round_stats(
        &mut self,
        message: QuestionMessage,
        judgment: &Judgment,
    ) -> Result<(), RoundError> {
        let question = Question::try_from(message)?;
        let answer = self
            .active
            .as_ref()
            .filter(|active| active.question == question)
            .and_then(|active| active.answer.clone());
        self.present_stats(&question, answer.as_ref(), judgment)
    }

    pub fn present_scoreboard(&mut self, scores: &Scores) {
        self.phase = RoundPhase::Scoreboard;
        self.renderer.enter_scoreboard(scores);
    }
}
