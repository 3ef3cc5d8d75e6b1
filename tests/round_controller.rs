use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use trivia_client::models::{ChoiceDistribution, Solution};
use trivia_client::protocol::QuestionMessage;
use trivia_client::round::stats::ChoiceStats;
use trivia_client::round::{AnswerVerdict, Countdown, StatsView, Submission, Urgency};
use trivia_client::{
    AnswerJudge, AnswerPayload, JudgeError, Judgment, Question, QuestionKind, QuestionType, Renderer,
    RoundConfig, RoundController, RoundError, RoundEvent, RoundPhase, Scores,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Waiting,
    Playing(String),
    Pending(AnswerPayload),
    Verdict(AnswerVerdict),
    Stats(StatsView),
    Scoreboard(Scores),
    Tick(Countdown),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn verdicts(&self) -> Vec<&AnswerVerdict> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Verdict(verdict) => Some(verdict),
                _ => None,
            })
            .collect()
    }

    fn pending_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Pending(_)))
            .count()
    }

    fn last(&self) -> Option<&Call> {
        self.calls.last()
    }
}

impl Renderer for Recorder {
    fn enter_waiting(&mut self) {
        self.calls.push(Call::Waiting);
    }

    fn enter_playing(&mut self, question: &Question) {
        self.calls.push(Call::Playing(question.prompt().to_string()));
    }

    fn decorate_answer_pending(&mut self, answer: &AnswerPayload) {
        self.calls.push(Call::Pending(answer.clone()));
    }

    fn decorate_answer_result(&mut self, verdict: &AnswerVerdict) {
        self.calls.push(Call::Verdict(verdict.clone()));
    }

    fn enter_stats(&mut self, _question: &Question, _answer: Option<&AnswerPayload>, stats: &StatsView) {
        self.calls.push(Call::Stats(stats.clone()));
    }

    fn enter_scoreboard(&mut self, scores: &Scores) {
        self.calls.push(Call::Scoreboard(scores.clone()));
    }

    fn tick_countdown(&mut self, countdown: &Countdown) {
        self.calls.push(Call::Tick(*countdown));
    }
}

/// Answers every call with the same reply after a fixed delay.
struct ScriptedJudge {
    calls: AtomicUsize,
    delay: Duration,
    reply: Result<Judgment, JudgeError>,
}

impl ScriptedJudge {
    fn new(reply: Result<Judgment, JudgeError>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            reply,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerJudge for ScriptedJudge {
    async fn judge(&self, _answer: AnswerPayload) -> Result<Judgment, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.reply.clone()
    }
}

const JUDGE_DELAY: Duration = Duration::from_millis(100);
const STATS_DELAY: Duration = Duration::from_millis(1500);

fn config() -> RoundConfig {
    RoundConfig {
        stats_delay: STATS_DELAY,
        // Keep ticks out of the way; countdown tests send their own.
        tick_interval: Duration::from_secs(3600),
    }
}

fn controller(judge: Option<Arc<ScriptedJudge>>) -> (RoundController<Recorder>, UnboundedReceiver<RoundEvent>) {
    let (mut controller, rx) = RoundController::new(Recorder::default(), config());
    if let Some(judge) = judge {
        controller.connect_judge(judge);
    }
    (controller, rx)
}

fn choice_question(prompt: &str) -> Question {
    let start = Utc::now();
    Question::new(
        prompt,
        QuestionKind::Choice {
            options: ["A", "B", "C", "D"].map(String::from),
        },
        start,
        start + chrono::Duration::seconds(10),
    )
    .unwrap()
}

fn open_question(prompt: &str) -> Question {
    let start = Utc::now();
    Question::new(prompt, QuestionKind::Open, start, start + chrono::Duration::seconds(20)).unwrap()
}

fn choice_judgment(success: bool, solution: usize) -> Judgment {
    Judgment::Choice {
        success,
        solution,
        distribution: ChoiceDistribution { a: 3, b: 1, c: 6, d: 0 },
    }
}

/// Next event that is not a countdown tick.
async fn next_event(rx: &mut UnboundedReceiver<RoundEvent>) -> RoundEvent {
    loop {
        match rx.recv().await.expect("event channel closed") {
            RoundEvent::Tick(_) => continue,
            event => return event,
        }
    }
}

async fn quiet_for(rx: &mut UnboundedReceiver<RoundEvent>, duration: Duration) -> bool {
    tokio::time::timeout(duration, next_event(rx)).await.is_err()
}

#[tokio::test(start_paused = true)]
async fn second_submission_is_ignored() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 1)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge.clone()));

    controller.present_question(choice_question("Q1"));
    assert_eq!(
        controller.submit_answer(AnswerPayload::Choice { idx: 1 }).unwrap(),
        Submission::Sent
    );
    assert!(controller.is_answered());
    assert_eq!(
        controller.submit_answer(AnswerPayload::Choice { idx: 3 }).unwrap(),
        Submission::Ignored
    );

    let event = next_event(&mut rx).await;
    assert!(matches!(event, RoundEvent::Judged { .. }));
    controller.handle_event(event).unwrap();

    assert_eq!(
        controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap(),
        Submission::Ignored
    );
    assert_eq!(judge.calls(), 1);
    assert_eq!(controller.renderer().pending_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn wrong_choice_schedules_stats() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(false, 2)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge.clone()));

    controller.present_question(choice_question("Which one?"));
    controller.submit_answer(AnswerPayload::Choice { idx: 1 }).unwrap();

    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();
    let judged_at = Instant::now();

    assert!(controller.is_answered());
    assert_eq!(controller.phase(), RoundPhase::Playing);
    assert_eq!(
        controller.renderer().verdicts(),
        vec![&AnswerVerdict {
            success: false,
            solution: Solution::Choice(2),
            local_match: None,
        }]
    );

    let event = next_event(&mut rx).await;
    assert!(matches!(event, RoundEvent::StatsDue { .. }));
    assert!(judged_at.elapsed() >= STATS_DELAY);
    controller.handle_event(event).unwrap();

    assert_eq!(controller.phase(), RoundPhase::Stats);
    assert_eq!(
        controller.renderer().last(),
        Some(&Call::Stats(StatsView::Choice(ChoiceStats {
            options: ["A", "B", "C", "D"].map(String::from),
            counts: [3, 1, 6, 0],
            solution: 2,
            picked_correct: false,
        })))
    );
    assert_eq!(judge.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_judgment_is_not_rendered() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 0)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge.clone()));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.present_question(choice_question("Q2"));

    let event = next_event(&mut rx).await;
    assert!(matches!(event, RoundEvent::Judged { .. }));
    controller.handle_event(event).unwrap();

    assert!(controller.renderer().verdicts().is_empty());
    assert!(!controller.is_answered());
    assert_eq!(controller.phase(), RoundPhase::Playing);
    assert!(quiet_for(&mut rx, Duration::from_secs(5)).await);

    // The new question runs its own course.
    assert_eq!(
        controller.submit_answer(AnswerPayload::Choice { idx: 2 }).unwrap(),
        Submission::Sent
    );
    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();
    assert_eq!(controller.renderer().verdicts().len(), 1);

    let event = next_event(&mut rx).await;
    assert!(matches!(event, RoundEvent::StatsDue { .. }));
    controller.handle_event(event).unwrap();
    assert_eq!(controller.phase(), RoundPhase::Stats);
    assert_eq!(judge.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn new_question_preempts_pending_stats() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 0)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap();
    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();

    controller.present_question(choice_question("Q2"));

    assert!(quiet_for(&mut rx, STATS_DELAY * 3).await);
    assert_eq!(controller.phase(), RoundPhase::Playing);
    assert_eq!(controller.renderer().last(), Some(&Call::Playing("Q2".to_string())));
}

#[tokio::test(start_paused = true)]
async fn unknown_question_type_in_stats() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 0)), JUDGE_DELAY);
    let (mut controller, _rx) = controller(Some(judge));
    controller.present_question(choice_question("Q1"));

    let mut message = QuestionMessage::from(&choice_question("Q1"));
    message.kind = "quiz".to_string();

    let result = controller.present_round_stats(message, &choice_judgment(true, 0));
    assert!(matches!(result, Err(RoundError::UnsupportedQuestionType(t)) if t == "quiz"));
    assert_eq!(controller.phase(), RoundPhase::Playing);
}

#[tokio::test(start_paused = true)]
async fn broadcast_stats_include_own_answer() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 2)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    let question = choice_question("Q1");
    controller.present_question(question.clone());
    controller.submit_answer(AnswerPayload::Choice { idx: 2 }).unwrap();

    controller
        .present_round_stats(QuestionMessage::from(&question), &choice_judgment(true, 2))
        .unwrap();
    assert_eq!(controller.phase(), RoundPhase::Stats);
    assert!(matches!(
        controller.renderer().last(),
        Some(Call::Stats(StatsView::Choice(ChoiceStats { picked_correct: true, .. })))
    ));

    // The late verdict no longer touches the play screen.
    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();
    assert!(controller.renderer().verdicts().is_empty());
    assert_eq!(controller.phase(), RoundPhase::Stats);
}

#[tokio::test(start_paused = true)]
async fn missing_judge_keeps_question_open() {
    let (mut controller, _rx) = controller(None);
    controller.present_question(choice_question("Q1"));

    assert!(matches!(
        controller.submit_answer(AnswerPayload::Choice { idx: 1 }),
        Err(RoundError::NoJudgeConnected)
    ));
    assert!(!controller.is_answered());

    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 1)), JUDGE_DELAY);
    controller.connect_judge(judge.clone());
    assert_eq!(
        controller.submit_answer(AnswerPayload::Choice { idx: 1 }).unwrap(),
        Submission::Sent
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_answer_is_rejected_without_locking() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 1)), JUDGE_DELAY);
    let (mut controller, _rx) = controller(Some(judge.clone()));
    controller.present_question(choice_question("Q1"));

    assert!(matches!(
        controller.submit_answer(AnswerPayload::Open { answer: "B".into() }),
        Err(RoundError::InvalidAnswer(_))
    ));
    assert!(matches!(
        controller.submit_answer(AnswerPayload::Choice { idx: 4 }),
        Err(RoundError::InvalidAnswer(_))
    ));
    assert!(!controller.is_answered());
    assert_eq!(judge.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn judge_failure_leaves_question_answered() {
    let judge = ScriptedJudge::new(Err(JudgeError::Disconnected), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge.clone()));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap();

    let event = next_event(&mut rx).await;
    assert!(matches!(
        controller.handle_event(event),
        Err(RoundError::Judge(JudgeError::Disconnected))
    ));
    assert!(controller.is_answered());
    assert_eq!(
        controller.submit_answer(AnswerPayload::Choice { idx: 1 }).unwrap(),
        Submission::Ignored
    );
    assert!(quiet_for(&mut rx, STATS_DELAY * 2).await);
    assert_eq!(judge.calls(), 1);

    // The next question is unaffected.
    controller.present_question(choice_question("Q2"));
    assert!(!controller.is_answered());
}

#[tokio::test(start_paused = true)]
async fn open_answer_gets_local_verdict() {
    let reply = Judgment::Open {
        success: false,
        solution: "Paris".to_string(),
        distribution: BTreeMap::from([("Pari".to_string(), 1), ("Lyon".to_string(), 2)]),
    };
    let judge = ScriptedJudge::new(Ok(reply), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    controller.present_question(open_question("Capital of France?"));
    controller
        .submit_answer(AnswerPayload::Open { answer: "Pari".into() })
        .unwrap();
    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();

    assert_eq!(
        controller.renderer().verdicts(),
        vec![&AnswerVerdict {
            success: false,
            solution: Solution::Open("Paris".to_string()),
            local_match: Some(true),
        }]
    );

    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();
    let Some(Call::Stats(StatsView::Open(stats))) = controller.renderer().last() else {
        panic!("expected open stats");
    };
    assert_eq!(stats.rows[0].answer, "Lyon");
    assert!(stats.rows[1].close_enough);
    assert!(stats.close_enough);
}

#[tokio::test(start_paused = true)]
async fn scoreboard_phase() {
    let (mut controller, _rx) = controller(None);
    assert_eq!(controller.phase(), RoundPhase::Waiting);
    assert!(!controller.is_scoreboard());

    controller.present_question(choice_question("Q1"));
    let scores = Scores::from([("alice".to_string(), 3), ("bob".to_string(), 5)]);
    controller.present_scoreboard(&scores);

    assert!(controller.is_scoreboard());
    assert!(controller.is_scoreboard());
    assert!(controller.current_question().is_some());
    assert_eq!(controller.renderer().last(), Some(&Call::Scoreboard(scores)));

    controller.present_question(choice_question("Q2"));
    assert!(!controller.is_scoreboard());
    assert_eq!(controller.phase(), RoundPhase::Playing);
}

#[tokio::test(start_paused = true)]
async fn scoreboard_suppresses_late_stats() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 0)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap();
    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();

    controller.present_scoreboard(&Scores::new());

    let event = next_event(&mut rx).await;
    assert!(matches!(event, RoundEvent::StatsDue { .. }));
    controller.handle_event(event).unwrap();
    assert!(controller.is_scoreboard());
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_only_while_playing() {
    let (mut controller, _rx) = controller(None);
    let question = choice_question("Q1");
    let start = question.start();

    controller
        .handle_event(RoundEvent::Tick(start + chrono::Duration::milliseconds(2_500)))
        .unwrap();
    assert!(controller.renderer().calls.is_empty());

    controller.present_question(question);
    controller
        .handle_event(RoundEvent::Tick(start + chrono::Duration::milliseconds(2_500)))
        .unwrap();
    let Some(Call::Tick(countdown)) = controller.renderer().last() else {
        panic!("expected a countdown tick");
    };
    assert_eq!(countdown.remaining_secs, 8);
    assert_eq!(countdown.urgency, Urgency::Normal);

    controller
        .handle_event(RoundEvent::Tick(start + chrono::Duration::milliseconds(9_000)))
        .unwrap();
    let Some(Call::Tick(countdown)) = controller.renderer().last() else {
        panic!("expected a countdown tick");
    };
    assert_eq!(countdown.urgency, Urgency::Critical);

    // Past the end of the window nothing is drawn.
    let calls = controller.renderer().calls.len();
    controller
        .handle_event(RoundEvent::Tick(start + chrono::Duration::seconds(11)))
        .unwrap();
    assert_eq!(controller.renderer().calls.len(), calls);

    controller.present_scoreboard(&Scores::new());
    controller
        .handle_event(RoundEvent::Tick(start + chrono::Duration::seconds(1)))
        .unwrap();
    assert!(matches!(controller.renderer().last(), Some(Call::Scoreboard(_))));
}

#[tokio::test(start_paused = true)]
async fn waiting_drops_current_question() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 0)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap();
    controller.show_waiting();

    assert_eq!(controller.phase(), RoundPhase::Waiting);
    assert!(controller.current_question().is_none());
    assert_eq!(
        controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap(),
        Submission::Ignored
    );

    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();
    assert!(controller.renderer().verdicts().is_empty());
    assert_eq!(controller.renderer().last(), Some(&Call::Waiting));
}

#[tokio::test(start_paused = true)]
async fn ticker_feeds_events() {
    let (controller, mut rx) = RoundController::new(
        Recorder::default(),
        RoundConfig {
            stats_delay: STATS_DELAY,
            tick_interval: Duration::from_millis(16),
        },
    );

    for _ in 0..3 {
        assert!(matches!(rx.recv().await, Some(RoundEvent::Tick(_))));
    }

    drop(controller);
    // Ticks already queued may still be drained, then the channel closes.
    while let Some(event) = rx.recv().await {
        assert!(matches!(event, RoundEvent::Tick(_)));
    }
}

#[tokio::test(start_paused = true)]
async fn halt_cancels_pending_stats() {
    let judge = ScriptedJudge::new(Ok(choice_judgment(true, 0)), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap();
    let event = next_event(&mut rx).await;
    controller.handle_event(event).unwrap();
    let calls = controller.renderer().calls.len();

    controller.halt();

    assert!(quiet_for(&mut rx, STATS_DELAY * 3).await);
    assert_eq!(controller.phase(), RoundPhase::Waiting);
    assert!(controller.current_question().is_none());
    // Nothing drawn, the caller owns the screen now.
    assert_eq!(controller.renderer().calls.len(), calls);
}

#[tokio::test(start_paused = true)]
async fn stale_judge_failure_is_dropped() {
    let judge = ScriptedJudge::new(Err(JudgeError::Disconnected), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 0 }).unwrap();
    controller.present_question(choice_question("Q2"));

    let event = next_event(&mut rx).await;
    assert!(matches!(event, RoundEvent::Judged { result: Err(_), .. }));
    controller.handle_event(event).unwrap();

    assert_eq!(controller.phase(), RoundPhase::Playing);
    assert!(!controller.is_answered());
    assert!(controller.renderer().verdicts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn judgment_of_wrong_type_is_rejected() {
    let reply = Judgment::Open {
        success: true,
        solution: "B".to_string(),
        distribution: BTreeMap::new(),
    };
    let judge = ScriptedJudge::new(Ok(reply), JUDGE_DELAY);
    let (mut controller, mut rx) = controller(Some(judge));

    controller.present_question(choice_question("Q1"));
    controller.submit_answer(AnswerPayload::Choice { idx: 1 }).unwrap();

    let event = next_event(&mut rx).await;
    assert!(matches!(
        controller.handle_event(event),
        Err(RoundError::JudgmentMismatch {
            question: QuestionType::Choice,
            judgment: QuestionType::Open,
        })
    ));
    assert!(controller.renderer().verdicts().is_empty());
    assert!(controller.is_answered());
    assert!(quiet_for(&mut rx, STATS_DELAY * 2).await);
    assert_eq!(controller.phase(), RoundPhase::Playing);
}
