//! Answer judge backed by the WebSocket connection.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::{Mutex, mpsc, oneshot};
use uuid::Uuid;

use crate::error::JudgeError;
use crate::models::{AnswerPayload, Judgment};
use crate::protocol::ClientMessage;
use crate::round::AnswerJudge;

type Reply = oneshot::Sender<Result<Judgment, JudgeError>>;

/// Sends submissions to the coordinator and matches verdicts to them by
/// request id.
pub struct SocketJudge {
    outgoing: mpsc::UnboundedSender<ClientMessage>,
    pending: Mutex<HashMap<Uuid, Reply>>,
}

impl SocketJudge {
    pub fn new(outgoing: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self {
            outgoing,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Deliver a verdict. Returns false if nobody is waiting for it.
    pub async fn resolve(&self, request_id: Uuid, judgment: Judgment) -> bool {
        self.complete(request_id, Ok(judgment)).await
    }

    /// Deliver a refusal from the coordinator.
    pub async fn reject(&self, request_id: Uuid, reason: String) -> bool {
        self.complete(request_id, Err(JudgeError::Rejected(reason))).await
    }

    /// Fail every outstanding request, e.g. after the connection dropped.
    pub async fn fail_all(&self) {
        let mut pending = self.pending.lock().await;
        for (_, reply) in pending.drain() {
            let _ = reply.send(Err(JudgeError::Disconnected));
        }
    }

    async fn complete(&self, request_id: Uuid, result: Result<Judgment, JudgeError>) -> bool {
        let Some(reply) = self.pending.lock().await.remove(&request_id) else {
            warn!("Received verdict for unknown request {request_id}");
            return false;
        };
        reply.send(result).is_ok()
    }
}

#[async_trait]
impl AnswerJudge for SocketJudge {
    async fn judge(&self, answer: AnswerPayload) -> Result<Judgment, JudgeError> {
        let request_id = Uuid::new_v4();
        let (reply, verdict) = oneshot::channel();
        self.pending.lock().await.insert(request_id, reply);

        debug!("Sending answer as request {request_id}");
        if self
            .outgoing
            .send(ClientMessage::SubmitAnswer { request_id, answer })
            .is_err()
        {
            self.pending.lock().await.remove(&request_id);
            return Err(JudgeError::Disconnected);
        }

        verdict.await.unwrap_or(Err(JudgeError::Disconnected))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::models::ChoiceDistribution;

    use super::*;

    fn judgment() -> Judgment {
        Judgment::Choice {
            success: true,
            solution: 0,
            distribution: ChoiceDistribution::default(),
        }
    }

    async fn sent_request(rx: &mut mpsc::UnboundedReceiver<ClientMessage>) -> Uuid {
        match rx.recv().await {
            Some(ClientMessage::SubmitAnswer { request_id, .. }) => request_id,
            other => panic!("expected a submission, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verdict_reaches_caller() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let judge = Arc::new(SocketJudge::new(tx));

        let call = tokio::spawn({
            let judge = Arc::clone(&judge);
            async move { judge.judge(AnswerPayload::Choice { idx: 0 }).await }
        });

        let request_id = sent_request(&mut rx).await;
        assert!(judge.resolve(request_id, judgment()).await);
        assert_eq!(call.await.unwrap(), Ok(judgment()));
        assert!(!judge.resolve(request_id, judgment()).await);
    }

    #[tokio::test]
    async fn test_rejection_and_disconnect() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let judge = Arc::new(SocketJudge::new(tx));

        let first = tokio::spawn({
            let judge = Arc::clone(&judge);
            async move { judge.judge(AnswerPayload::Open { answer: "x".into() }).await }
        });
        let request_id = sent_request(&mut rx).await;
        judge.reject(request_id, "too late".to_string()).await;
        assert_eq!(
            first.await.unwrap(),
            Err(JudgeError::Rejected("too late".to_string()))
        );

        let second = tokio::spawn({
            let judge = Arc::clone(&judge);
            async move { judge.judge(AnswerPayload::Estimate { estimate: 1.0 }).await }
        });
        sent_request(&mut rx).await;
        judge.fail_all().await;
        assert_eq!(second.await.unwrap(), Err(JudgeError::Disconnected));
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let judge = SocketJudge::new(tx);
        assert_eq!(
            judge.judge(AnswerPayload::Choice { idx: 2 }).await,
            Err(JudgeError::Disconnected)
        );
    }
}
