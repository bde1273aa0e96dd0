use dso_scope::brain::Brain;
use dso_scope::error::{Error, Result};
use dso_scope::market::{CompetitorDetail, CompetitorRecord};
use dso_scope::session::{ERROR_NOTICE_PREFIX, ResearchSession, Role};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Chat-only brain with scripted replies, consumed in order.
struct ScriptedBrain {
    replies: RefCell<VecDeque<Result<String>>>,
}

impl ScriptedBrain {
    fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
        }
    }
}

impl Brain for ScriptedBrain {
    async fn market_matrix(&self, market: &str) -> Result<Vec<CompetitorRecord>> {
        Err(Error::unavailable(market, "not scripted"))
    }

    async fn competitor_details(
        &self,
        market: &str,
        competitor: &str,
    ) -> Result<CompetitorDetail> {
        Err(Error::not_found(market, competitor))
    }

    async fn chat(&self, _prompt: &str) -> Result<String> {
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::chat("script exhausted")))
    }
}

#[tokio::test]
async fn transcript_interleaves_user_and_assistant_in_order() {
    let brain = ScriptedBrain::new(vec![Ok("r1".into()), Ok("r2".into())]);
    let mut session = ResearchSession::new();
    assert!(session.is_empty());

    session.submit(&brain, "m1", |_| {}).await;
    session.submit(&brain, "m2", |_| {}).await;

    let roles_and_contents: Vec<(Role, &str)> = session
        .transcript()
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        roles_and_contents,
        vec![
            (Role::User, "m1"),
            (Role::Assistant, "r1"),
            (Role::User, "m2"),
            (Role::Assistant, "r2"),
        ]
    );
}

#[tokio::test]
async fn user_message_is_rendered_before_the_reply_arrives() {
    let brain = ScriptedBrain::new(vec![Ok("reply".into())]);
    let mut session = ResearchSession::new();

    let snapshots = RefCell::new(Vec::new());
    session
        .submit(&brain, "hello", |transcript| {
            snapshots
                .borrow_mut()
                .push(transcript.iter().map(|m| m.role).collect::<Vec<_>>());
        })
        .await;

    let snapshots = snapshots.into_inner();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0], vec![Role::User]);
    assert_eq!(snapshots[1], vec![Role::User, Role::Assistant]);
}

#[tokio::test]
async fn backend_failure_keeps_user_message_and_appends_notice() {
    let brain = ScriptedBrain::new(vec![Ok("r1".into()), Err(Error::chat("inference offline"))]);
    let mut session = ResearchSession::new();

    session.submit(&brain, "m1", |_| {}).await;
    session.submit(&brain, "m2", |_| {}).await;

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[2].role, Role::User);
    assert_eq!(transcript[2].content, "m2");
    assert_eq!(transcript[3].role, Role::Assistant);
    assert!(transcript[3].content.starts_with(ERROR_NOTICE_PREFIX));
    assert!(transcript[3].content.contains("inference offline"));
}

#[tokio::test]
async fn blank_submission_is_a_noop() {
    let brain = ScriptedBrain::new(vec![Ok("never used".into())]);
    let mut session = ResearchSession::new();

    session.submit(&brain, "   ", |_| {}).await;

    assert!(session.is_empty());
    assert_eq!(brain.replies.borrow().len(), 1);
}
