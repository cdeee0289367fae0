use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{ForumId, TopicId, UserId},
    error::ErrorCode,
};

use super::*;
use crate::ForumClient;

struct RecordingTransport {
    responses: Mutex<VecDeque<Result<ServerResponse, TransportError>>>,
    calls: Mutex<Vec<ClientRequest>>,
}

impl RecordingTransport {
    fn scripted(
        responses: impl IntoIterator<Item = Result<ServerResponse, TransportError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    async fn calls(&self) -> Vec<ClientRequest> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn call(&self, request: ClientRequest) -> Result<ServerResponse, TransportError> {
        self.calls.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(TransportError::Unconfigured))
    }
}

fn post(topic: &str, reply: &str, page: u32, score: i32) -> Post {
    Post {
        id: PostId::new(TopicId::new(topic), reply),
        author_id: UserId::new("7"),
        forum_id: Some(ForumId::fid("650")),
        current_page: page,
        floor: 4,
        score,
        posted_at: Utc::now(),
        attachments: Vec::new(),
    }
}

fn voted(direction: VoteDirection, delta: i32) -> Result<ServerResponse, TransportError> {
    Ok(ServerResponse::PostVoted { direction, delta })
}

fn tracker(transport: Arc<RecordingTransport>) -> VoteTracker {
    let (events, _) = broadcast::channel(8);
    VoteTracker::new(transport, events)
}

#[tokio::test]
async fn upvote_confirmation_raises_the_displayed_score() {
    let transport = RecordingTransport::scripted([voted(VoteDirection::Up, 1)]);
    let tracker = tracker(Arc::clone(&transport));
    let post = post("27465123", "4", 3, 10);

    let outcome = tracker.submit(&post, VoteOperation::Upvote).await;

    let state = match outcome {
        VoteOutcome::Applied(state) => state,
        other => panic!("expected applied outcome, got {other:?}"),
    };
    assert_eq!(state.direction, VoteDirection::Up);
    assert_eq!(state.displayed_score(post.score), 11);

    let calls = transport.calls().await;
    assert_eq!(
        calls,
        vec![ClientRequest::PostVote {
            post_id: post.id.clone(),
            operation: VoteOperation::Upvote,
        }]
    );
}

#[tokio::test]
async fn toggle_off_returns_the_displayed_score_to_base() {
    let transport = RecordingTransport::scripted([
        voted(VoteDirection::Up, 1),
        voted(VoteDirection::None, -1),
    ]);
    let tracker = tracker(transport);
    let post = post("27465123", "4", 3, 10);

    tracker.submit(&post, VoteOperation::Upvote).await;
    let outcome = tracker.submit(&post, VoteOperation::Upvote).await;

    let state = match outcome {
        VoteOutcome::Applied(state) => state,
        other => panic!("expected applied outcome, got {other:?}"),
    };
    assert_eq!(state.direction, VoteDirection::None);
    assert_eq!(state.delta, 0);
    assert_eq!(state.displayed_score(post.score), 10);
}

#[tokio::test]
async fn server_error_leaves_vote_state_untouched() {
    let transport = RecordingTransport::scripted([
        voted(VoteDirection::Up, 1),
        Ok(ServerResponse::Error(ApiError::new(
            ErrorCode::RateLimited,
            "voted too recently",
        ))),
    ]);
    let tracker = tracker(transport);
    let post = post("27465123", "4", 3, 10);

    tracker.submit(&post, VoteOperation::Upvote).await;
    let before = tracker.state_of(&post.id).await;

    let outcome = tracker.submit(&post, VoteOperation::Upvote).await;

    match outcome {
        VoteOutcome::Rejected(err) => assert_eq!(err.code, ErrorCode::RateLimited),
        other => panic!("expected rejected outcome, got {other:?}"),
    }
    assert_eq!(tracker.state_of(&post.id).await, before);
}

#[tokio::test]
async fn transport_failure_mutates_nothing_and_allows_retry() {
    let transport = RecordingTransport::scripted([
        Err(TransportError::Connection("connection reset".into())),
        voted(VoteDirection::Up, 1),
    ]);
    let tracker = tracker(Arc::clone(&transport));
    let post = post("27465123", "4", 3, 10);

    let outcome = tracker.submit(&post, VoteOperation::Upvote).await;
    assert!(matches!(outcome, VoteOutcome::TransportFailed(_)));
    assert_eq!(tracker.state_of(&post.id).await, VoteState::default());

    // Same intent resubmitted by the caller.
    let retried = tracker.submit(&post, VoteOperation::Upvote).await;
    assert!(matches!(retried, VoteOutcome::Applied(_)));
    assert_eq!(transport.calls().await.len(), 2);
}

#[tokio::test]
async fn inert_posts_never_reach_the_transport() {
    let transport = RecordingTransport::scripted([voted(VoteDirection::Up, 1)]);
    let tracker = tracker(Arc::clone(&transport));

    let mut dummy = post("27465123", "4", 1, 0);
    dummy.id = PostId::dummy();
    let mock = post("mock_1", "1", 1, 5);

    assert_eq!(
        tracker.submit(&dummy, VoteOperation::Upvote).await,
        VoteOutcome::Ignored
    );
    assert_eq!(
        tracker.submit(&mock, VoteOperation::Downvote).await,
        VoteOutcome::Ignored
    );

    assert!(transport.calls().await.is_empty());
    assert_eq!(tracker.state_of(&dummy.id).await, VoteState::default());
    assert_eq!(tracker.state_of(&mock.id).await, VoteState::default());
}

#[tokio::test]
async fn delta_accumulation_is_order_independent() {
    let first = [voted(VoteDirection::Up, 2), voted(VoteDirection::None, -1)];
    let second = [voted(VoteDirection::None, -1), voted(VoteDirection::Up, 2)];
    let post = post("27465123", "4", 3, 10);

    let mut deltas = Vec::new();
    for script in [first, second] {
        let tracker = tracker(RecordingTransport::scripted(script));
        tracker.submit(&post, VoteOperation::Upvote).await;
        tracker.submit(&post, VoteOperation::Upvote).await;
        deltas.push(tracker.state_of(&post.id).await.delta);
    }

    assert_eq!(deltas[0], deltas[1]);
    assert_eq!(deltas[0], 1);
}

#[tokio::test]
async fn forgetting_a_row_resets_its_state() {
    let transport = RecordingTransport::scripted([voted(VoteDirection::Up, 1)]);
    let tracker = tracker(transport);
    let post = post("27465123", "4", 3, 10);

    tracker.submit(&post, VoteOperation::Upvote).await;
    tracker.forget(&post.id).await;

    assert_eq!(tracker.state_of(&post.id).await, VoteState::default());
}

#[test]
fn displayed_score_never_drops_below_zero() {
    let state = VoteState {
        direction: VoteDirection::Down,
        delta: -5,
    };

    assert_eq!(state.displayed_score(3), 0);
    assert_eq!(state.displayed_score(0), 0);
    assert_eq!(state.displayed_score(8), 3);
}

#[tokio::test]
async fn vote_confirmation_reaches_event_subscribers() {
    let transport = RecordingTransport::scripted([voted(VoteDirection::Up, 1)]);
    let client = ForumClient::new(transport);
    let mut events = client.subscribe_events();
    let post = post("27465123", "4", 3, 10);

    client.votes.submit(&post, VoteOperation::Upvote).await;

    match events.try_recv() {
        Ok(ClientEvent::VoteChanged { post_id, state }) => {
            assert_eq!(post_id, post.id);
            assert_eq!(state.delta, 1);
        }
        other => panic!("expected a vote change event, got {other:?}"),
    }
}
