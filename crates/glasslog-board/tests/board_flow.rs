//! End-to-end board sessions over the in-memory store.

use async_trait::async_trait;
use glasslog_board::{Attachment, Board, BoardConfig, BoardStore, Error, MemoryStore};
use glasslog_core::{Card, CardDraft, Funding, ManualClock, VoteReceipt, VotingKey};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use tokio_test::{assert_err, assert_ok};

/// Memory store that counts writes and can be told to fail or stall votes.
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    fail_votes: AtomicBool,
    stall_votes: AtomicBool,
    vote_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl RecordingStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }
}

#[async_trait]
impl BoardStore for RecordingStore {
    async fn list_cards(&self) -> glasslog_board::Result<Vec<Card>> {
        self.inner.list_cards().await
    }

    async fn create_card(&self, draft: &CardDraft) -> glasslog_board::Result<Card> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_card(draft).await
    }

    async fn set_story_points(&self, card_id: &str, storypoints: u32) -> glasslog_board::Result<Card> {
        self.inner.set_story_points(card_id, storypoints).await
    }

    async fn list_keys(&self) -> glasslog_board::Result<Vec<VotingKey>> {
        self.inner.list_keys().await
    }

    async fn cast_vote(&self, card_id: &str, key_id: &str) -> glasslog_board::Result<VoteReceipt> {
        self.vote_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_votes.load(Ordering::SeqCst) {
            return Err(Error::Transport("backend unavailable".into()));
        }
        if self.stall_votes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.cast_vote(card_id, key_id).await
    }

    async fn list_media(&self) -> glasslog_board::Result<Vec<String>> {
        self.inner.list_media().await
    }

    async fn upload_attachment(&self, attachment: Attachment) -> glasslog_board::Result<String> {
        self.inner.upload_attachment(attachment).await
    }
}

fn key(id: &str, code: &str, owner: &str, quota: u32) -> VotingKey {
    VotingKey::with_full_quota(id.into(), code.into(), owner.into(), quota)
}

fn seeded_store(member_quota: u32) -> RecordingStore {
    glasslog_board::logging::init("glasslog_board=debug,glasslog_core=debug");

    let mut a = Card::new("card-a".into(), "Dark mode".into(), "<p>a</p>".into());
    a.storypoints = 4;
    let mut b = Card::new("card-b".into(), "CSV export".into(), "<p>b</p>".into());
    b.storypoints = 3;
    let c = Card::new("card-c".into(), "SSO".into(), "<p>c</p>".into());

    let inner = MemoryStore::new()
        .with_cards([a, b, c])
        .with_keys([
            key("k-member", "member123", "design", member_quota),
            key("k-admin", "admin-key", "admin", 10),
        ])
        .unwrap();
    RecordingStore::new(inner)
}

async fn signed_in(store: Arc<RecordingStore>, code: &str) -> Board<RecordingStore> {
    let mut board = Board::load(store, BoardConfig::default()).await.unwrap();
    assert_ok!(board.sign_in(code).await);
    board
}

#[tokio::test]
async fn viewer_is_read_only() {
    let store = Arc::new(seeded_store(2));
    let mut board = Board::load(Arc::clone(&store), BoardConfig::default()).await.unwrap();

    assert_eq!(board.cards().len(), 3);
    assert!(!board.is_member());
    assert!(!board.can_vote());
    assert_eq!(board.votes(), None);

    assert!(matches!(board.upvote("card-a").await, Err(Error::NotSignedIn)));
    assert!(matches!(
        board.submit_card(CardDraft::new("Idea", "<p>x</p>")).await,
        Err(Error::NotSignedIn)
    ));
    assert_eq!(store.vote_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sign_in_checks_code_against_store() {
    let store = Arc::new(seeded_store(2));
    let mut board = Board::load(store, BoardConfig::default()).await.unwrap();

    assert!(matches!(board.sign_in("   ").await, Err(Error::Validation(_))));
    assert!(matches!(board.sign_in("guess").await, Err(Error::UnknownKey)));
    assert!(!board.is_member());

    let key = board.sign_in(" member123 ").await.unwrap();
    assert_eq!(key.id, "k-member");
    assert_eq!(board.votes(), Some((2, 2)));

    board.sign_out();
    assert!(!board.is_member());
}

#[tokio::test]
async fn quota_of_two_allows_two_votes() {
    let store = Arc::new(seeded_store(2));
    let mut board = signed_in(Arc::clone(&store), "member123").await;

    assert_ok!(board.upvote("card-a").await);
    assert_ok!(board.upvote("card-b").await);
    assert_eq!(board.votes(), Some((0, 2)));
    assert!(!board.can_vote());

    let err = assert_err!(board.upvote("card-a").await);
    assert!(matches!(err, Error::InsufficientVotes { .. }));

    // The third attempt never reached the store.
    assert_eq!(store.vote_calls.load(Ordering::SeqCst), 2);
    assert_eq!(board.card("card-a").unwrap().upvotes, 1);
    assert_eq!(store.inner.card("card-a").await.unwrap().upvotes, 1);
    assert_eq!(store.inner.key("k-member").await.unwrap().balance, 0);
}

#[tokio::test]
async fn failed_vote_is_reverted() {
    let store = Arc::new(seeded_store(3));
    let mut board = signed_in(Arc::clone(&store), "member123").await;
    assert_ok!(board.upvote("card-a").await);

    store.fail_votes.store(true, Ordering::SeqCst);
    let err = assert_err!(board.upvote("card-a").await);
    assert!(err.is_retryable());

    assert_eq!(board.card("card-a").unwrap().upvotes, 1);
    assert_eq!(board.votes(), Some((2, 3)));
    assert_eq!(store.inner.card("card-a").await.unwrap().upvotes, 1);
    assert_eq!(store.inner.key("k-member").await.unwrap().balance, 2);

    // Retry once the backend is back.
    store.fail_votes.store(false, Ordering::SeqCst);
    assert_ok!(board.upvote("card-a").await);
    assert_eq!(board.card("card-a").unwrap().upvotes, 2);
    assert_eq!(board.votes(), Some((1, 3)));
}

#[tokio::test]
async fn dropped_vote_leaves_session_unchanged() {
    let store = Arc::new(seeded_store(2));
    let mut board = signed_in(Arc::clone(&store), "member123").await;

    store.stall_votes.store(true, Ordering::SeqCst);
    let timed_out = tokio::time::timeout(Duration::from_millis(50), board.upvote("card-a")).await;
    assert!(timed_out.is_err());
    assert_eq!(store.vote_calls.load(Ordering::SeqCst), 1);

    assert_eq!(board.card("card-a").unwrap().upvotes, 0);
    assert_eq!(board.votes(), Some((2, 2)));
    assert_eq!(store.inner.card("card-a").await.unwrap().upvotes, 0);
    assert_eq!(store.inner.key("k-member").await.unwrap().balance, 2);

    store.stall_votes.store(false, Ordering::SeqCst);
    assert_ok!(board.upvote("card-a").await);
    assert_eq!(board.card("card-a").unwrap().upvotes, 1);
    assert_eq!(board.votes(), Some((1, 2)));
}

#[tokio::test]
async fn shared_key_cannot_double_spend() {
    let store = Arc::new(seeded_store(2));
    let mut laptop = signed_in(Arc::clone(&store), "member123").await;
    let mut phone = signed_in(Arc::clone(&store), "member123").await;

    assert_ok!(laptop.upvote("card-a").await);
    assert_ok!(laptop.upvote("card-a").await);

    // The phone still believes it holds two votes; the store says otherwise.
    assert_eq!(phone.votes(), Some((2, 2)));
    let err = assert_err!(phone.upvote("card-b").await);
    assert!(matches!(err, Error::InsufficientVotes { .. }));
    assert_eq!(phone.votes(), Some((0, 2)));
    assert_eq!(phone.card("card-b").unwrap().upvotes, 0);

    assert_eq!(store.inner.card("card-a").await.unwrap().upvotes, 2);
    assert_eq!(store.inner.card("card-b").await.unwrap().upvotes, 0);
    assert_eq!(store.inner.key("k-member").await.unwrap().balance, 0);
}

#[tokio::test]
async fn empty_name_blocks_submission() {
    let store = Arc::new(seeded_store(2));
    let mut board = signed_in(Arc::clone(&store), "member123").await;

    let err = assert_err!(board.submit_card(CardDraft::new("", "<p>Body</p>")).await);
    assert!(matches!(err, Error::Validation(_)));
    let err = assert_err!(board.submit_card(CardDraft::new("Name", "<p><br></p>")).await);
    assert!(matches!(err, Error::Validation(_)));

    assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(board.cards().len(), 3);
}

#[tokio::test]
async fn submit_card_with_media() {
    let store = Arc::new(seeded_store(2));
    let mut board = signed_in(Arc::clone(&store), "member123").await;

    let err = assert_err!(
        board
            .upload_media(vec![
                Attachment::new("shot.png", "image/png", vec![1, 2]),
                Attachment::new("spec.pdf", "application/pdf", vec![3]),
            ])
            .await
    );
    assert!(matches!(err, Error::Validation(_)));

    let urls = board
        .upload_media(vec![
            Attachment::new("first.png", "image/png", vec![1]),
            Attachment::new("second.jpg", "image/jpeg", vec![2]),
        ])
        .await
        .unwrap();
    assert_eq!(urls.len(), 2);

    let draft = CardDraft::new("Onboarding tour", "<p>Guide new users</p>").with_media(urls.clone());
    let card = board.submit_card(draft).await.unwrap().clone();
    assert_eq!(card.media, urls);
    assert_eq!(card.upvotes, 0);
    assert_eq!(card.storypoints, 0);

    assert_eq!(board.cards().len(), 4);
    assert_eq!(board.cards()[3].id, card.id);
    assert_eq!(store.inner.list_cards().await.unwrap().len(), 4);
}

#[tokio::test]
async fn unestimated_cards_take_votes_but_stay_pending() {
    let store = Arc::new(seeded_store(5));
    let mut board = signed_in(store, "member123").await;

    for _ in 0..3 {
        assert_ok!(board.upvote("card-c").await);
    }

    let allocation = board.leaderboard();
    assert_eq!(allocation.entries()[0].card.id, "card-c");
    assert_eq!(allocation.funding_of("card-c"), Some(Funding::PendingEstimate));
    assert!(allocation.is_funded("card-a"));
    assert!(allocation.is_funded("card-b"));
    assert_eq!(allocation.remaining_capacity(), 93);
}

#[tokio::test]
async fn estimation_is_admin_only() {
    let store = Arc::new(seeded_store(2));
    let mut member = signed_in(Arc::clone(&store), "member123").await;
    assert!(matches!(member.estimate("card-c", 5).await, Err(Error::Forbidden(_))));

    let mut admin = signed_in(Arc::clone(&store), "admin-key").await;
    let card = admin.estimate("card-c", 5).await.unwrap();
    assert_eq!(card.storypoints, 5);
    assert!(matches!(admin.estimate("missing", 1).await, Err(Error::NotFound(_))));

    assert_ok!(member.refresh().await);
    assert_eq!(member.card("card-c").unwrap().storypoints, 5);
}

#[tokio::test]
async fn leaderboard_skips_cards_that_do_not_fit() {
    let store = Arc::new(seeded_store(10));
    let config = BoardConfig {
        total_capacity: 5,
        ..BoardConfig::default()
    };
    let mut board = Board::load(Arc::clone(&store), config).await.unwrap();
    assert_ok!(board.sign_in("admin-key").await);

    // Ranked costs [6, 3]: the first is skipped, the second still funded.
    assert_ok!(board.estimate("card-a", 6).await);
    assert_ok!(board.upvote("card-a").await);
    assert_ok!(board.upvote("card-a").await);
    assert_ok!(board.upvote("card-b").await);

    let allocation = board.leaderboard();
    let ids: Vec<_> = allocation.entries().iter().map(|e| e.card.id.as_str()).collect();
    assert_eq!(ids, vec!["card-a", "card-b", "card-c"]);
    assert_eq!(allocation.funding_of("card-a"), Some(Funding::Unfunded));
    assert_eq!(allocation.funding_of("card-b"), Some(Funding::Funded));
    assert_eq!(allocation.remaining_capacity(), 2);
}

#[tokio::test]
async fn refresh_adopts_store_balance() {
    let store = Arc::new(seeded_store(3));
    let mut laptop = signed_in(Arc::clone(&store), "member123").await;
    let mut phone = signed_in(Arc::clone(&store), "member123").await;

    assert_ok!(laptop.upvote("card-b").await);
    assert_ok!(phone.refresh().await);

    assert_eq!(phone.votes(), Some((2, 3)));
    assert_eq!(phone.card("card-b").unwrap().upvotes, 1);
}

#[tokio::test]
async fn oversized_vote_window_fails_load() {
    let config = BoardConfig::from_lookup(|name| {
        (name == "GLASSLOG_VOTE_WINDOW_SECS").then(|| u64::MAX.to_string())
    })
    .unwrap();

    let loaded = Board::load(Arc::new(seeded_store(1)), config).await;
    assert!(matches!(loaded, Err(Error::Validation(_))));
}

#[tokio::test]
async fn countdown_follows_board_clock() {
    let clock = ManualClock::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    let config = BoardConfig {
        vote_window: Duration::from_secs(90),
        tick: Duration::from_millis(10),
        ..BoardConfig::default()
    };
    let board = Board::load_with_clock(Arc::new(seeded_store(1)), config, Arc::new(clock.clone()))
        .await
        .unwrap();

    assert_eq!(board.remaining(), Duration::from_secs(90));
    clock.advance(Duration::from_secs(30));
    assert_eq!(board.remaining(), Duration::from_secs(60));
    assert_eq!(glasslog_core::format_remaining(board.remaining()), "0:01:00");

    let countdown = board.start_countdown();
    clock.advance(Duration::from_secs(120));
    tokio::time::timeout(Duration::from_secs(5), countdown.wait())
        .await
        .expect("countdown should stop once the window closes");
    assert_eq!(board.remaining(), Duration::ZERO);
}
