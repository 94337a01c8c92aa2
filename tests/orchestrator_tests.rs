//! End-to-end orchestration tests with in-memory collaborator ports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;

use tcg_arena::{
    BattleError, Card, CardClass, CardId, DeckSource, Element, MatchDecision, MatchId,
    MatchOrchestrator, MemoryRatingStore, Participant, PlayerId, RatingStore, Result,
    TranscriptSink, Verdict,
};

// =============================================================================
// Test Ports
// =============================================================================

#[derive(Default)]
struct MemoryDeckSource {
    decks: Mutex<FxHashMap<PlayerId, Vec<Card>>>,
}

impl MemoryDeckSource {
    async fn put(&self, player: PlayerId, deck: Vec<Card>) {
        self.decks.lock().await.insert(player, deck);
    }
}

#[async_trait]
impl DeckSource for MemoryDeckSource {
    async fn load_deck(&self, player: PlayerId) -> Result<Vec<Card>> {
        Ok(self.decks.lock().await.get(&player).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingSink {
    saved: Mutex<Vec<(MatchId, String)>>,
}

#[async_trait]
impl TranscriptSink for RecordingSink {
    async fn persist(&self, match_id: MatchId, transcript: &str) -> Result<()> {
        self.saved.lock().await.push((match_id, transcript.to_string()));
        Ok(())
    }
}

struct FailingSink;

#[async_trait]
impl TranscriptSink for FailingSink {
    async fn persist(&self, _match_id: MatchId, _transcript: &str) -> Result<()> {
        Err(BattleError::Transcript("disk full".into()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn fire_deck(base_id: u32) -> Vec<Card> {
    vec![Card::monster(
        CardId::new(base_id),
        "FireSpirit",
        40.0,
        Element::Fire,
        CardClass::Regular,
    )]
}

fn water_deck(base_id: u32) -> Vec<Card> {
    vec![Card::monster(
        CardId::new(base_id),
        "WaterNymph",
        20.0,
        Element::Water,
        CardClass::Regular,
    )]
}

struct Harness {
    orchestrator: Arc<MatchOrchestrator>,
    decks: Arc<MemoryDeckSource>,
    sink: Arc<RecordingSink>,
    ratings: Arc<MemoryRatingStore>,
}

fn harness() -> Harness {
    let decks = Arc::new(MemoryDeckSource::default());
    let sink = Arc::new(RecordingSink::default());
    let ratings = Arc::new(MemoryRatingStore::new());
    let orchestrator = Arc::new(
        MatchOrchestrator::new(
            Arc::clone(&decks) as Arc<dyn DeckSource>,
            Arc::clone(&sink) as Arc<dyn TranscriptSink>,
            Arc::clone(&ratings) as Arc<dyn RatingStore>,
        )
        .with_seed(42),
    );
    Harness {
        orchestrator,
        decks,
        sink,
        ratings,
    }
}

fn alice() -> Participant {
    Participant::new(PlayerId::new(1), "alice")
}

fn bob() -> Participant {
    Participant::new(PlayerId::new(2), "bob")
}

// =============================================================================
// Tests
// =============================================================================

/// First caller goes pending, second caller completes the match, and the
/// waiter's ticket resolves to the same result.
#[tokio::test]
async fn test_full_match_flow() {
    let h = harness();

    let ticket = match h
        .orchestrator
        .request_match(alice(), water_deck(1))
        .await
        .unwrap()
    {
        MatchDecision::Pending(ticket) => ticket,
        MatchDecision::Completed(_) => panic!("nobody was waiting"),
    };

    let bob_result = match h
        .orchestrator
        .request_match(bob(), fire_deck(10))
        .await
        .unwrap()
    {
        MatchDecision::Completed(result) => result,
        MatchDecision::Pending(_) => panic!("alice was waiting"),
    };
    let alice_result = ticket.wait().await.unwrap();

    assert_eq!(alice_result, bob_result);
    // Bob (fire, side A) loses to alice (water, side B) in round one.
    assert_eq!(bob_result.verdict, Verdict::WinB);
    assert_eq!(bob_result.winner(), Some(alice().id));
    assert_eq!(bob_result.rounds, 1);
}

/// The rating store sees exactly one symmetric update per match.
#[tokio::test]
async fn test_ratings_applied_once() {
    let h = harness();

    let ticket = match h
        .orchestrator
        .request_match(alice(), water_deck(1))
        .await
        .unwrap()
    {
        MatchDecision::Pending(ticket) => ticket,
        MatchDecision::Completed(_) => panic!(),
    };
    h.orchestrator
        .request_match(bob(), fire_deck(10))
        .await
        .unwrap();
    ticket.wait().await.unwrap();

    let alice_stats = h.ratings.stats(alice().id).await.unwrap();
    let bob_stats = h.ratings.stats(bob().id).await.unwrap();
    assert_eq!(alice_stats.elo, 1016);
    assert_eq!(bob_stats.elo, 984);
    assert_eq!(alice_stats.games, 1);
    assert_eq!(bob_stats.games, 1);
    assert_eq!(alice_stats.wins, 1);
    assert_eq!(bob_stats.losses, 1);
}

/// The transcript reaches the sink exactly once, keyed by the match id.
#[tokio::test]
async fn test_transcript_persisted() {
    let h = harness();

    let ticket = match h
        .orchestrator
        .request_match(alice(), water_deck(1))
        .await
        .unwrap()
    {
        MatchDecision::Pending(ticket) => ticket,
        MatchDecision::Completed(_) => panic!(),
    };
    let result = match h
        .orchestrator
        .request_match(bob(), fire_deck(10))
        .await
        .unwrap()
    {
        MatchDecision::Completed(result) => result,
        MatchDecision::Pending(_) => panic!(),
    };
    ticket.wait().await.unwrap();

    let saved = h.sink.saved.lock().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, result.match_id);
    assert_eq!(saved[0].1, result.transcript);
}

/// Transcript sink failure is logged, not surfaced: both callers still
/// receive the computed result and ratings still apply.
#[tokio::test]
async fn test_persistence_failure_is_non_fatal() {
    let decks = Arc::new(MemoryDeckSource::default());
    let ratings = Arc::new(MemoryRatingStore::new());
    let orchestrator = Arc::new(
        MatchOrchestrator::new(
            Arc::clone(&decks) as Arc<dyn DeckSource>,
            Arc::new(FailingSink) as Arc<dyn TranscriptSink>,
            Arc::clone(&ratings) as Arc<dyn RatingStore>,
        )
        .with_seed(42),
    );

    let ticket = match orchestrator
        .request_match(alice(), water_deck(1))
        .await
        .unwrap()
    {
        MatchDecision::Pending(ticket) => ticket,
        MatchDecision::Completed(_) => panic!(),
    };
    let result = orchestrator.request_match(bob(), fire_deck(10)).await;

    assert!(matches!(result, Ok(MatchDecision::Completed(_))));
    assert!(ticket.wait().await.is_ok());
    assert!(ratings.stats(alice().id).await.is_some());
}

/// An empty deck never reaches the lobby.
#[tokio::test]
async fn test_empty_deck_rejected_at_the_boundary() {
    let h = harness();

    let err = h.orchestrator.request_match(alice(), vec![]).await.unwrap_err();
    assert!(matches!(err, BattleError::InvalidDeck(p) if p == alice().id));
    // Nothing was queued.
    match h
        .orchestrator
        .request_match(bob(), fire_deck(10))
        .await
        .unwrap()
    {
        MatchDecision::Pending(_) => {}
        MatchDecision::Completed(_) => panic!("lobby should have been empty"),
    }
}

/// `request_match_for` loads the deck from the store and rejects players
/// without one.
#[tokio::test]
async fn test_request_match_for_loads_deck() {
    let h = harness();

    let err = h.orchestrator.request_match_for(alice()).await.unwrap_err();
    assert!(matches!(err, BattleError::NoDeckConfigured(p) if p == alice().id));

    h.decks.put(alice().id, water_deck(1)).await;
    match h.orchestrator.request_match_for(alice()).await.unwrap() {
        MatchDecision::Pending(_) => {}
        MatchDecision::Completed(_) => panic!("nobody was waiting"),
    }
}

/// Re-requesting while already queued is rejected, not duplicated.
#[tokio::test]
async fn test_double_request_rejected() {
    let h = harness();

    let _ticket = h
        .orchestrator
        .request_match(alice(), water_deck(1))
        .await
        .unwrap();
    let err = h
        .orchestrator
        .request_match(alice(), water_deck(2))
        .await
        .unwrap_err();
    assert!(matches!(err, BattleError::AlreadyQueued(p) if p == alice().id));
}

/// A waiter that times out is fully withdrawn; a later caller goes
/// pending instead of battling a ghost.
#[tokio::test]
async fn test_pending_timeout_withdraws() {
    let h = harness();

    let ticket = match h
        .orchestrator
        .request_match(alice(), water_deck(1))
        .await
        .unwrap()
    {
        MatchDecision::Pending(ticket) => ticket,
        MatchDecision::Completed(_) => panic!(),
    };

    let err = ticket.wait_timeout(Duration::from_millis(5)).await;
    assert!(matches!(err, Err(BattleError::WaitTimeout)));

    match h
        .orchestrator
        .request_match(bob(), fire_deck(10))
        .await
        .unwrap()
    {
        MatchDecision::Pending(_) => {}
        MatchDecision::Completed(_) => panic!("alice should have been withdrawn"),
    }
}

/// Explicit withdraw has the same effect as a timeout.
#[tokio::test]
async fn test_withdraw_clears_waiter() {
    let h = harness();

    let _ticket = h
        .orchestrator
        .request_match(alice(), water_deck(1))
        .await
        .unwrap();
    assert!(h.orchestrator.withdraw(alice().id).await);

    match h
        .orchestrator
        .request_match(bob(), fire_deck(10))
        .await
        .unwrap()
    {
        MatchDecision::Pending(_) => {}
        MatchDecision::Completed(_) => panic!("alice should have been withdrawn"),
    }
}

/// Many players racing through the orchestrator all get results, and the
/// shared rating store records every game.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_matches() {
    let h = harness();

    let mut tasks = Vec::new();
    for i in 1..=8u32 {
        let orchestrator = Arc::clone(&h.orchestrator);
        tasks.push(tokio::spawn(async move {
            let me = Participant::new(PlayerId::new(i), format!("p{i}"));
            let deck = if i % 2 == 0 { fire_deck(i * 10) } else { water_deck(i * 10) };
            match orchestrator.request_match(me, deck).await.unwrap() {
                MatchDecision::Completed(result) => result,
                MatchDecision::Pending(ticket) => ticket.wait().await.unwrap(),
            }
        }));
    }

    let mut total_games = 0;
    for task in tasks {
        let result = task.await.unwrap();
        assert!(result.rounds >= 1);
        total_games += 1;
    }
    assert_eq!(total_games, 8);

    let mut recorded = 0;
    for i in 1..=8u32 {
        if let Some(stats) = h.ratings.stats(PlayerId::new(i)).await {
            recorded += stats.games;
        }
    }
    // Four matches, two participants each.
    assert_eq!(recorded, 8);
}
