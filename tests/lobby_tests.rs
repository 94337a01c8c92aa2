//! Lobby coordinator concurrency tests.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tcg_arena::{BattleError, LobbyCoordinator, Pairing, PlayerId};

/// A waiter suspended on its ticket is resumed by a later entrant, and
/// both ends see the other's id exactly once.
#[tokio::test]
async fn test_cross_task_pairing() {
    let lobby = LobbyCoordinator::new();
    let p1 = PlayerId::new(1);
    let p2 = PlayerId::new(2);

    let waiter = {
        let lobby = lobby.clone();
        tokio::spawn(async move {
            match lobby.enter(p1).await.unwrap() {
                Pairing::Waiting(ticket) => ticket.wait().await.unwrap(),
                Pairing::Matched(opponent) => opponent,
            }
        })
    };

    // Give the waiter a chance to enqueue first.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let opponent_of_p2 = match lobby.enter(p2).await.unwrap() {
        Pairing::Matched(opponent) => opponent,
        Pairing::Waiting(_) => panic!("p1 should have been waiting"),
    };

    assert_eq!(opponent_of_p2, p1);
    assert_eq!(waiter.await.unwrap(), p2);
}

/// Eight players racing into the lobby form four clean pairs: every
/// player is someone's opponent exactly once and never their own.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_entrants_pair_exactly() {
    let lobby = LobbyCoordinator::new();

    let mut tasks = Vec::new();
    for i in 1..=8u32 {
        let lobby = lobby.clone();
        tasks.push(tokio::spawn(async move {
            let me = PlayerId::new(i);
            let opponent = match lobby.enter(me).await.unwrap() {
                Pairing::Matched(opponent) => opponent,
                Pairing::Waiting(ticket) => ticket.wait().await.unwrap(),
            };
            (me, opponent)
        }));
    }

    let mut partner: FxHashMap<PlayerId, PlayerId> = FxHashMap::default();
    for task in tasks {
        let (me, opponent) = task.await.unwrap();
        assert_ne!(me, opponent, "self-match");
        assert!(partner.insert(me, opponent).is_none(), "duplicate pairing");
    }

    // Pairing must be a fixed-point-free involution.
    for (&me, &opponent) in &partner {
        assert_eq!(partner[&opponent], me);
    }
    assert_eq!(lobby.waiting().await, 0);
}

/// An odd entrant is left waiting after everyone else pairs off.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_odd_entrant_stays_queued() {
    let lobby = LobbyCoordinator::new();

    let mut tasks = Vec::new();
    for i in 1..=5u32 {
        let lobby = lobby.clone();
        tasks.push(tokio::spawn(async move {
            match lobby.enter(PlayerId::new(i)).await.unwrap() {
                Pairing::Matched(_) => None,
                Pairing::Waiting(ticket) => Some(ticket),
            }
        }));
    }

    let mut tickets = Vec::new();
    for task in tasks {
        if let Some(ticket) = task.await.unwrap() {
            tickets.push(ticket);
        }
    }

    // Two pairs resolved; exactly one player is still queued.
    assert_eq!(lobby.waiting().await, 1);

    // A sixth entrant picks up the leftover, and the leftover's ticket
    // resolves to the sixth entrant.
    let p6 = PlayerId::new(6);
    let leftover = match lobby.enter(p6).await.unwrap() {
        Pairing::Matched(opponent) => opponent,
        Pairing::Waiting(_) => panic!("someone was waiting"),
    };
    let ticket = tickets
        .into_iter()
        .find(|t| t.player() == leftover)
        .expect("leftover player kept its ticket");
    assert_eq!(ticket.wait().await.unwrap(), p6);
}

/// Timed-out waiters leave no trace: the queue drains and later entrants
/// are not paired against ghosts.
#[tokio::test]
async fn test_timeout_then_fresh_queue() {
    let lobby = LobbyCoordinator::new();

    let ticket = match lobby.enter(PlayerId::new(1)).await.unwrap() {
        Pairing::Waiting(ticket) => ticket,
        Pairing::Matched(_) => panic!(),
    };
    let err = ticket.wait_timeout(Duration::from_millis(5)).await;
    assert!(matches!(err, Err(BattleError::WaitTimeout)));

    match lobby.enter(PlayerId::new(2)).await.unwrap() {
        Pairing::Waiting(_) => {}
        Pairing::Matched(ghost) => panic!("matched ghost {ghost}"),
    }
}
