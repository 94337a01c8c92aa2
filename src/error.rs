//! Unified error types surfaced by the battle core.
//!
//! Validation failures (`InvalidDeck`, `NoDeckConfigured`, `AlreadyQueued`)
//! are rejected synchronously at the boundary and never enter matchmaking.
//! Faults inside a running simulation degrade to a safe partial result
//! instead of propagating; persistence failures are logged and never
//! withhold an already-computed result.

use thiserror::Error;

use crate::battle::Side;
use crate::core::PlayerId;

pub type Result<T> = std::result::Result<T, BattleError>;

#[derive(Debug, Error)]
pub enum BattleError {
    /// Caller supplied an empty deck; rejected before lobby entry.
    #[error("deck for {0} is empty")]
    InvalidDeck(PlayerId),

    /// The deck store has no deck for the player.
    #[error("no deck configured for {0}")]
    NoDeckConfigured(PlayerId),

    /// A battle side has no cards to draw from.
    #[error("side {0} has no cards to draw from")]
    EmptyDeck(Side),

    /// The player is already waiting in the lobby queue.
    #[error("{0} is already waiting in the lobby")]
    AlreadyQueued(PlayerId),

    /// A player was paired with themself. This is a coordinator bug,
    /// never a user-facing condition.
    #[error("{0} was paired with themself")]
    SelfMatch(PlayerId),

    /// The pairing or result channel closed before an opponent arrived.
    #[error("lobby closed before an opponent arrived")]
    LobbyClosed,

    /// The caller-supplied wait deadline elapsed; the lobby entry was
    /// removed.
    #[error("timed out waiting for an opponent")]
    WaitTimeout,

    /// Rating store failure.
    #[error("rating store failure: {0}")]
    Store(String),

    /// Transcript sink failure.
    #[error("transcript sink failure: {0}")]
    Transcript(String),
}
