//! Battle engine: drives rounds to completion and builds the transcript.
//!
//! The loop is bounded by [`ROUND_CAP`] and stops early when a side runs
//! out of cards. The verdict is decided by total rounds won, not by which
//! deck emptied first; a side can deplete the opponent and still lose on
//! round count. That rule is deliberate and load-bearing for rating
//! updates, so it must not be "fixed".

use serde::{Deserialize, Serialize};

use crate::core::{BattleRng, MatchId, Participant, PlayerId};
use crate::error::Result;

use super::arena::{CardArena, Side};
use super::round::{self, RoundResult};

/// Maximum number of simulated rounds before a match is forcibly concluded.
pub const ROUND_CAP: u32 = 1000;

/// Final verdict of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    WinA,
    WinB,
    Draw,
}

/// Result of one completed match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Match id, also the transcript persistence key.
    pub match_id: MatchId,
    /// Side A's player.
    pub player_a: PlayerId,
    /// Side B's player.
    pub player_b: PlayerId,
    /// Final verdict, by round-win count.
    pub verdict: Verdict,
    /// Rounds side A won.
    pub wins_a: u32,
    /// Rounds side B won.
    pub wins_b: u32,
    /// Rounds actually simulated.
    pub rounds: u32,
    /// Human-readable round-by-round record.
    pub transcript: String,
}

impl MatchResult {
    /// The winning player, or `None` on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.verdict {
            Verdict::WinA => Some(self.player_a),
            Verdict::WinB => Some(self.player_b),
            Verdict::Draw => None,
        }
    }
}

/// Simulates one match between two fixed participants.
///
/// Owns its arena and RNG exclusively; nothing here suspends or touches
/// shared state. Persistence and rating updates happen in the
/// orchestrator after [`execute`](Self::execute) returns.
#[derive(Debug)]
pub struct BattleEngine {
    match_id: MatchId,
    player_a: Participant,
    player_b: Participant,
    arena: CardArena,
    rng: BattleRng,
}

impl BattleEngine {
    /// Create an engine for one match.
    #[must_use]
    pub fn new(
        match_id: MatchId,
        player_a: Participant,
        player_b: Participant,
        arena: CardArena,
        rng: BattleRng,
    ) -> Self {
        Self {
            match_id,
            player_a,
            player_b,
            arena,
            rng,
        }
    }

    /// Run the match to completion.
    ///
    /// Fails with `EmptyDeck` if either side starts without cards. A deck
    /// emptying unexpectedly mid-loop (which the loop guard should make
    /// impossible) degrades to a draw-tagged partial result instead of
    /// aborting the whole match.
    pub fn execute(mut self) -> Result<MatchResult> {
        use crate::error::BattleError;

        if self.arena.is_empty(Side::A) {
            return Err(BattleError::EmptyDeck(Side::A));
        }
        if self.arena.is_empty(Side::B) {
            return Err(BattleError::EmptyDeck(Side::B));
        }

        let mut transcript = String::new();
        let mut wins_a = 0u32;
        let mut wins_b = 0u32;
        let mut rounds = 0u32;
        let mut aborted = false;

        for round in 1..=ROUND_CAP {
            if self.arena.is_empty(Side::A) || self.arena.is_empty(Side::B) {
                break;
            }

            let outcome = match round::resolve(&mut self.arena, &mut self.rng) {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(match_id = %self.match_id, %err, "aborting battle mid-round");
                    transcript.push_str(&format!("Battle aborted in round {round}: {err}\n"));
                    aborted = true;
                    break;
                }
            };

            rounds = round;
            let card_a = self.arena.card(outcome.card_a);
            let card_b = self.arena.card(outcome.card_b);
            let name_a = &self.player_a.name;
            let name_b = &self.player_b.name;

            transcript.push_str(&format!(
                "Round {round}: {} (Damage: {}) vs {} (Damage: {})\n",
                card_a.name, outcome.damage_a, card_b.name, outcome.damage_b,
            ));
            match outcome.result {
                RoundResult::WinA => {
                    wins_a += 1;
                    transcript.push_str(&format!("Winner: {name_a}'s {}\n", card_a.name));
                    transcript.push_str(&format!(
                        "{name_b}'s {} is added to {name_a}'s deck.\n",
                        card_b.name,
                    ));
                }
                RoundResult::WinB => {
                    wins_b += 1;
                    transcript.push_str(&format!("Winner: {name_b}'s {}\n", card_b.name));
                    transcript.push_str(&format!(
                        "{name_a}'s {} is added to {name_b}'s deck.\n",
                        card_a.name,
                    ));
                }
                RoundResult::Draw => transcript.push_str("Draw\n"),
            }
            transcript.push_str(&format!(
                "Cards remaining - {name_a}: {}, {name_b}: {}\n\n",
                self.arena.count(Side::A),
                self.arena.count(Side::B),
            ));
        }

        // Verdict by rounds won, even when the loop stopped on depletion.
        let verdict = if aborted {
            Verdict::Draw
        } else if wins_a > wins_b {
            Verdict::WinA
        } else if wins_b > wins_a {
            Verdict::WinB
        } else {
            Verdict::Draw
        };

        match verdict {
            Verdict::WinA => transcript.push_str(&format!(
                "Overall Winner: {} with {wins_a} rounds won\n",
                self.player_a.name,
            )),
            Verdict::WinB => transcript.push_str(&format!(
                "Overall Winner: {} with {wins_b} rounds won\n",
                self.player_b.name,
            )),
            Verdict::Draw => transcript.push_str("Battle ended in a draw\n"),
        }

        tracing::debug!(
            match_id = %self.match_id,
            rounds,
            wins_a,
            wins_b,
            ?verdict,
            "battle finished"
        );

        Ok(MatchResult {
            match_id: self.match_id,
            player_a: self.player_a.id,
            player_b: self.player_b.id,
            verdict,
            wins_a,
            wins_b,
            rounds,
            transcript,
        })
    }
}
