//! Matchmaking lobby.

pub mod coordinator;

pub use coordinator::{LobbyCoordinator, Pairing, WaitTicket};
