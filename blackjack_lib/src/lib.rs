//! Core of a single blackjack table: cards, the shoe, hand scoring and the game aggregate that
//! ties them together.

pub mod card;
pub mod config;
pub mod error;
pub mod game;
pub mod hand;
pub mod shoe;

pub mod prelude {
    pub use super::card::{Card, Rank, Suit};
    pub use super::config::{DealerRule, GameConfig, GameConfigBuilder};
    pub use super::error::BlackjackGameError;
    pub use super::game::{Game, Phase};
    pub use super::hand::{
        check_hand, check_outcomes, hand_value, last_outcome, Hand, HandOutcome, Outcome,
    };
    pub use super::shoe::{Shoe, DECK_SIZE};
}

pub use prelude::*;
