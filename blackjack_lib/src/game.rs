//! The game aggregate: one shoe, the player's hands and bet, the dealer's hand and the round phase.

use crate::card::Card;
use crate::config::{DealerRule, GameConfig};
use crate::error::BlackjackGameError;
use crate::hand::{check_outcomes, last_outcome, Hand, HandOutcome};
use crate::shoe::Shoe;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the table is in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    NotStarted,
    InRound,
    RoundOver,
}

/// The player's side of the table. There is always at least one hand, more only after a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    hands: Vec<Hand>,
    bet: i64,
}

impl PlayerState {
    fn new() -> Self {
        PlayerState {
            hands: vec![Hand::new()],
            bet: 0,
        }
    }

    fn all_bust(&self) -> bool {
        self.hands.iter().all(Hand::is_bust)
    }
}

/// Struct for a single blackjack table. All mutation goes through `&mut self`, callers share a
/// `Game` by putting it behind a lock.
pub struct Game {
    shoe: Shoe,
    player: PlayerState,
    dealer: Hand,
    phase: Phase,
    dealer_played: bool,
    config: GameConfig,
}

impl Game {
    /// Associated function to build a table with a freshly shuffled shoe.
    pub fn new(config: GameConfig) -> Game {
        let shoe = match config.seed {
            Some(seed) => Shoe::with_seed(config.num_decks, seed),
            None => Shoe::new(config.num_decks),
        };
        Game::with_shoe(config, shoe)
    }

    /// Builds a table around an existing shoe.
    pub fn with_shoe(config: GameConfig, shoe: Shoe) -> Game {
        Game {
            shoe,
            player: PlayerState::new(),
            dealer: Hand::new(),
            phase: Phase::NotStarted,
            dealer_played: false,
            config,
        }
    }

    /// Resets both sides of the table and deals two cards each, alternating player and dealer.
    /// Allowed in any phase, an unfinished round is simply abandoned.
    pub fn start_game(&mut self) {
        self.player = PlayerState::new();
        self.dealer = Hand::new();
        self.dealer_played = false;

        for _ in 0..2 {
            let card = self.shoe.draw_card();
            self.player.hands[0].receive_card(card);
            let card = self.shoe.draw_card();
            self.dealer.receive_card(card);
        }

        self.phase = Phase::InRound;
        info!(
            player = self.player.hands[0].value(),
            dealer_up = %self.dealer.cards()[0],
            cards_remaining = self.shoe.len(),
            "round started"
        );
    }

    fn ensure_in_round(&self) -> Result<(), BlackjackGameError> {
        if self.phase == Phase::InRound {
            Ok(())
        } else {
            Err(BlackjackGameError::RoundNotInProgress)
        }
    }

    /// Ends the round once there is no live hand left for the dealer to play against.
    fn end_round_if_all_bust(&mut self) {
        if self.player.all_bust() {
            debug!("every player hand is bust, round over");
            self.phase = Phase::RoundOver;
        }
    }

    /// Deals one card to the hand at `hand_idx`. An index with no hand is ignored.
    pub fn player_hit(&mut self, hand_idx: usize) -> Result<(), BlackjackGameError> {
        self.ensure_in_round()?;
        if hand_idx >= self.player.hands.len() {
            debug!(hand_idx, "hit on a missing hand ignored");
            return Ok(());
        }

        let card = self.shoe.draw_card();
        self.player.hands[hand_idx].receive_card(card);
        debug!(hand_idx, value = self.player.hands[hand_idx].value(), "player hit");
        self.end_round_if_all_bust();
        Ok(())
    }

    /// Adds `bet_amount` to the bet and deals one card to the hand at `hand_idx`.
    /// Nothing stops the caller from hitting the same hand afterwards.
    pub fn double_down(
        &mut self,
        hand_idx: usize,
        bet_amount: i64,
    ) -> Result<(), BlackjackGameError> {
        self.ensure_in_round()?;
        if hand_idx >= self.player.hands.len() {
            debug!(hand_idx, "double down on a missing hand ignored");
            return Ok(());
        }

        let card = self.shoe.draw_card();
        self.player.hands[hand_idx].receive_card(card);
        self.player.bet += bet_amount;
        debug!(
            hand_idx,
            bet = self.player.bet,
            value = self.player.hands[hand_idx].value(),
            "player doubled down"
        );
        self.end_round_if_all_bust();
        Ok(())
    }

    /// Splits the pair at `hand_idx` into two hands. The first card stays in place and the second
    /// starts a new hand at the end of the list, each receiving a fresh card. Returns whether a
    /// split happened.
    pub fn split(&mut self, hand_idx: usize) -> Result<bool, BlackjackGameError> {
        self.ensure_in_round()?;
        let pair = self.player.hands.get_mut(hand_idx).and_then(Hand::take_pair);
        let Some((first, second)) = pair else {
            debug!(hand_idx, "split ignored, not a pair");
            return Ok(false);
        };

        let first_draw = self.shoe.draw_card();
        self.player.hands[hand_idx] = Hand::from_cards([first, first_draw]);
        let second_draw = self.shoe.draw_card();
        self.player.hands.push(Hand::from_cards([second, second_draw]));

        debug!(hand_idx, hands = self.player.hands.len(), "player split");
        Ok(true)
    }

    /// The player stands, the dealer plays out per the configured rule and the round is over.
    /// A round that ended because every hand busted can still be stood on once, so the dealer's
    /// hand gets played out and shown.
    pub fn player_stand(&mut self) -> Result<(), BlackjackGameError> {
        let after_bust = self.phase == Phase::RoundOver && !self.dealer_played;
        if !after_bust {
            self.ensure_in_round()?;
        }

        match self.config.dealer_rule {
            DealerRule::StandOnSeventeen => {
                while self.dealer.value() < 17 {
                    let card = self.shoe.draw_card();
                    self.dealer.receive_card(card);
                }
            }
            DealerRule::ChasePlayer => {
                let target = self.player.hands.iter().map(Hand::value).max().unwrap_or(0);
                let mut dealer_value = self.dealer.value();
                while dealer_value < 17 || dealer_value <= target {
                    let card = self.shoe.draw_card();
                    self.dealer.receive_card(card);
                    // checks the total from before this card
                    if dealer_value > 21 {
                        break;
                    }
                    dealer_value = self.dealer.value();
                }
            }
        }

        self.phase = Phase::RoundOver;
        self.dealer_played = true;
        info!(dealer = self.dealer.value(), cards = self.dealer.len(), "dealer finished");
        Ok(())
    }

    pub fn calculate_hand_value(&self, hand: &Hand) -> u32 {
        hand.value()
    }

    /// Scores the player's hands against the dealer and reports only the last one.
    pub fn check_outcome(&self) -> Option<HandOutcome> {
        last_outcome(&self.player.hands, &self.dealer)
    }

    /// Scores every player hand against the dealer.
    pub fn check_outcomes(&self) -> Vec<HandOutcome> {
        check_outcomes(&self.player.hands, &self.dealer)
    }

    pub fn player_hands(&self) -> &[Hand] {
        &self.player.hands
    }

    pub fn player_hand(&self, hand_idx: usize) -> Option<&Hand> {
        self.player.hands.get(hand_idx)
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    /// The dealer's face up card, `None` before the first deal.
    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer.cards().first().copied()
    }

    pub fn bet(&self) -> i64 {
        self.player.bet
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn cards_remaining(&self) -> usize {
        self.shoe.len()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(GameConfig::default())
    }
}
