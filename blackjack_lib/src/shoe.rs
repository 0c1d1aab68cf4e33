//! The shoe the table deals from. A shoe is made of several standard decks shuffled together,
//! cards are always taken from the front and an exhausted shoe is rebuilt and reshuffled on the
//! spot.

use crate::card::{Card, Rank, Suit};
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Number of cards in a single standard deck.
pub const DECK_SIZE: usize = 52;

lazy_static! {
    /// One unshuffled standard deck, suit by suit.
    static ref STANDARD_DECK: Vec<Card> = Suit::ALL
        .iter()
        .flat_map(|suit| Rank::ALL.iter().map(move |rank| Card::new(*rank, *suit)))
        .collect();
}

/// Struct for the multi-deck shoe used at the table.
pub struct Shoe {
    cards: VecDeque<Card>,
    num_decks: usize,
    rng: StdRng,
    reshuffles: u32,
}

impl Shoe {
    /// Associated function to build a freshly shuffled shoe of `num_decks` decks, seeded from the
    /// wall clock.
    pub fn new(num_decks: usize) -> Shoe {
        Shoe::from_rng(num_decks, StdRng::seed_from_u64(wall_clock_seed()))
    }

    /// Builds a shoe whose shuffles are fully determined by `seed`.
    pub fn with_seed(num_decks: usize, seed: u64) -> Shoe {
        Shoe::from_rng(num_decks, StdRng::seed_from_u64(seed))
    }

    /// Builds a shoe that deals `cards` in the given order first. Once those run out the shoe
    /// is rebuilt from `num_decks` decks like any other shoe.
    pub fn stacked<I: IntoIterator<Item = Card>>(num_decks: usize, cards: I) -> Shoe {
        Shoe {
            cards: cards.into_iter().collect(),
            num_decks: num_decks.max(1),
            rng: StdRng::seed_from_u64(wall_clock_seed()),
            reshuffles: 0,
        }
    }

    fn from_rng(num_decks: usize, rng: StdRng) -> Shoe {
        let mut shoe = Shoe {
            cards: VecDeque::new(),
            num_decks: num_decks.max(1),
            rng,
            reshuffles: 0,
        };
        shoe.rebuild();
        shoe
    }

    /// Replaces the contents of the shoe with `num_decks` full decks in a uniformly random order.
    fn rebuild(&mut self) {
        let mut cards = Vec::with_capacity(self.num_decks * DECK_SIZE);
        for _ in 0..self.num_decks {
            cards.extend(STANDARD_DECK.iter().copied());
        }
        cards.shuffle(&mut self.rng);
        self.cards = cards.into();
    }

    /// Removes and returns the card at the front of the shoe. An empty shoe is rebuilt and
    /// reshuffled before the draw, so this never fails. Cards still in play may come around again
    /// after a rebuild.
    pub fn draw_card(&mut self) -> Card {
        loop {
            if let Some(card) = self.cards.pop_front() {
                debug!(card = %card, remaining = self.cards.len(), "card drawn");
                return card;
            }
            info!(num_decks = self.num_decks, "shoe is empty, reshuffling");
            self.rebuild();
            self.reshuffles += 1;
        }
    }

    /// Number of cards left before the next reshuffle.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    /// Number of times the shoe ran dry and was rebuilt.
    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn fresh_shoe_holds_every_deck() {
        let shoe = Shoe::new(8);
        assert_eq!(shoe.len(), 8 * DECK_SIZE);
        assert_eq!(shoe.len(), 416);
    }

    #[test]
    fn each_draw_removes_one_card() {
        let mut shoe = Shoe::with_seed(8, 7);
        for k in 1..=100 {
            shoe.draw_card();
            assert_eq!(shoe.len(), 416 - k);
        }
    }

    #[test]
    fn shoe_contains_num_decks_copies_of_each_card() {
        let mut shoe = Shoe::with_seed(3, 11);
        let mut counts: HashMap<Card, usize> = HashMap::new();
        while !shoe.is_empty() {
            *counts.entry(shoe.draw_card()).or_default() += 1;
        }
        assert_eq!(counts.len(), DECK_SIZE);
        assert!(counts.values().all(|&n| n == 3));
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = Shoe::with_seed(2, 42);
        let mut b = Shoe::with_seed(2, 42);
        for _ in 0..104 {
            assert_eq!(a.draw_card(), b.draw_card());
        }
    }

    #[test]
    fn empty_shoe_is_rebuilt_on_draw() {
        let mut shoe = Shoe::with_seed(1, 3);
        for _ in 0..DECK_SIZE {
            shoe.draw_card();
        }
        assert!(shoe.is_empty());
        assert_eq!(shoe.reshuffles(), 0);

        shoe.draw_card();
        assert_eq!(shoe.reshuffles(), 1);
        assert_eq!(shoe.len(), DECK_SIZE - 1);
    }

    #[test]
    fn stacked_shoe_deals_in_order_then_rebuilds() {
        let stacked = vec![
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::Two, Suit::Hearts),
        ];
        let mut shoe = Shoe::stacked(1, stacked.clone());
        assert_eq!(shoe.draw_card(), stacked[0]);
        assert_eq!(shoe.draw_card(), stacked[1]);
        shoe.draw_card();
        assert_eq!(shoe.reshuffles(), 1);
        assert_eq!(shoe.len(), DECK_SIZE - 1);
    }

    #[test]
    fn zero_decks_is_treated_as_one() {
        assert_eq!(Shoe::new(0).len(), DECK_SIZE);
    }
}
