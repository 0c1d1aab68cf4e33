//! Hand valuation and scoring.

use crate::card::{Card, Rank};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Computes the best blackjack total for `cards`. Aces start at 11 and are demoted to 1,
/// one at a time, while the total is over 21. A bust hand reports its minimum total.
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut value: u32 = 0;
    let mut aces = 0;
    for card in cards {
        if card.rank == Rank::Ace {
            aces += 1;
        }
        value += card.value() as u32;
    }

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    value
}

/// An ordered, append-only collection of cards held by the player or the dealer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Self {
        Hand {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn value(&self) -> u32 {
        hand_value(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    /// Returns true if an ace in the hand is still being counted as 11.
    pub fn is_soft(&self) -> bool {
        let hard: u32 = self
            .cards
            .iter()
            .map(|c| if c.rank == Rank::Ace { 1 } else { c.value() as u32 })
            .sum();
        self.cards.iter().any(|c| c.rank == Rank::Ace) && hard + 10 <= 21
    }

    /// A hand can be split when it holds exactly two cards of the same rank.
    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].rank == self.cards[1].rank
    }

    /// Takes both cards out of a splittable pair, leaving the hand empty.
    pub(crate) fn take_pair(&mut self) -> Option<(Card, Card)> {
        if !self.can_split() {
            return None;
        }
        let second = self.cards.pop()?;
        let first = self.cards.pop()?;
        Some((first, second))
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formatted = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{}", formatted)
    }
}

/// Normalized result of a single player hand against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// The scored result of one player hand: a sentence for the table and the normalized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandOutcome {
    pub result: &'static str,
    pub outcome: Outcome,
}

impl HandOutcome {
    fn new(result: &'static str, outcome: Outcome) -> Self {
        HandOutcome { result, outcome }
    }
}

/// Scores `player` against `dealer`. The checks are ordered and the first match decides the hand,
/// so a player bust loses even when the dealer busts too.
pub fn check_hand(player: &Hand, dealer: &Hand) -> HandOutcome {
    let player_score = player.value();
    let dealer_score = dealer.value();

    if player_score > 21 {
        HandOutcome::new("Player busts, dealer wins!", Outcome::Loss)
    } else if dealer_score > 21 {
        HandOutcome::new("Dealer busts, player wins!", Outcome::Win)
    } else if player_score == 21 {
        HandOutcome::new("Blackjack! Player wins!", Outcome::Win)
    } else if dealer_score == 21 {
        HandOutcome::new("Blackjack! Dealer wins!", Outcome::Loss)
    } else if player.len() >= 5 {
        // five card charlie, the hand is known not to be bust here
        HandOutcome::new("Player wins with 5 cards!", Outcome::Win)
    } else if player_score > dealer_score {
        HandOutcome::new("Player wins!", Outcome::Win)
    } else if dealer_score > player_score {
        HandOutcome::new("Dealer wins!", Outcome::Loss)
    } else {
        HandOutcome::new("It's a draw!", Outcome::Draw)
    }
}

/// Scores every player hand independently against the one dealer hand.
pub fn check_outcomes(hands: &[Hand], dealer: &Hand) -> Vec<HandOutcome> {
    hands.iter().map(|hand| check_hand(hand, dealer)).collect()
}

/// Legacy single-result scoring: every hand is scored but only the last one is reported.
/// Returns `None` when there are no player hands.
pub fn last_outcome(hands: &[Hand], dealer: &Hand) -> Option<HandOutcome> {
    hands.last().map(|hand| check_hand(hand, dealer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use proptest::prelude::*;

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::from_cards(ranks.iter().map(|r| Card::new(*r, Suit::Hearts)))
    }

    #[test]
    fn pair_of_aces_is_twelve() {
        assert_eq!(hand(&[Rank::Ace, Rank::Ace]).value(), 12);
    }

    #[test]
    fn ace_king_is_twenty_one() {
        assert_eq!(hand(&[Rank::Ace, Rank::King]).value(), 21);
    }

    #[test]
    fn king_queen_five_busts() {
        let h = hand(&[Rank::King, Rank::Queen, Rank::Five]);
        assert_eq!(h.value(), 25);
        assert!(h.is_bust());
    }

    #[test]
    fn four_aces_and_a_seven() {
        assert_eq!(hand(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Ace, Rank::Seven]).value(), 21);
    }

    #[test]
    fn long_bust_hand_keeps_its_full_total() {
        let h = hand(&[Rank::King; 30]);
        assert_eq!(h.value(), 300);
        assert!(h.is_bust());
    }

    #[test]
    fn soft_and_hard_totals() {
        assert!(hand(&[Rank::Ace, Rank::Six]).is_soft());
        assert!(!hand(&[Rank::Ace, Rank::Six, Rank::Ten]).is_soft());
        assert!(!hand(&[Rank::Ten, Rank::Six]).is_soft());
    }

    #[test]
    fn empty_hand_is_zero() {
        assert_eq!(Hand::new().value(), 0);
        assert_eq!(Hand::new().to_string(), "");
    }

    #[test]
    fn hand_string_has_no_trailing_separator() {
        let h = Hand::from_cards([
            Card::new(Rank::Ten, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Spades),
        ]);
        assert_eq!(h.to_string(), "10 of Hearts, A of Spades");
    }

    #[test]
    fn can_split_requires_equal_rank_pair() {
        assert!(hand(&[Rank::Eight, Rank::Eight]).can_split());
        assert!(!hand(&[Rank::King, Rank::Queen]).can_split());
        assert!(!hand(&[Rank::Eight, Rank::Eight, Rank::Two]).can_split());
        assert!(!hand(&[Rank::Eight]).can_split());
    }

    #[test]
    fn outcome_precedence() {
        use Rank::*;
        const FIVE_CARDS: &str = "Player wins with 5 cards!";
        let cases: [(&[Rank], &[Rank], Outcome, &str); 8] = [
            // player bust beats dealer bust
            (&[King, Queen, Two], &[King, Six, Nine], Outcome::Loss, "Player busts, dealer wins!"),
            (&[Ten, Two], &[King, Six, Nine], Outcome::Win, "Dealer busts, player wins!"),
            (&[Ace, King], &[Ten, Ace], Outcome::Win, "Blackjack! Player wins!"),
            (&[Ten, Nine], &[Ten, Ace], Outcome::Loss, "Blackjack! Dealer wins!"),
            (&[Two, Two, Three, Two, Four], &[Ten, Nine], Outcome::Win, FIVE_CARDS),
            (&[Ten, Nine], &[Ten, Eight], Outcome::Win, "Player wins!"),
            (&[Ten, Seven], &[Ten, Eight], Outcome::Loss, "Dealer wins!"),
            (&[Ten, Eight], &[Nine, Nine], Outcome::Draw, "It's a draw!"),
        ];

        for (player, dealer, outcome, result) in cases {
            let scored = check_hand(&hand(player), &hand(dealer));
            assert_eq!(scored.outcome, outcome, "{:?} vs {:?}", player, dealer);
            assert_eq!(scored.result, result);
        }
    }

    #[test]
    fn last_outcome_reports_only_the_final_hand() {
        let dealer = hand(&[Rank::Ten, Rank::Eight]);
        let hands = vec![hand(&[Rank::Ten, Rank::Nine]), hand(&[Rank::Ten, Rank::Six])];

        let all = check_outcomes(&hands, &dealer);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].outcome, Outcome::Win);
        assert_eq!(all[1].outcome, Outcome::Loss);

        assert_eq!(last_outcome(&hands, &dealer).map(|o| o.outcome), Some(Outcome::Loss));
        assert_eq!(last_outcome(&[], &dealer), None);
    }

    #[test]
    fn outcome_tags_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Win).unwrap(), "\"win\"");
        assert_eq!(serde_json::to_string(&Outcome::Loss).unwrap(), "\"loss\"");
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), "\"draw\"");
    }

    fn any_card() -> impl Strategy<Value = Card> {
        (0..13usize, 0..4usize).prop_map(|(r, s)| Card::new(Rank::ALL[r], Suit::ALL[s]))
    }

    proptest! {
        #[test]
        fn value_ignores_card_order(
            cards in prop::collection::vec(any_card(), 0..12),
            seed in any::<u64>(),
        ) {
            let mut shuffled = cards.clone();
            let len = shuffled.len();
            if len > 1 {
                shuffled.rotate_left((seed as usize) % len);
                shuffled.reverse();
            }
            prop_assert_eq!(hand_value(&cards), hand_value(&shuffled));
        }

        #[test]
        fn value_never_exceeds_raw_sum(cards in prop::collection::vec(any_card(), 0..12)) {
            let raw: u32 = cards.iter().map(|c| c.value() as u32).sum();
            let aces = cards.iter().filter(|c| c.rank == Rank::Ace).count() as u32;
            let value = hand_value(&cards);
            prop_assert!(value <= raw);
            // at most one demotion per ace
            prop_assert!(raw - value <= 10 * aces);
            if value > 21 {
                prop_assert_eq!(value, raw - 10 * aces);
            }
        }
    }
}
