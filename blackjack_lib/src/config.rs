use serde::{Deserialize, Serialize};

/// How the dealer plays out a hand once the player stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealerRule {
    /// Draw while the dealer total is below 17.
    #[default]
    StandOnSeventeen,
    /// Draw until the dealer total is at least 17 and beats the player's best total.
    /// The bust check inside the loop reads the total from before the latest card,
    /// so a busted dealer can take one extra card.
    ChasePlayer,
}

/// Struct for configuring a `Game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub num_decks: usize,
    pub dealer_rule: DealerRule,
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Associated method for returning a new `GameConfigBuilder`, every option left unset falls
    /// back to the standard table.
    pub fn new() -> GameConfigBuilder {
        GameConfigBuilder {
            num_decks: None,
            dealer_rule: None,
            seed: None,
        }
    }
}

impl Default for GameConfig {
    /// Eight decks, dealer stands on 17, wall-clock shuffles.
    fn default() -> Self {
        GameConfig::new().build()
    }
}

/// Struct to implement builder pattern for `GameConfig`
#[derive(Debug, Clone, Copy)]
pub struct GameConfigBuilder {
    num_decks: Option<usize>,
    dealer_rule: Option<DealerRule>,
    seed: Option<u64>,
}

impl GameConfigBuilder {
    /// Method for choosing the number of decks in the shoe. Zero is bumped to one.
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    pub fn dealer_rule(&mut self, rule: DealerRule) -> &mut Self {
        self.dealer_rule = Some(rule);
        self
    }

    /// Method for fixing the shuffle seed, useful for reproducing a sequence of deals.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(&mut self) -> GameConfig {
        GameConfig {
            num_decks: self.num_decks.unwrap_or(8).max(1),
            dealer_rule: self.dealer_rule.unwrap_or_default(),
            seed: self.seed,
        }
    }
}
