use crate::session::DEFAULT_MAX_SESSIONS;
use blackjack_lib::{DealerRule, GameConfig};
use clap::{Parser, ValueEnum};

/// Command line flavour of `DealerRule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DealerRuleArg {
    StandOnSeventeen,
    ChasePlayer,
}

impl From<DealerRuleArg> for DealerRule {
    fn from(value: DealerRuleArg) -> Self {
        match value {
            DealerRuleArg::StandOnSeventeen => DealerRule::StandOnSeventeen,
            DealerRuleArg::ChasePlayer => DealerRule::ChasePlayer,
        }
    }
}

/// Settings for the table server. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "api", about = "Serves a blackjack table over HTTP")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "BLACKJACK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "BLACKJACK_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Decks per shoe
    #[arg(long, env = "BLACKJACK_NUM_DECKS", default_value_t = 8)]
    pub num_decks: usize,

    /// How the dealer plays out a hand
    #[arg(
        long,
        env = "BLACKJACK_DEALER_RULE",
        value_enum,
        default_value_t = DealerRuleArg::StandOnSeventeen
    )]
    pub dealer_rule: DealerRuleArg,

    /// Fixed shuffle seed, shuffles follow the wall clock when unset
    #[arg(long, env = "BLACKJACK_SEED")]
    pub seed: Option<u64>,

    /// Most sessions kept open at once, the least recently used one is closed past this
    #[arg(long, env = "BLACKJACK_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Tracing filter directives, overrides RUST_LOG
    #[arg(long, env = "BLACKJACK_LOG")]
    pub log_filter: Option<String>,
}

impl ServerConfig {
    /// The game settings every new session starts from.
    pub fn game_config(&self) -> GameConfig {
        let mut builder = GameConfig::new();
        builder
            .num_decks(self.num_decks)
            .dealer_rule(self.dealer_rule.into());
        if let Some(seed) = self.seed {
            builder.seed(seed);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_standard_table() {
        let config = ServerConfig::try_parse_from(["api"]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.game_config(), GameConfig::default());
    }

    #[test]
    fn flags_flow_into_game_config() {
        let config = ServerConfig::try_parse_from([
            "api",
            "--port",
            "9000",
            "--num-decks",
            "2",
            "--dealer-rule",
            "chase-player",
            "--seed",
            "17",
            "--max-sessions",
            "64",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_sessions, 64);

        let game_config = config.game_config();
        assert_eq!(game_config.num_decks, 2);
        assert_eq!(game_config.dealer_rule, DealerRule::ChasePlayer);
        assert_eq!(game_config.seed, Some(17));
    }

    #[test]
    fn unknown_dealer_rule_is_rejected() {
        assert!(ServerConfig::try_parse_from(["api", "--dealer-rule", "hit-soft-17"]).is_err());
    }
}
