use crate::error::UserError;
use crate::session::{SessionId, SessionStore};
use actix_web::{http::Method, web, FromRequest, Handler, HttpResponse, Resource, Responder};
use blackjack_lib::{Card, Game, GameConfig, Hand, HandOutcome, Outcome, Phase, DECK_SIZE};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Message sent back when a new round has been dealt.
pub const START_MESSAGE: &str = "Game started. Cards dealt.";

/// Body of a double down request. A missing amount doubles for nothing.
#[derive(Debug, Deserialize)]
struct DoubleDownRequest {
    #[serde(default)]
    amount: i64,
}

/// Scoring attached to a response once a round is decided. `result` and `outcome` describe
/// the last player hand only, `outcomes` has one entry per hand.
#[derive(Serialize)]
struct Scored {
    result: &'static str,
    outcome: Outcome,
    outcomes: Vec<HandOutcome>,
}

impl Scored {
    fn from_game(game: &Game) -> Option<Scored> {
        game.check_outcome().map(|last| Scored {
            result: last.result,
            outcome: last.outcome,
            outcomes: game.check_outcomes(),
        })
    }
}

#[derive(Serialize)]
struct StartResponse {
    message: &'static str,
    player: String,
    dealer: String,
}

#[derive(Serialize)]
struct PlayerResponse {
    player: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bet: Option<i64>,
    #[serde(flatten)]
    scored: Option<Scored>,
}

#[derive(Serialize)]
struct StandResponse {
    dealer: String,
    #[serde(flatten)]
    scored: Option<Scored>,
}

#[derive(Serialize)]
struct SplitResponse {
    player: String,
    split: bool,
    hands: Vec<String>,
}

#[derive(Serialize)]
struct PlayerHandResponse {
    hand: Vec<Card>,
}

/// A hand as shown on the table view.
#[derive(Serialize)]
struct HandView {
    cards: Vec<Card>,
    display: String,
    value: u32,
}

impl HandView {
    fn new(hand: &Hand) -> Self {
        HandView {
            cards: hand.cards().to_vec(),
            display: hand.to_string(),
            value: hand.value(),
        }
    }
}

#[derive(Serialize)]
struct TableView {
    phase: Phase,
    hands: Vec<HandView>,
    dealer: HandView,
    bet: i64,
    cards_remaining: usize,
}

impl TableView {
    /// The dealer's hole card stays hidden while the round is live.
    fn from_game(game: &Game) -> Self {
        let dealer = match game.phase() {
            Phase::InRound => HandView::new(&Hand::from_cards(game.dealer_up_card())),
            _ => HandView::new(game.dealer_hand()),
        };
        TableView {
            phase: game.phase(),
            hands: game.player_hands().iter().map(HandView::new).collect(),
            dealer,
            bet: game.bet(),
            cards_remaining: game.cards_remaining(),
        }
    }

    /// What a fresh table built from `config` looks like before the first deal.
    fn undealt(config: &GameConfig) -> Self {
        TableView {
            phase: Phase::NotStarted,
            hands: vec![HandView::new(&Hand::new())],
            dealer: HandView::new(&Hand::new()),
            bet: 0,
            cards_remaining: config.num_decks * DECK_SIZE,
        }
    }
}

/// Locks the session's table. A poisoned lock means a handler panicked mid-mutation.
fn lock_game(game: &Mutex<Game>) -> Result<MutexGuard<'_, Game>, UserError> {
    game.lock().map_err(|_| UserError::InternalError)
}

fn first_hand(game: &Game) -> String {
    game.player_hand(0).map(Hand::to_string).unwrap_or_default()
}

/// Response after the player took a card on the first hand, scored if that hand busted.
fn player_response(game: &Game, bet: Option<i64>) -> PlayerResponse {
    let busted = game
        .player_hand(0)
        .map(|hand| game.calculate_hand_value(hand) > 21)
        .unwrap_or(false);
    PlayerResponse {
        player: first_hand(game),
        bet,
        scored: if busted { Scored::from_game(game) } else { None },
    }
}

/// A handler that resets the session's table and deals a new round. Only the dealer's first card
/// is shown.
async fn start_game(
    session: SessionId,
    store: web::Data<SessionStore>,
) -> Result<HttpResponse, UserError> {
    let table = store.game(&session)?;
    let mut game = lock_game(&table)?;
    game.start_game();

    Ok(HttpResponse::Ok().json(StartResponse {
        message: START_MESSAGE,
        player: first_hand(&game),
        dealer: game.dealer_up_card().map(|c| c.to_string()).unwrap_or_default(),
    }))
}

/// A handler that deals a card to the first hand.
async fn hit(
    session: SessionId,
    store: web::Data<SessionStore>,
) -> Result<HttpResponse, UserError> {
    let table = store.game(&session)?;
    let mut game = lock_game(&table)?;
    game.player_hit(0)?;
    debug!(session = %session.as_str(), "hit");

    Ok(HttpResponse::Ok().json(player_response(&game, None)))
}

/// A handler that lets the dealer play out and scores the round.
async fn stand(
    session: SessionId,
    store: web::Data<SessionStore>,
) -> Result<HttpResponse, UserError> {
    let table = store.game(&session)?;
    let mut game = lock_game(&table)?;
    game.player_stand()?;

    Ok(HttpResponse::Ok().json(StandResponse {
        dealer: game.dealer_hand().to_string(),
        scored: Scored::from_game(&game),
    }))
}

/// A handler that adds the requested amount to the bet and deals one card to the first hand.
async fn double_down(
    session: SessionId,
    store: web::Data<SessionStore>,
    body: web::Json<DoubleDownRequest>,
) -> Result<HttpResponse, UserError> {
    let table = store.game(&session)?;
    let mut game = lock_game(&table)?;
    game.double_down(0, body.amount)?;

    Ok(HttpResponse::Ok().json(player_response(&game, Some(game.bet()))))
}

/// A handler that splits the first hand when it is a pair.
async fn split(
    session: SessionId,
    store: web::Data<SessionStore>,
) -> Result<HttpResponse, UserError> {
    let table = store.game(&session)?;
    let mut game = lock_game(&table)?;
    let split = game.split(0)?;

    Ok(HttpResponse::Ok().json(SplitResponse {
        player: first_hand(&game),
        split,
        hands: game.player_hands().iter().map(Hand::to_string).collect(),
    }))
}

/// A handler that returns the cards of the first hand. A session without a table has no cards.
async fn player_hand(
    session: SessionId,
    store: web::Data<SessionStore>,
) -> Result<HttpResponse, UserError> {
    let hand = match store.existing(&session)? {
        Some(table) => {
            let game = lock_game(&table)?;
            game.player_hand(0)
                .map(|hand| hand.cards().to_vec())
                .unwrap_or_default()
        }
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(PlayerHandResponse { hand }))
}

/// A handler that returns the whole table as the player is allowed to see it. A session
/// without a table sees an undealt one.
async fn table_state(
    session: SessionId,
    store: web::Data<SessionStore>,
) -> Result<HttpResponse, UserError> {
    let view = match store.existing(&session)? {
        Some(table) => {
            let game = lock_game(&table)?;
            TableView::from_game(&game)
        }
        None => TableView::undealt(store.config()),
    };

    Ok(HttpResponse::Ok().json(view))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

/// Bare OPTIONS requests are answered without touching the table.
async fn options() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// A resource that runs `handler` for any method except OPTIONS.
fn table_resource<F, Args>(path: &str, handler: F) -> Resource
where
    F: Handler<Args>,
    Args: FromRequest + 'static,
    F::Output: Responder + 'static,
{
    web::resource(path)
        .route(web::method(Method::OPTIONS).to(options))
        .to(handler)
}

/// Maps a body that cannot be read as a double down request to a 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            debug!(error = %err, "rejected request body");
            UserError::BadInput("Invalid request body".to_string()).into()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(table_resource("/start-game", start_game))
        .service(table_resource("/hit", hit))
        .service(table_resource("/stand", stand))
        .service(table_resource("/double-down", double_down))
        .service(table_resource("/split", split))
        .service(table_resource("/player-hand", player_hand))
        .service(table_resource("/state", table_state))
        .route("/health", web::get().to(health));
}
