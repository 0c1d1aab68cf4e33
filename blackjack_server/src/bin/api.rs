use actix_web::{middleware::Logger, web, App, HttpServer};
use blackjack_server::prelude::*;
use clap::Parser;
use std::time::Duration;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::parse();
    init_tracing(config.log_filter.as_deref());

    let game_config = config.game_config();
    info!(
        host = %config.host,
        port = config.port,
        num_decks = game_config.num_decks,
        dealer_rule = ?game_config.dealer_rule,
        max_sessions = config.max_sessions,
        "starting blackjack table"
    );

    let sessions: web::Data<SessionStore> = web::Data::new(SessionStore::with_max_sessions(
        game_config,
        config.max_sessions,
    ));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(Logger::new("%r %s %Dms"))
            .app_data(sessions.clone())
            .configure(configure)
    })
    .client_request_timeout(Duration::from_secs(10))
    .client_disconnect_timeout(Duration::from_secs(10))
    .keep_alive(Duration::from_secs(60))
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
