use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware. Any origin may call the table, with the methods and headers the
/// browser client actually uses. Preflight requests are answered here and never reach a handler.
pub fn cors_middleware() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::HeaderName::from_static(crate::session::SESSION_HEADER),
        ])
        .max_age(3600)
}
