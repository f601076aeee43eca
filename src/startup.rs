use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::TokenDecoder;
use crate::configuration::AuthSettings;
use crate::middleware::{RequestLogger, TokenAuthStack};
use crate::routes::{current_identity, health_check};
use crate::users::UserStore;

pub fn run(
    listener: TcpListener,
    store: Arc<dyn UserStore>,
    auth: AuthSettings,
) -> Result<Server, std::io::Error> {
    let identity_stack = TokenAuthStack::new(
        TokenDecoder::new(&auth.secret),
        store,
        auth.cookie_name.as_str(),
    );

    let server = HttpServer::new(move || {
        App::new()
            // Identity stack (cookies -> token -> base auth), then request logging outermost
            .wrap(identity_stack.clone())
            .wrap(RequestLogger)
            .route("/health_check", web::get().to(health_check))
            .route("/me", web::get().to(current_identity))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
