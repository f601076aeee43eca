/// Middleware module
///
/// The identity pipeline (cookie extraction, token identity, base auth),
/// the stack that composes it, and request logging.

mod base_auth;
mod cookie;
mod logger;
mod stack;
mod token_auth;

pub use base_auth::{BaseAuthMiddleware, BaseAuthMiddlewareService};
pub use cookie::{CookieMiddleware, CookieMiddlewareService, Cookies};
pub use logger::RequestLogger;
pub use stack::TokenAuthStack;
pub use token_auth::{TokenAuthMiddleware, TokenAuthMiddlewareService};
