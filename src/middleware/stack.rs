/// Identity stack
///
/// Registers the whole identity pipeline with one `.wrap(..)`:
///
/// | step                  | requires  | provides                      |
/// |-----------------------|-----------|-------------------------------|
/// | `CookieMiddleware`    | -         | `Cookies`                     |
/// | `TokenAuthMiddleware` | `Cookies` | identity (if cookie present)  |
/// | `BaseAuthMiddleware`  | -         | `Identity::Anonymous` if unset|
///
/// The application service sits behind the last step.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::sync::Arc;

use crate::auth::TokenDecoder;
use crate::middleware::{
    BaseAuthMiddleware, BaseAuthMiddlewareService, CookieMiddleware, CookieMiddlewareService,
    TokenAuthMiddleware, TokenAuthMiddlewareService,
};
use crate::users::UserStore;

#[derive(Clone)]
pub struct TokenAuthStack {
    cookies: CookieMiddleware,
    token: TokenAuthMiddleware,
    base: BaseAuthMiddleware,
}

impl TokenAuthStack {
    pub fn new(
        decoder: TokenDecoder,
        store: Arc<dyn UserStore>,
        cookie_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            cookies: CookieMiddleware,
            token: TokenAuthMiddleware::new(Arc::new(decoder), store, cookie_name),
            base: BaseAuthMiddleware,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuthStack
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform =
        CookieMiddlewareService<TokenAuthMiddlewareService<BaseAuthMiddlewareService<S>>>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let stack = self.clone();

        // Innermost first: the application is wrapped by base auth, that by
        // token auth, and cookie extraction runs outermost.
        Box::pin(async move {
            let base = stack.base.new_transform(service).await?;
            let token = stack.token.new_transform(base).await?;
            stack.cookies.new_transform(token).await
        })
    }
}
