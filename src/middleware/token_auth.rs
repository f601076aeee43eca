/// Token identity middleware
///
/// Resolves the credential cookie to a user and stores the result in the
/// request's identity slot before calling the inner service.
///
/// Requires `Cookies` in the request extensions (see `CookieMiddleware`).
/// A request without the credential cookie passes through untouched. A
/// cookie that fails to decode aborts the request; the inner service is not
/// called.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::{Identity, TokenDecoder};
use crate::error::AppError;
use crate::middleware::Cookies;
use crate::users::UserStore;

#[derive(Clone)]
pub struct TokenAuthMiddleware {
    decoder: Arc<TokenDecoder>,
    store: Arc<dyn UserStore>,
    cookie_name: Arc<str>,
}

impl TokenAuthMiddleware {
    pub fn new(
        decoder: Arc<TokenDecoder>,
        store: Arc<dyn UserStore>,
        cookie_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            decoder,
            store,
            cookie_name: cookie_name.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(TokenAuthMiddlewareService {
            service: Rc::new(service),
            inner: self.clone(),
        }))
    }
}

pub struct TokenAuthMiddlewareService<S> {
    service: Rc<S>,
    inner: TokenAuthMiddleware,
}

impl<S, B> Service<ServiceRequest> for TokenAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let TokenAuthMiddleware {
            decoder,
            store,
            cookie_name,
        } = self.inner.clone();

        Box::pin(async move {
            let token = {
                let extensions = req.extensions();
                let cookies = extensions.get::<Cookies>().ok_or_else(|| {
                    AppError::Internal(
                        "token authentication ran before cookie extraction".to_string(),
                    )
                })?;
                cookies.get(&cookie_name).map(str::to_owned)
            };

            if let Some(token) = token {
                let claims = decoder.decode(&token).map_err(AppError::from)?;

                let identity = match store.find_by_id(claims.user_id).await? {
                    Some(user) => {
                        tracing::debug!(user_id = user.id, "Credential cookie resolved");
                        Identity::User(user)
                    }
                    None => {
                        tracing::info!(
                            user_id = claims.user_id,
                            "Credential refers to unknown user, continuing as anonymous"
                        );
                        Identity::Anonymous
                    }
                };

                req.extensions_mut().insert(identity);
            }

            service.call(req).await
        })
    }
}
