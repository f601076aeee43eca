/// Cookie extraction middleware
///
/// First step of the identity stack: parses every `Cookie` header once and
/// stores the result as `Cookies` in the request extensions.

use actix_web::{
    cookie::Cookie,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, COOKIE},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::rc::Rc;

/// Cookies sent with a request, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies(HashMap<String, String>);

impl Cookies {
    /// Parse all `Cookie` headers.
    ///
    /// Pairs that do not parse are skipped. When a name repeats, the last
    /// value wins.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = HashMap::new();

        for value in headers.get_all(COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for pair in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                match Cookie::parse_encoded(pair.to_owned()) {
                    Ok(cookie) => {
                        cookies.insert(cookie.name().to_owned(), cookie.value().to_owned());
                    }
                    Err(e) => tracing::debug!(error = %e, "Skipping malformed cookie"),
                }
            }
        }

        Self(cookies)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CookieMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CookieMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CookieMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(CookieMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct CookieMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CookieMiddlewareService<S>
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
        let cookies = Cookies::from_headers(req.headers());
        req.extensions_mut().insert(cookies);

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
