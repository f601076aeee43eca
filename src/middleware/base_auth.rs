/// Base auth middleware
///
/// Last step before the application: gives the identity slot its default,
/// `Identity::Anonymous`, when no earlier layer filled it. An identity that
/// is already present is left alone.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::Identity;

#[derive(Clone, Copy, Debug, Default)]
pub struct BaseAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for BaseAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BaseAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(BaseAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct BaseAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BaseAuthMiddlewareService<S>
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
        let unresolved = !req.extensions().contains::<Identity>();
        if unresolved {
            req.extensions_mut().insert(Identity::Anonymous);
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpRequest, HttpResponse};

    async fn slot(req: HttpRequest) -> HttpResponse {
        let body = match req.extensions().get::<Identity>() {
            None => "empty",
            Some(Identity::Anonymous) => "anonymous",
            Some(Identity::User(_)) => "user",
        };
        HttpResponse::Ok().body(body)
    }

    #[actix_web::test]
    async fn test_empty_slot_defaults_to_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(BaseAuthMiddleware)
                .route("/", web::get().to(slot)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }
}
