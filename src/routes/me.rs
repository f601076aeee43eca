use actix_web::HttpResponse;
use serde::Serialize;

use crate::auth::Identity;
use crate::users::User;

#[derive(Serialize)]
pub struct IdentityResponse<'a> {
    pub authenticated: bool,
    pub user: Option<&'a User>,
}

/// GET /me
///
/// Reports the identity the request was resolved to.
pub async fn current_identity(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(IdentityResponse {
        authenticated: identity.is_authenticated(),
        user: identity.user(),
    })
}
