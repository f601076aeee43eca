use actix_web::HttpResponse;

/// GET /health_check
///
/// Served behind the identity stack like every other route, so a rejected
/// credential cookie fails here too.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
