// shop/src/web/routes.rs

use actix_web::{middleware::from_fn, web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::auth::resolve_session;
use crate::web::handlers::{auth_handlers, cart_handlers, product_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler(req: HttpRequest) -> Result<HttpResponse, AppError> {
  Err(AppError::NotFound(format!("No route for {} {}", req.method(), req.path())))
}

/// Turns an extractor failure into our JSON error shape.
fn extractor_error<E: std::fmt::Display>(err: E, app_error: AppError) -> actix_web::Error {
  tracing::debug!(error = %err, "Request extraction failed.");
  app_error.into()
}

/// Registers every route, the session middleware and the extractor error shapes.
/// Shared by `main` and the integration tests.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
      let message = format!("Invalid request body: {}", err);
      extractor_error(err, AppError::Validation(message))
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
      let message = format!("Invalid path parameter: {}", err);
      extractor_error(err, AppError::NotFound(message))
    }))
    .service(
      web::scope("")
        .wrap(from_fn(resolve_session))
        .route("/health", web::get().to(health_check_handler))
        .route("/login", web::post().to(auth_handlers::login_handler))
        .route("/logout", web::post().to(auth_handlers::logout_handler))
        // Fixed segments are registered before `/{product_id}` so they win the match.
        .service(
          web::scope("/api/products")
            .route("/add", web::post().to(product_handlers::add_product_handler))
            .route(
              "/delete/{product_id}",
              web::delete().to(product_handlers::delete_product_handler),
            )
            .route(
              "/update/{product_id}",
              web::put().to(product_handlers::update_product_handler),
            )
            .route("", web::get().to(product_handlers::list_products_handler))
            .route("/", web::get().to(product_handlers::list_products_handler))
            .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
        )
        .service(
          web::scope("/api/cart")
            .route("", web::get().to(cart_handlers::view_cart_handler))
            .route("/", web::get().to(cart_handlers::view_cart_handler))
            .route("/add/{product_id}", web::post().to(cart_handlers::add_to_cart_handler))
            .route(
              "/remove/{product_id}",
              web::delete().to(cart_handlers::remove_from_cart_handler),
            )
            .route("/checkout", web::post().to(cart_handlers::checkout_handler)),
        )
        .default_service(web::to(not_found_handler)),
    );
}
