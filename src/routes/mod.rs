use std::sync::Arc;

use actix_web::web;

use crate::error::ApiError;
use crate::repository::{CartRepository, CategoryRepository, UserRepository, WishlistRepository};

mod auth;
mod cart;
mod categories;
mod debug;
mod health;
mod shop;
mod wishlist;

/// Malformed JSON bodies and query strings get the same `{success:false, error}` envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Registers the repositories and every route against one store.
pub fn configure<S>(store: Arc<S>) -> impl FnOnce(&mut web::ServiceConfig)
where
    S: UserRepository + CartRepository + WishlistRepository + CategoryRepository + 'static,
{
    move |cfg| {
        cfg.app_data(web::Data::from(store.clone() as Arc<dyn UserRepository>))
            .app_data(web::Data::from(store.clone() as Arc<dyn CartRepository>))
            .app_data(web::Data::from(store.clone() as Arc<dyn WishlistRepository>))
            .app_data(web::Data::from(store as Arc<dyn CategoryRepository>))
            .app_data(json_config())
            .app_data(query_config())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health::health))
                    .route("/debug", web::get().to(debug::debug))
                    .route("/auth/signup", web::post().to(auth::sign_up))
                    .route("/auth/signin", web::post().to(auth::sign_in))
                    .route("/auth/me", web::get().to(auth::me))
                    .route("/cart", web::get().to(cart::get_cart))
                    .route("/cart", web::post().to(cart::add_to_cart))
                    .route("/cart", web::delete().to(cart::clear_cart))
                    .route("/cart/{product_id}", web::put().to(cart::update_quantity))
                    .route("/cart/{product_id}", web::delete().to(cart::remove_from_cart))
                    .route("/wishlist", web::get().to(wishlist::get_wishlist))
                    .route("/wishlist", web::post().to(wishlist::add_to_wishlist))
                    .route("/wishlist/{product_id}", web::delete().to(wishlist::remove_from_wishlist))
                    .route("/categories", web::get().to(categories::list_categories))
                    .route("/categories", web::post().to(categories::create_category))
                    .route("/categories/{slug}", web::get().to(categories::get_category))
                    .route("/categories/{slug}", web::put().to(categories::update_category)),
            )
            .route("/shop", web::get().to(shop::shop));
    }
}
