use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::models::{Wishlist, WishlistItemInput};
use crate::repository::WishlistRepository;

async fn load_wishlist(
    wishlists: &dyn WishlistRepository,
    user_id: &str,
) -> Result<Wishlist, ApiError> {
    Ok(wishlists
        .find_wishlist(user_id)
        .await?
        .unwrap_or_else(|| Wishlist::new(user_id, Utc::now())))
}

pub async fn get_wishlist(
    wishlists: web::Data<dyn WishlistRepository>,
    identity: Identity,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let wishlist = load_wishlist(wishlists.get_ref(), &user.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "wishlist": wishlist })))
}

pub async fn add_to_wishlist(
    wishlists: web::Data<dyn WishlistRepository>,
    identity: Identity,
    item: web::Json<WishlistItemInput>,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let mut wishlist = load_wishlist(wishlists.get_ref(), &user.user_id).await?;

    if !wishlist.add_item(item.into_inner(), Utc::now())? {
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Product already in wishlist",
            "wishlist": wishlist,
        })));
    }

    let wishlist = wishlists.persist_wishlist(wishlist).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Product added to wishlist",
        "wishlist": wishlist,
    })))
}

pub async fn remove_from_wishlist(
    wishlists: web::Data<dyn WishlistRepository>,
    identity: Identity,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let mut wishlist = load_wishlist(wishlists.get_ref(), &user.user_id).await?;
    wishlist.remove_item(&product_id)?;
    let wishlist = wishlists.persist_wishlist(wishlist).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "wishlist": wishlist })))
}
