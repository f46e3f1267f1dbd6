use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::models::{Cart, CartItem};
use crate::repository::CartRepository;

#[derive(Debug, Deserialize)]
pub struct QuantityInput {
    pub quantity: i32,
}

async fn load_cart(carts: &dyn CartRepository, user_id: &str) -> Result<Cart, ApiError> {
    Ok(carts
        .find_cart(user_id)
        .await?
        .unwrap_or_else(|| Cart::new(user_id, Utc::now())))
}

fn cart_response(cart: &Cart) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "cart": cart }))
}

pub async fn get_cart(
    carts: web::Data<dyn CartRepository>,
    identity: Identity,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let cart = load_cart(carts.get_ref(), &user.user_id).await?;
    Ok(cart_response(&cart))
}

pub async fn add_to_cart(
    carts: web::Data<dyn CartRepository>,
    identity: Identity,
    item: web::Json<CartItem>,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let mut cart = load_cart(carts.get_ref(), &user.user_id).await?;
    cart.add_item(item.into_inner())?;
    let cart = carts.persist_cart(cart).await?;
    Ok(cart_response(&cart))
}

pub async fn update_quantity(
    carts: web::Data<dyn CartRepository>,
    identity: Identity,
    product_id: web::Path<String>,
    data: web::Json<QuantityInput>,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let mut cart = load_cart(carts.get_ref(), &user.user_id).await?;
    cart.set_quantity(&product_id, data.quantity)?;
    let cart = carts.persist_cart(cart).await?;
    Ok(cart_response(&cart))
}

pub async fn remove_from_cart(
    carts: web::Data<dyn CartRepository>,
    identity: Identity,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let mut cart = load_cart(carts.get_ref(), &user.user_id).await?;
    cart.remove_item(&product_id)?;
    let cart = carts.persist_cart(cart).await?;
    Ok(cart_response(&cart))
}

pub async fn clear_cart(
    carts: web::Data<dyn CartRepository>,
    identity: Identity,
) -> Result<HttpResponse, ApiError> {
    let user = identity.require_user()?;
    let mut cart = load_cart(carts.get_ref(), &user.user_id).await?;
    cart.clear();
    let cart = carts.persist_cart(cart).await?;
    Ok(cart_response(&cart))
}
