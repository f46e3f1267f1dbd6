use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::models::{normalize_slug, Category, CategoryInput, Role};
use crate::repository::CategoryRepository;

pub async fn list_categories(
    categories: web::Data<dyn CategoryRepository>,
) -> Result<HttpResponse, ApiError> {
    let categories = categories.list_active_categories().await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "categories": categories })))
}

pub async fn get_category(
    categories: web::Data<dyn CategoryRepository>,
    identity: Identity,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let is_admin = matches!(&identity, Identity::Authenticated(p) if p.role == Role::Admin);

    // Inactive categories are hidden from everyone but admins.
    match categories.find_category(&normalize_slug(&slug)).await? {
        Some(category) if category.is_active || is_admin => {
            Ok(HttpResponse::Ok().json(json!({ "success": true, "category": category })))
        }
        _ => Err(ApiError::NotFound("Category not found".to_string())),
    }
}

pub async fn create_category(
    categories: web::Data<dyn CategoryRepository>,
    identity: Identity,
    data: web::Json<CategoryInput>,
) -> Result<HttpResponse, ApiError> {
    identity.require_admin()?;

    let now = Utc::now();
    let mut category = Category::new(data.into_inner(), now);
    category.prepare_for_save(now)?;
    categories.insert_category(&category).await?;
    info!("Created category {}", category.slug);

    Ok(HttpResponse::Created().json(json!({ "success": true, "category": category })))
}

pub async fn update_category(
    categories: web::Data<dyn CategoryRepository>,
    identity: Identity,
    slug: web::Path<String>,
    data: web::Json<CategoryInput>,
) -> Result<HttpResponse, ApiError> {
    identity.require_admin()?;

    let mut category = categories
        .find_category(&normalize_slug(&slug))
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
    category.apply(data.into_inner());
    category.prepare_for_save(Utc::now())?;
    categories.replace_category(&category).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "category": category })))
}
