use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::config::Config;
use crate::error::ApiError;

pub async fn health(config: web::Data<Config>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "API is healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": config.environment,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
