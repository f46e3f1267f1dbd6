use actix_web::{web, HttpResponse};
use argon2::{self, Config as ArgonConfig};
use chrono::Utc;
use log::{error, info};
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::models::{normalize_email, PublicUser, Role, SignInInput, SignUpInput, User};
use crate::repository::UserRepository;
use crate::token::{SessionPayload, TokenService};

fn issue_for(tokens: &TokenService, user: &User) -> Result<String, ApiError> {
    tokens
        .issue(&SessionPayload {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
        })
        .map_err(|e| {
            error!("Failed to encode token: {}", e);
            ApiError::Internal("Failed to issue session token".to_string())
        })
}

pub async fn sign_up(
    users: web::Data<dyn UserRepository>,
    tokens: web::Data<TokenService>,
    new_user: web::Json<SignUpInput>,
) -> Result<HttpResponse, ApiError> {
    new_user.validate()?;
    let email = normalize_email(&new_user.email);

    if users.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("An account with this email already exists".to_string()));
    }

    let salt: [u8; 16] = rand::thread_rng().gen();
    let config = ArgonConfig::default();
    let hashed_password = argon2::hash_encoded(new_user.password.as_bytes(), &salt, &config)
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal("Failed to create account".to_string())
        })?;

    let now = Utc::now();
    let account = User {
        id: Uuid::new_v4().to_string(),
        name: new_user.name.trim().to_string(),
        email,
        password: hashed_password,
        role: Role::User,
        created_at: now,
        updated_at: now,
    };
    users.insert_user(&account).await?;
    info!("Created account {}", account.id);

    let token = issue_for(&tokens, &account)?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "token": token,
        "user": PublicUser::from(&account),
    })))
}

pub async fn sign_in(
    users: web::Data<dyn UserRepository>,
    tokens: web::Data<TokenService>,
    data: web::Json<SignInInput>,
) -> Result<HttpResponse, ApiError> {
    let user = users
        .find_user_by_email(&normalize_email(&data.email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !argon2::verify_encoded(&user.password, data.password.as_bytes()).unwrap_or(false) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = issue_for(&tokens, &user)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "token": token,
        "user": PublicUser::from(&user),
    })))
}

pub async fn me(identity: Identity) -> Result<HttpResponse, ApiError> {
    let session = identity.require_user()?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": session,
    })))
}
