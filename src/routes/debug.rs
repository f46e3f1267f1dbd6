use actix_web::http::header::{AUTHORIZATION, COOKIE};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::error::ApiError;

const REDACTED: &str = "[redacted]";

pub async fn debug(req: HttpRequest, config: web::Data<Config>) -> Result<HttpResponse, ApiError> {
    let mut headers = Map::new();
    for (name, value) in req.headers() {
        let shown = if *name == AUTHORIZATION || *name == COOKIE {
            REDACTED.to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        headers.insert(name.as_str().to_string(), Value::String(shown));
    }

    let info = req.connection_info();
    let url = format!("{}://{}{}", info.scheme(), info.host(), req.uri());

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "timestamp": Utc::now().to_rfc3339(),
        "environment": {
            "NODE_ENV": config.environment,
            "JWT_SECRET": !config.jwt_secret.is_empty(),
            "MONGODB_URI": config.mongodb_uri_set,
            "NEXTAUTH_URL": config.nextauth_url,
            "API_BASE_URL": config.api_base_url,
        },
        "server": {
            "hostname": config.hostname,
            "port": config.port,
            "pid": std::process::id(),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "request": {
            "url": url,
            "method": req.method().as_str(),
            "headers": headers,
        },
    })))
}
