use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::normalize_slug;
use crate::repository::CategoryRepository;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

pub async fn shop(
    categories: web::Data<dyn CategoryRepository>,
    query: web::Query<ShopQuery>,
) -> Result<HttpResponse, ApiError> {
    let categories = categories.list_active_categories().await?;

    // Unknown or inactive slugs fall back to "All".
    let selected = query
        .category
        .as_deref()
        .map(normalize_slug)
        .filter(|slug| categories.iter().any(|c| &c.slug == slug));

    // No product source yet; the grid renders its loading placeholder.
    let html = views::shop_page(&categories, &[], selected.as_deref());
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use chrono::Utc;
    use serde_json::Value;

    use crate::models::Category;
    use crate::routes::test_support::{test_app, Harness};

    fn category(name: &str, slug: &str, is_active: bool) -> Category {
        let now = Utc::now();
        Category {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            image: None,
            product_count: 0,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_web::test]
    async fn shop_page_renders_active_categories() {
        let harness = Harness::new();
        harness.store.categories.lock().unwrap().extend([
            category("Silk", "silk", true),
            category("Hidden", "hidden", false),
        ]);
        let app = test_app!(harness);

        let req = test::TestRequest::get().uri("/shop?category=SILK").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains(r#"<a class="filter selected" href="/shop?category=silk">Silk</a>"#));
        assert!(!body.contains("Hidden"));
        assert!(body.contains(r#"class="loading""#));

        let req = test::TestRequest::get().uri("/shop?category=hidden").to_request();
        let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert!(body.contains(r#"<a class="filter selected" href="/shop">All</a>"#));
    }

    #[actix_web::test]
    async fn malformed_query_gets_error_envelope() {
        let harness = Harness::new();
        let app = test_app!(harness);

        let req = test::TestRequest::get()
            .uri("/shop?category=silk&category=cotton")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}
