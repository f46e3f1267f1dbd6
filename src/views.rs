//! Server-rendered HTML fragments for the shop front.
//!
//! Everything here is render-only: callers hand in the data, the functions
//! return markup. Filter changes are plain links carrying `?category=<slug>`.

use std::fmt::Write;

use crate::models::Category;

/// What a product card needs; products are supplied by the caller.
// Only tests build cards until a product source exists.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub category: String,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_price(price: f64) -> String {
    format!("₹{:.2}", price)
}

pub fn loading_placeholder(label: &str) -> String {
    format!(
        r#"<div class="loading" role="status" aria-live="polite"><span class="spinner"></span>{}</div>"#,
        escape(label)
    )
}

pub fn category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return r#"<p class="empty">No categories yet.</p>"#.to_string();
    }

    let mut html = String::from(r#"<ul class="category-list">"#);
    for category in categories {
        let _ = write!(
            html,
            r#"<li><a href="/shop?category={slug}">{name}</a> <span class="count">({count})</span></li>"#,
            slug = escape(&category.slug),
            name = escape(&category.name),
            count = category.product_count,
        );
    }
    html.push_str("</ul>");
    html
}

/// "All" plus one link per category; the selected one is marked.
pub fn category_filter(categories: &[Category], selected: Option<&str>) -> String {
    let mut html = String::from(r#"<nav class="category-filter">"#);

    let all_class = if selected.is_none() { " selected" } else { "" };
    let _ = write!(html, r#"<a class="filter{all_class}" href="/shop">All</a>"#);

    for category in categories {
        let class = if selected == Some(category.slug.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<a class="filter{class}" href="/shop?category={slug}">{name}</a>"#,
            slug = escape(&category.slug),
            name = escape(&category.name),
        );
    }
    html.push_str("</nav>");
    html
}

pub fn product_grid(products: &[ProductSummary]) -> String {
    if products.is_empty() {
        return loading_placeholder("Loading products…");
    }

    let mut html = String::from(r#"<div class="product-grid">"#);
    for product in products {
        html.push_str(r#"<article class="product-card">"#);
        if let Some(image) = &product.image {
            let _ = write!(
                html,
                r#"<img src="{}" alt="{}">"#,
                escape(image),
                escape(&product.name)
            );
        }
        let _ = write!(
            html,
            r#"<h3>{}</h3><p class="price">{}</p></article>"#,
            escape(&product.name),
            format_price(product.price)
        );
    }
    html.push_str("</div>");
    html
}

pub fn shop_page(
    categories: &[Category],
    products: &[ProductSummary],
    selected: Option<&str>,
) -> String {
    let visible: Vec<ProductSummary> = products
        .iter()
        .filter(|p| selected.map_or(true, |slug| p.category == slug))
        .cloned()
        .collect();

    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Dhanlaxmi Saree Sadan</title></head><body>\
         <header><h1>Dhanlaxmi Saree Sadan</h1></header>\
         <main>{filter}<section class=\"categories\">{categories}</section>\
         <section class=\"products\">{products}</section></main></body></html>",
        filter = category_filter(categories, selected),
        categories = category_list(categories),
        products = product_grid(&visible),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str, slug: &str) -> Category {
        let now = Utc::now();
        Category {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            image: None,
            product_count: 3,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"Silk" & 'Zari'</b>"#), "&lt;b&gt;&quot;Silk&quot; &amp; &#39;Zari&#39;&lt;/b&gt;");
    }

    #[test]
    fn category_list_links_each_slug() {
        let html = category_list(&[category("Silk", "silk"), category("Cotton <new>", "cotton")]);
        assert!(html.contains(r#"href="/shop?category=silk""#));
        assert!(html.contains("Cotton &lt;new&gt;"));
        assert!(html.contains("(3)"));

        assert!(category_list(&[]).contains("No categories yet."));
    }

    #[test]
    fn filter_marks_selection() {
        let categories = [category("Silk", "silk"), category("Cotton", "cotton")];

        let html = category_filter(&categories, Some("cotton"));
        assert!(html.contains(r#"<a class="filter selected" href="/shop?category=cotton">"#));
        assert!(html.contains(r#"<a class="filter" href="/shop">All</a>"#));

        let html = category_filter(&categories, None);
        assert!(html.contains(r#"<a class="filter selected" href="/shop">All</a>"#));
    }

    #[test]
    fn empty_product_grid_shows_placeholder() {
        assert!(product_grid(&[]).contains(r#"class="loading""#));

        let html = product_grid(&[ProductSummary {
            name: "Banarasi".to_string(),
            price: 4999.5,
            image: Some("/img/p-1.jpg".to_string()),
            category: "silk".to_string(),
        }]);
        assert!(html.contains("₹4999.50"));
        assert!(html.contains(r#"<img src="/img/p-1.jpg" alt="Banarasi">"#));
    }

    #[test]
    fn shop_page_filters_products_by_category() {
        let products = vec![
            ProductSummary {
                name: "Banarasi".to_string(),
                price: 10.0,
                image: None,
                category: "silk".to_string(),
            },
            ProductSummary {
                name: "Tant".to_string(),
                price: 5.0,
                image: None,
                category: "cotton".to_string(),
            },
        ];
        let html = shop_page(&[category("Silk", "silk")], &products, Some("silk"));
        assert!(html.contains("Banarasi"));
        assert!(!html.contains("Tant"));
    }
}
