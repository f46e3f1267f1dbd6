use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("price must be a non-negative number")]
    InvalidPrice,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("cart total is out of range")]
    InvalidTotal,

    #[error("product_count cannot be negative")]
    NegativeProductCount,

    #[error("slug may only contain lowercase letters, digits and hyphens")]
    InvalidSlug,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("item {0} is not in the list")]
    ItemNotFound(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ if email.is_empty() => Err(ValidationError::Required("email")),
        _ => Err(ValidationError::InvalidEmail),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartItem {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_id.trim().is_empty() {
            return Err(ValidationError::Required("product_id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice);
        }
        if self.quantity < 1 {
            return Err(ValidationError::InvalidQuantity);
        }
        Ok(())
    }
}

/// Sum of price × quantity over the given items.
pub fn recompute_total(items: &[CartItem]) -> f64 {
    items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Cart {
            user_id: user_id.to_string(),
            items: Vec::new(),
            total_amount: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a line item, merging the quantity into an existing line for the
    /// same product and refreshing its name/price/image snapshot.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), ValidationError> {
        item.validate()?;
        match self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                existing.name = item.name;
                existing.price = item.price;
                if item.image.is_some() {
                    existing.image = item.image;
                }
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    pub fn set_quantity(&mut self, product_id: &str, quantity: i32) -> Result<(), ValidationError> {
        if quantity < 1 {
            return Err(ValidationError::InvalidQuantity);
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| ValidationError::ItemNotFound(product_id.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), ValidationError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before {
            return Err(ValidationError::ItemNotFound(product_id.to_string()));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::Required("user_id"));
        }
        self.items.iter().try_for_each(CartItem::validate)
    }

    /// Must run before every write: validates and derives `total_amount`
    /// from the items as they are now.
    pub fn prepare_for_save(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.validate()?;
        let total = recompute_total(&self.items);
        if !total.is_finite() {
            return Err(ValidationError::InvalidTotal);
        }
        self.total_amount = total;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub product_count: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub product_count: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

/// "Silk Sarees" -> "silk-sarees"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

impl Category {
    pub fn new(input: CategoryInput, now: DateTime<Utc>) -> Self {
        let slug = match input.slug.as_deref() {
            Some(s) if !s.trim().is_empty() => normalize_slug(s),
            _ => slugify(&input.name),
        };
        Category {
            name: input.name.trim().to_string(),
            slug,
            description: input.description,
            image: input.image,
            product_count: input.product_count,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update; the slug is the document key and stays unchanged.
    pub fn apply(&mut self, input: CategoryInput) {
        self.name = input.name.trim().to_string();
        self.description = input.description;
        self.image = input.image;
        self.product_count = input.product_count;
        self.is_active = input.is_active;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if self.slug.is_empty() {
            return Err(ValidationError::Required("slug"));
        }
        if !self
            .slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::InvalidSlug);
        }
        if self.product_count < 0 {
            return Err(ValidationError::NegativeProductCount);
        }
        Ok(())
    }

    pub fn prepare_for_save(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.slug = normalize_slug(&self.slug);
        self.validate()?;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct WishlistItemInput {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    pub user_id: String,
    pub items: Vec<WishlistItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wishlist {
    pub fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Wishlist {
            user_id: user_id.to_string(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Returns false when the product was already present.
    pub fn add_item(
        &mut self,
        input: WishlistItemInput,
        now: DateTime<Utc>,
    ) -> Result<bool, ValidationError> {
        if input.product_id.trim().is_empty() {
            return Err(ValidationError::Required("product_id"));
        }
        if input.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(ValidationError::InvalidPrice);
        }
        if self.contains(&input.product_id) {
            return Ok(false);
        }
        self.items.push(WishlistItem {
            product_id: input.product_id,
            name: input.name,
            price: input.price,
            image: input.image,
            added_at: now,
        });
        Ok(true)
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), ValidationError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before {
            return Err(ValidationError::ItemNotFound(product_id.to_string()));
        }
        Ok(())
    }

    pub fn prepare_for_save(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::Required("user_id"));
        }
        self.updated_at = now;
        Ok(())
    }
}
