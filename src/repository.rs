use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::models::{Cart, Category, User, ValidationError, Wishlist};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} already exists")]
    Duplicate(&'static str),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn insert_user(&self, user: &User) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_cart(&self, user_id: &str) -> Result<Option<Cart>, RepoError>;

    /// Raw upsert keyed by `user_id`. Use `persist_cart` instead.
    async fn write_cart(&self, cart: &Cart) -> Result<(), RepoError>;

    /// The only cart write path: recomputes the total before storing.
    async fn persist_cart(&self, mut cart: Cart) -> Result<Cart, RepoError> {
        cart.prepare_for_save(Utc::now())?;
        self.write_cart(&cart).await?;
        Ok(cart)
    }
}

#[async_trait]
pub trait WishlistRepository: Send + Sync {
    async fn find_wishlist(&self, user_id: &str) -> Result<Option<Wishlist>, RepoError>;

    async fn write_wishlist(&self, wishlist: &Wishlist) -> Result<(), RepoError>;

    async fn persist_wishlist(&self, mut wishlist: Wishlist) -> Result<Wishlist, RepoError> {
        wishlist.prepare_for_save(Utc::now())?;
        self.write_wishlist(&wishlist).await?;
        Ok(wishlist)
    }
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Active categories only, sorted by name.
    async fn list_active_categories(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_category(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Fails with `RepoError::Duplicate` when the slug is taken.
    async fn insert_category(&self, category: &Category) -> Result<(), RepoError>;

    async fn replace_category(&self, category: &Category) -> Result<(), RepoError>;
}
