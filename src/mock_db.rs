use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{Cart, Category, User, Wishlist};
use crate::repository::{
    CartRepository, CategoryRepository, RepoError, UserRepository, WishlistRepository,
};

/// In-memory stand-in for `MongoStore`.
#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<HashMap<String, User>>,
    pub carts: Mutex<HashMap<String, Cart>>,
    pub wishlists: Mutex<HashMap<String, Wishlist>>,
    pub categories: Mutex<Vec<Category>>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.email) {
            return Err(RepoError::Duplicate("email"));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn find_cart(&self, user_id: &str) -> Result<Option<Cart>, RepoError> {
        Ok(self.carts.lock().unwrap().get(user_id).cloned())
    }

    async fn write_cart(&self, cart: &Cart) -> Result<(), RepoError> {
        self.carts
            .lock()
            .unwrap()
            .insert(cart.user_id.clone(), cart.clone());
        Ok(())
    }
}

#[async_trait]
impl WishlistRepository for MemoryStore {
    async fn find_wishlist(&self, user_id: &str) -> Result<Option<Wishlist>, RepoError> {
        Ok(self.wishlists.lock().unwrap().get(user_id).cloned())
    }

    async fn write_wishlist(&self, wishlist: &Wishlist) -> Result<(), RepoError> {
        self.wishlists
            .lock()
            .unwrap()
            .insert(wishlist.user_id.clone(), wishlist.clone());
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list_active_categories(&self) -> Result<Vec<Category>, RepoError> {
        let mut active: Vec<Category> = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    async fn find_category(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn insert_category(&self, category: &Category) -> Result<(), RepoError> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.slug == category.slug) {
            return Err(RepoError::Duplicate("slug"));
        }
        categories.push(category.clone());
        Ok(())
    }

    async fn replace_category(&self, category: &Category) -> Result<(), RepoError> {
        let mut categories = self.categories.lock().unwrap();
        if let Some(existing) = categories.iter_mut().find(|c| c.slug == category.slug) {
            *existing = category.clone();
        }
        Ok(())
    }
}
