use async_trait::async_trait;
use futures::stream::TryStreamExt;
use log::info;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOptions, IndexOptions, ReplaceOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::Config;
use crate::models::{Cart, Category, User, Wishlist};
use crate::repository::{
    CartRepository, CategoryRepository, RepoError, UserRepository, WishlistRepository,
};

const DUPLICATE_KEY: i32 = 11000;

pub async fn connect(config: &Config) -> Result<Database, mongodb::error::Error> {
    let client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    let client = Client::with_options(client_options)?;

    // A database named in the URI wins over MONGODB_DB.
    let db = client
        .default_database()
        .unwrap_or_else(|| client.database(&config.database));
    info!("Using MongoDB database {}", db.name());
    Ok(db)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    carts: Collection<Cart>,
    categories: Collection<Category>,
    wishlists: Collection<Wishlist>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        MongoStore {
            users: db.collection("users"),
            carts: db.collection("carts"),
            categories: db.collection("categories"),
            wishlists: db.collection("wishlists"),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let unique = |field: &str| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };

        self.users.create_index(unique("email"), None).await?;
        self.carts.create_index(unique("user_id"), None).await?;
        self.categories.create_index(unique("slug"), None).await?;
        self.wishlists.create_index(unique("user_id"), None).await?;
        info!("MongoDB indexes ensured");
        Ok(())
    }
}

fn upsert() -> ReplaceOptions {
    ReplaceOptions::builder().upsert(true).build()
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepoError> {
        match self.users.insert_one(user, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(RepoError::Duplicate("email")),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CartRepository for MongoStore {
    async fn find_cart(&self, user_id: &str) -> Result<Option<Cart>, RepoError> {
        Ok(self.carts.find_one(doc! { "user_id": user_id }, None).await?)
    }

    async fn write_cart(&self, cart: &Cart) -> Result<(), RepoError> {
        self.carts
            .replace_one(doc! { "user_id": cart.user_id.as_str() }, cart, upsert())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl WishlistRepository for MongoStore {
    async fn find_wishlist(&self, user_id: &str) -> Result<Option<Wishlist>, RepoError> {
        Ok(self.wishlists.find_one(doc! { "user_id": user_id }, None).await?)
    }

    async fn write_wishlist(&self, wishlist: &Wishlist) -> Result<(), RepoError> {
        self.wishlists
            .replace_one(doc! { "user_id": wishlist.user_id.as_str() }, wishlist, upsert())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MongoStore {
    async fn list_active_categories(&self) -> Result<Vec<Category>, RepoError> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.categories.find(doc! { "is_active": true }, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_category(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self.categories.find_one(doc! { "slug": slug }, None).await?)
    }

    async fn insert_category(&self, category: &Category) -> Result<(), RepoError> {
        match self.categories.insert_one(category, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(RepoError::Duplicate("slug")),
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_category(&self, category: &Category) -> Result<(), RepoError> {
        self.categories
            .replace_one(doc! { "slug": category.slug.as_str() }, category, None)
            .await?;
        Ok(())
    }
}
