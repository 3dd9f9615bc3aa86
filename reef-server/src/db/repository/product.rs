//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record_id = parse_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Create a new product
    ///
    /// The referenced category must exist.
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation(
                "Product price must not be negative".to_string(),
            ));
        }

        let category_id = parse_id("category", &data.category)?;
        let category: Option<crate::db::models::Category> =
            self.base.db().select(category_id.clone()).await?;
        if category.is_none() {
            return Err(RepoError::Validation(format!(
                "Category {} does not exist",
                data.category
            )));
        }

        // Bind the category as a RecordId so it is stored as a record link,
        // not a string
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product SET
                    name = $name,
                    description = $description,
                    image = $image,
                    price = $price,
                    category = $category,
                    count_in_stock = $count_in_stock
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("description", data.description.unwrap_or_default()))
            .bind(("image", data.image.unwrap_or_default()))
            .bind(("price", data.price))
            .bind(("category", category_id))
            .bind(("count_in_stock", data.count_in_stock))
            .await?;

        let created: Option<Product> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(price) = data.price
            && price < Decimal::ZERO
        {
            return Err(RepoError::Validation(
                "Product price must not be negative".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct ProductUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<Decimal>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<RecordId>,
            #[serde(skip_serializing_if = "Option::is_none")]
            count_in_stock: Option<i64>,
        }

        let category = match data.category {
            Some(ref cat) => {
                let category_id = parse_id("category", cat)?;
                let existing: Option<crate::db::models::Category> =
                    self.base.db().select(category_id.clone()).await?;
                if existing.is_none() {
                    return Err(RepoError::Validation(format!(
                        "Category {} does not exist",
                        cat
                    )));
                }
                Some(category_id)
            }
            None => None,
        };

        let update_data = ProductUpdateDb {
            name: data.name,
            description: data.description,
            image: data.image,
            price: data.price,
            category,
            count_in_stock: data.count_in_stock,
        };

        let record_id = parse_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $record MERGE $data")
            .bind(("record", record_id))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_id(TABLE, id)?;
        let deleted: Option<Product> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }
}
