//! Order Workflow
//!
//! The multi-step order domain logic:
//!
//! - [`creation`] - resolves requested line items into persisted records,
//!   aggregates the total price and persists the composite order
//! - [`lifecycle`] - status transitions and cascading deletion of owned
//!   line items
//!
//! Read-side queries (list, expansion, aggregates) live on
//! [`crate::db::repository::OrderRepository`].
//!
//! Order creation spans multiple independent writes with no surrounding
//! transaction. If the final order write fails, already-created line items
//! are removed by an explicit compensating cleanup; a crash between the
//! writes still leaves orphaned line items behind.

pub mod creation;
pub mod lifecycle;

pub use creation::create_order;
pub use lifecycle::{delete_order, update_status};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::DbService;
    use crate::db::models::{CategoryCreate, ProductCreate, UserRegister};
    use crate::db::repository::{CategoryRepository, ProductRepository, UserRepository};
    use surrealdb::Surreal;
    use surrealdb::engine::local::Db;

    /// In-memory database with one user, one category and the given
    /// (name, price) products. Returns (db, user_id, product_ids).
    pub async fn seed(products: &[(&str, &str)]) -> (Surreal<Db>, String, Vec<String>) {
        let service = DbService::new_memory().await.unwrap();
        let db = service.db;

        let user = UserRepository::new(db.clone())
            .create(UserRegister {
                name: "Test Buyer".into(),
                email: "buyer@example.com".into(),
                password: "hunter2hunter2".into(),
                phone: None,
                is_admin: false,
                street: None,
                apartment: None,
                zip: None,
                city: None,
                country: None,
            })
            .await
            .unwrap();
        let user_id = user.id.unwrap().to_string();

        let category = CategoryRepository::new(db.clone())
            .create(CategoryCreate {
                name: "Fixtures".into(),
                icon: None,
                color: None,
            })
            .await
            .unwrap();
        let category_id = category.id.unwrap().to_string();

        let product_repo = ProductRepository::new(db.clone());
        let mut product_ids = Vec::new();
        for (name, price) in products {
            let product = product_repo
                .create(ProductCreate {
                    name: (*name).into(),
                    description: None,
                    image: None,
                    price: price.parse().unwrap(),
                    category: category_id.clone(),
                    count_in_stock: 100,
                })
                .await
                .unwrap();
            product_ids.push(product.id.unwrap().to_string());
        }

        (db, user_id, product_ids)
    }

    /// Minimal valid order payload for the given items
    pub fn order_payload(
        user: &str,
        items: Vec<(String, i64)>,
    ) -> crate::db::models::OrderCreate {
        crate::db::models::OrderCreate {
            order_items: items
                .into_iter()
                .map(|(product, quantity)| crate::db::models::LineItemRequest {
                    product,
                    quantity,
                })
                .collect(),
            shipping_address1: "1 Harbour Road".into(),
            shipping_address2: None,
            city: "Porto".into(),
            zip: "4000-001".into(),
            country: "PT".into(),
            phone: "+351000000000".into(),
            status: None,
            user: user.into(),
        }
    }
}
