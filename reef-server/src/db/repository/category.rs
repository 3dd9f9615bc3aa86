//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let record_id = parse_id(TABLE, id)?;
        let category: Option<Category> = self.base.db().select(record_id).await?;
        Ok(category)
    }

    /// Find category by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        // Check duplicate name
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        let category = Category {
            id: None,
            name: data.name,
            icon: data.icon,
            color: data.color,
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                new_name
            )));
        }

        let record_id = parse_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $record MERGE $data")
            .bind(("record", record_id))
            .bind(("data", data))
            .await?;

        // Fetch the updated record
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Hard delete a category
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_id(TABLE, id)?;

        // Check if category has products
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE category = $cat GROUP ALL")
            .bind(("cat", record_id.clone()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;

        if count.unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Cannot delete category with products".to_string(),
            ));
        }

        let deleted: Option<Category> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> CategoryRepository {
        let service = DbService::new_memory().await.unwrap();
        CategoryRepository::new(service.db)
    }

    #[tokio::test]
    async fn create_and_find() {
        let repo = repo().await;
        let created = repo
            .create(CategoryCreate {
                name: "Electronics".into(),
                icon: Some("chip".into()),
                color: Some("#00AAFF".into()),
            })
            .await
            .unwrap();

        let id = created.id.as_ref().unwrap().to_string();
        let found = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.name, "Electronics");
        assert_eq!(found.color.as_deref(), Some("#00AAFF"));
    }

    #[tokio::test]
    async fn duplicate_name_rejected() {
        let repo = repo().await;
        repo.create(CategoryCreate {
            name: "Books".into(),
            icon: None,
            color: None,
        })
        .await
        .unwrap();

        let err = repo
            .create(CategoryCreate {
                name: "Books".into(),
                icon: None,
                color: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let repo = repo().await;
        let created = repo
            .create(CategoryCreate {
                name: "Garden".into(),
                icon: Some("leaf".into()),
                color: None,
            })
            .await
            .unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let updated = repo
            .update(
                &id,
                CategoryUpdate {
                    name: None,
                    icon: None,
                    color: Some("#22CC88".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Garden");
        assert_eq!(updated.icon.as_deref(), Some("leaf"));
        assert_eq!(updated.color.as_deref(), Some("#22CC88"));
    }
}
