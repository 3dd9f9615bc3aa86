//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{User, UserRegister};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY name")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user with a hashed password
    pub async fn create(&self, data: UserRegister) -> RepoResult<User> {
        // Check duplicate email (also enforced by the unique index)
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already in use",
                data.email
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    password_hash = $password_hash,
                    phone = $phone,
                    is_admin = $is_admin,
                    street = $street,
                    apartment = $apartment,
                    zip = $zip,
                    city = $city,
                    country = $country
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("password_hash", password_hash))
            .bind(("phone", data.phone.unwrap_or_default()))
            .bind(("is_admin", data.is_admin))
            .bind(("street", data.street))
            .bind(("apartment", data.apartment))
            .bind(("zip", data.zip))
            .bind(("city", data.city))
            .bind(("country", data.country))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = parse_id(TABLE, id)?;
        let deleted: Option<User> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }

    /// Count all users
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM user GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn register_payload(name: &str, email: &str) -> UserRegister {
        UserRegister {
            name: name.into(),
            email: email.into(),
            password: "correct horse battery".into(),
            phone: None,
            is_admin: false,
            street: None,
            apartment: None,
            zip: None,
            city: None,
            country: None,
        }
    }

    async fn repo() -> UserRepository {
        let service = DbService::new_memory().await.unwrap();
        UserRepository::new(service.db)
    }

    #[tokio::test]
    async fn register_hashes_password() {
        let repo = repo().await;
        let user = repo
            .create(register_payload("Ada", "ada@example.com"))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "correct horse battery");
        assert!(user.verify_password("correct horse battery").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let repo = repo().await;
        repo.create(register_payload("Ada", "ada@example.com"))
            .await
            .unwrap();
        let err = repo
            .create(register_payload("Second Ada", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn count_distinguishes_zero_from_failure() {
        let repo = repo().await;
        assert_eq!(repo.count().await.unwrap(), 0);
        repo.create(register_payload("Ada", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
