//! # User Repository
//!
//! Minimal employee records: enough identity to attribute orders and
//! address sales reports. Authentication flows live in the embedding
//! application, not here.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use libris_core::{NewUser, User, UserId};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new employee and grants the default `employee` role.
    ///
    /// Both inserts run in one transaction: a user without the role link
    /// would be invisible to [`Self::find_all_employees`], so neither row
    /// commits without the other.
    pub async fn insert(&self, user: &NewUser) -> DbResult<User> {
        debug!(username = %user.username, "Inserting user");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
        )
        .bind(&user.username)
        .bind(&user.password)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();

        let linked = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT ?1, id FROM roles WHERE role = 'employee'
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // Dropping the transaction without commit rolls the user row back.
        if linked.rows_affected() == 0 {
            return Err(DbError::IntegrityViolation {
                message: "role 'employee' is not seeded".to_string(),
            });
        }

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Looks up one user by id.
    pub async fn find_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks up one user by username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Whether a username is already taken.
    pub async fn exists_by_username(&self, username: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// All users holding the `employee` role, sorted by username.
    pub async fn find_all_employees(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.password
            FROM users u
            JOIN user_roles ur ON ur.user_id = u.id
            JOIN roles r ON r.id = ur.role_id
            WHERE r.role = 'employee'
            ORDER BY u.username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Deletes every user row. Test fixtures only.
    pub async fn remove_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_repo() -> UserRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().users()
    }

    fn clerk(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repo = test_repo().await;

        let user = repo.insert(&clerk("alice")).await.unwrap();
        assert!(user.id > 0);
        assert_eq!(user.username, "alice");

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found, user);

        assert!(repo.exists_by_username("alice").await.unwrap());
        assert!(!repo.exists_by_username("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = test_repo().await;

        repo.insert(&clerk("alice")).await.unwrap();
        let err = repo.insert(&clerk("alice")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_rolls_back_without_employee_role() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        sqlx::query("DELETE FROM roles")
            .execute(db.pool())
            .await
            .unwrap();

        let err = repo.insert(&clerk("alice")).await.unwrap_err();
        assert!(matches!(err, DbError::IntegrityViolation { .. }));

        // The user row was rolled back along with the failed role link.
        assert!(!repo.exists_by_username("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_new_users_are_employees() {
        let repo = test_repo().await;

        repo.insert(&clerk("zoe")).await.unwrap();
        repo.insert(&clerk("alice")).await.unwrap();

        let employees = repo.find_all_employees().await.unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].username, "alice");
        assert_eq!(employees[1].username, "zoe");
    }
}
