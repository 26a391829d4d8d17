//! User repository for database operations.

use sqlx::SqlitePool;

use super::timestamp;
use crate::entities::{NewUser, User, UserRole};
use crate::types::{DatabaseError, DatabaseResult};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// The oldest admin account; used as the recipient of payment notices.
    pub async fn first_admin(&self) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'admin' ORDER BY id ASC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Inserts a user after checking both unique columns so the caller
    /// learns which one collided.
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut conn = self.pool.acquire().await?;
        insert_user(&mut *conn, new_user).await
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> DatabaseResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("User"));
        }
        Ok(())
    }

    pub async fn count_by_role(&self, role: UserRole) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Shared with the tenant repository, which creates the login account in
/// the same transaction as the tenant row.
pub(crate) async fn insert_user(
    conn: &mut sqlx::SqliteConnection,
    new_user: &NewUser,
) -> DatabaseResult<User> {
    let username_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(&new_user.username)
            .fetch_one(&mut *conn)
            .await?;
    if username_taken {
        return Err(DatabaseError::Duplicate("Username already exists".into()));
    }

    let email_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(&new_user.email)
            .fetch_one(&mut *conn)
            .await?;
    if email_taken {
        return Err(DatabaseError::Duplicate("Email already exists".into()));
    }

    let created_at = timestamp();
    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(new_user.role)
    .bind(&created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| DatabaseError::unique_violation(e, "User already exists"))?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: new_user.username.clone(),
        email: new_user.email.clone(),
        password_hash: new_user.password_hash.clone(),
        role: new_user.role,
        created_at,
    })
}
