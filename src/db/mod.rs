use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::models::*;

/// Tables and indexes, created on startup if missing.
///
/// `team_role` is the association index: its primary key covers team → roles
/// lookups and `idx_team_role_role_id` covers role → teams.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS teams (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name VARCHAR(128) NOT NULL UNIQUE,
           description TEXT
       )"#,
    r#"CREATE TABLE IF NOT EXISTS roles (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name VARCHAR(128) NOT NULL UNIQUE,
           description TEXT
       )"#,
    r#"CREATE TABLE IF NOT EXISTS team_role (
           team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
           role_id INTEGER NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
           PRIMARY KEY (team_id, role_id)
       )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_team_role_role_id ON team_role (role_id)"#,
];

/// Write failures the handlers need to tell apart.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::UniqueViolation,
            _ => DbError::Sqlx(err),
        }
    }
}

/// Opens a pool with foreign keys enabled on every connection.
///
/// In-memory databases live only as long as their connection, so those get a
/// single connection that is never reaped.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(*statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

// Team queries
pub async fn get_all_teams(pool: &SqlitePool) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"SELECT id, name, description FROM teams ORDER BY id"#
    )
    .fetch_all(pool)
    .await
}

pub async fn get_team_by_id(pool: &SqlitePool, team_id: i64) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"SELECT id, name, description FROM teams WHERE id = ?"#
    )
    .bind(team_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_team_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"SELECT id, name, description FROM teams WHERE name = ?"#
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

pub async fn create_team(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<Team, DbError> {
    let team = sqlx::query_as::<_, Team>(
        r#"INSERT INTO teams (name, description) VALUES (?, ?)
           RETURNING id, name, description"#
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(team)
}

/// Returns false when no team had that id.
pub async fn delete_team(pool: &SqlitePool, team_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM teams WHERE id = ?"#)
        .bind(team_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// Role queries
pub async fn get_all_roles(pool: &SqlitePool) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        r#"SELECT id, name, description FROM roles ORDER BY id"#
    )
    .fetch_all(pool)
    .await
}

pub async fn get_role_by_id(pool: &SqlitePool, role_id: i64) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        r#"SELECT id, name, description FROM roles WHERE id = ?"#
    )
    .bind(role_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_role_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        r#"SELECT id, name, description FROM roles WHERE name = ?"#
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

pub async fn create_role(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<Role, DbError> {
    let role = sqlx::query_as::<_, Role>(
        r#"INSERT INTO roles (name, description) VALUES (?, ?)
           RETURNING id, name, description"#
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(role)
}

/// Returns false when no role had that id.
pub async fn delete_role(pool: &SqlitePool, role_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM roles WHERE id = ?"#)
        .bind(role_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// Association queries

/// Links a role to a team. Linking an existing pair again is a no-op.
pub async fn assign_role(pool: &SqlitePool, team_id: i64, role_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(r#"INSERT OR IGNORE INTO team_role (team_id, role_id) VALUES (?, ?)"#)
        .bind(team_id)
        .bind(role_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_team_role_names(pool: &SqlitePool, team_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"SELECT r.name
           FROM team_role tr
           JOIN roles r ON r.id = tr.role_id
           WHERE tr.team_id = ?
           ORDER BY r.id"#
    )
    .bind(team_id)
    .fetch_all(pool)
    .await
}

pub async fn get_role_team_names(pool: &SqlitePool, role_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"SELECT t.name
           FROM team_role tr
           JOIN teams t ON t.id = tr.team_id
           WHERE tr.role_id = ?
           ORDER BY t.id"#
    )
    .bind(role_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = connect("sqlite::memory:").await.unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_and_fetch_team() {
        let pool = test_pool().await;

        let team = create_team(&pool, "Ops", Some("Operations")).await.unwrap();
        assert_eq!(team.id, 1);

        let fetched = get_team_by_id(&pool, team.id).await.unwrap().unwrap();
        assert_eq!(fetched, team);

        let by_name = get_team_by_name(&pool, "Ops").await.unwrap().unwrap();
        assert_eq!(by_name.description.as_deref(), Some("Operations"));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let pool = test_pool().await;

        create_role(&pool, "admin", None).await.unwrap();
        let err = create_role(&pool, "admin", Some("again")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation));

        let roles = get_all_roles(&pool).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].description, None);
    }

    #[tokio::test]
    async fn test_schema_init_is_repeatable() {
        let pool = test_pool().await;
        create_team(&pool, "Ops", None).await.unwrap();

        init_schema(&pool).await.unwrap();
        assert_eq!(get_all_teams(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_assign_role_is_idempotent() {
        let pool = test_pool().await;
        let team = create_team(&pool, "Ops", None).await.unwrap();
        let role = create_role(&pool, "admin", None).await.unwrap();

        assign_role(&pool, team.id, role.id).await.unwrap();
        assign_role(&pool, team.id, role.id).await.unwrap();

        assert_eq!(get_team_role_names(&pool, team.id).await.unwrap(), vec!["admin"]);
        assert_eq!(get_role_team_names(&pool, role.id).await.unwrap(), vec!["Ops"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_associations() {
        let pool = test_pool().await;
        let ops = create_team(&pool, "Ops", None).await.unwrap();
        let dev = create_team(&pool, "Dev", None).await.unwrap();
        let admin = create_role(&pool, "admin", None).await.unwrap();
        let viewer = create_role(&pool, "viewer", None).await.unwrap();

        assign_role(&pool, ops.id, admin.id).await.unwrap();
        assign_role(&pool, ops.id, viewer.id).await.unwrap();
        assign_role(&pool, dev.id, admin.id).await.unwrap();

        assert!(delete_role(&pool, admin.id).await.unwrap());
        assert_eq!(get_team_role_names(&pool, ops.id).await.unwrap(), vec!["viewer"]);
        assert!(get_team_role_names(&pool, dev.id).await.unwrap().is_empty());

        assert!(delete_team(&pool, ops.id).await.unwrap());
        assert!(get_role_team_names(&pool, viewer.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let pool = test_pool().await;
        assert!(!delete_team(&pool, 42).await.unwrap());
        assert!(!delete_role(&pool, 42).await.unwrap());
    }
}
