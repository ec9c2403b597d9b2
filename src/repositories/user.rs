//! UserRepository - Repository per la gestione degli utenti operatori

use super::{Create, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, login_key, password_hash, first_name, last_name, operator_name, created_at, updated_at";

// USER REPO
#[derive(Clone)]
pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// La chiave di login è univoca (nome normalizzato o email)
    #[instrument(skip(self))]
    pub async fn find_by_login_key(&self, login_key: &str) -> Result<Option<User>, Error> {
        debug!("Finding user by login key");
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE login_key = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(login_key)
            .fetch_optional(&self.connection_pool)
            .await?;
        Ok(user)
    }

    /// Ogni operatore ha al massimo un account
    #[instrument(skip(self))]
    pub async fn find_by_operator_name(&self, operator_name: &str) -> Result<Option<User>, Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE operator_name = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(operator_name)
            .fetch_optional(&self.connection_pool)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self, password_hash))]
    pub async fn update_password(&self, id: &str, password_hash: &str) -> Result<Option<User>, Error> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        info!("Password updated");
        self.read(&id.to_string()).await
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    #[instrument(skip(self, data), fields(login_key = %data.login_key))]
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            login_key: data.login_key.clone(),
            password_hash: data.password_hash.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            operator_name: data.operator_name.clone(),
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            r#"
            INSERT INTO users (id, login_key, password_hash, first_name, last_name, operator_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.login_key)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.operator_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.connection_pool)
        .await?;

        info!("User created with id {}", user.id);
        Ok(user)
    }
}

impl Read<User, String> for UserRepository {
    #[instrument(skip(self))]
    async fn read(&self, id: &String) -> Result<Option<User>, Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;
        Ok(user)
    }
}
