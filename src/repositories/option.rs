//! OptionRepository - Repository per le liste controllate (operatori, cantieri, macchine, linee)

use crate::dtos::OptionsDTO;
use crate::entities::OptionCategory;
use crate::utils::text::sort_dedup;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct OptionRepository {
    connection_pool: SqlitePool,
}

impl OptionRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Tutte le liste, deduplicate e ordinate ignorando maiuscole e accenti
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<OptionsDTO, Error> {
        let rows = sqlx::query_as::<_, (OptionCategory, String)>(
            "SELECT category, value FROM option_categories ORDER BY id",
        )
        .fetch_all(&self.connection_pool)
        .await?;

        let mut raw = OptionsDTO::default();
        for (category, value) in rows {
            raw.get_mut(category).push(value);
        }
        let mut options = OptionsDTO::default();
        for category in OptionCategory::ALL {
            *options.get_mut(category) = sort_dedup(raw.get(category).clone());
        }
        debug!(
            "Loaded options: {} operators, {} cantieri, {} macchine, {} linee",
            options.operators.len(),
            options.cantieri.len(),
            options.macchine.len(),
            options.linee.len()
        );
        Ok(options)
    }

    pub async fn values(&self, category: OptionCategory) -> Result<Vec<String>, Error> {
        let values = sqlx::query_scalar::<_, String>(
            "SELECT value FROM option_categories WHERE category = ? ORDER BY id",
        )
        .bind(category)
        .fetch_all(&self.connection_pool)
        .await?;
        Ok(values)
    }

    /// Valore già presente nella categoria, con la grafia salvata (confronto case-insensitive)
    pub async fn find_equivalent(
        &self,
        category: OptionCategory,
        value: &str,
    ) -> Result<Option<String>, Error> {
        let needle = value.trim().to_lowercase();
        Ok(self
            .values(category)
            .await?
            .into_iter()
            .find(|v| v.trim().to_lowercase() == needle))
    }

    /// Inserisce il valore se non esiste già un equivalente.
    /// Restituisce `true` se è stato creato.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn add(&self, category: OptionCategory, value: &str) -> Result<bool, Error> {
        let value = value.trim();
        if self.find_equivalent(category, value).await?.is_some() {
            debug!("Option already present");
            return Ok(false);
        }
        let result = sqlx::query("INSERT OR IGNORE INTO option_categories (category, value) VALUES (?, ?)")
            .bind(category)
            .bind(value)
            .execute(&self.connection_pool)
            .await?;
        let created = result.rows_affected() > 0;
        if created {
            info!("Option added");
        }
        Ok(created)
    }

    /// Rimuove ogni grafia equivalente del valore. Restituisce `false` se non c'era.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn remove(&self, category: OptionCategory, value: &str) -> Result<bool, Error> {
        let needle = value.trim().to_lowercase();
        let matching: Vec<String> = self
            .values(category)
            .await?
            .into_iter()
            .filter(|v| v.trim().to_lowercase() == needle)
            .collect();
        if matching.is_empty() {
            return Ok(false);
        }
        for stored in &matching {
            sqlx::query("DELETE FROM option_categories WHERE category = ? AND value = ?")
                .bind(category)
                .bind(stored)
                .execute(&self.connection_pool)
                .await?;
        }
        info!("Option removed");
        Ok(true)
    }

    pub async fn is_empty(&self, category: OptionCategory) -> Result<bool, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM option_categories WHERE category = ?",
        )
        .bind(category)
        .fetch_one(&self.connection_pool)
        .await?;
        Ok(count == 0)
    }
}
