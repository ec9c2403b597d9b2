//! EntryRepository - Repository per la gestione delle voci di lavoro

use super::{Create, Delete, Read};
use crate::dtos::{CloseEntryDTO, NewEntryDTO};
use crate::entities::Entry;
use crate::utils::date::format_dmy;
use crate::utils::text::{operator_key, search_tokens};
use chrono::{NaiveDate, Utc};
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

const ENTRY_COLUMNS: &str = "id, operator, cantiere, macchina, linea, ore, data_dmy, work_date, \
     descrizione, location, start_location, end_location, start_time, end_time, \
     break_minutes, transfer_minutes, created_at";

/// Filtri della ricerca admin, già validati.
/// Le date vanno in SQL, i filtri testuali sono applicati in memoria con
/// confronto Unicode case-insensitive (lower() di SQLite gestisce solo ASCII).
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub cantiere: Option<String>,
    pub macchina: Option<String>,
    pub linea: Option<String>,
    pub operator: Option<String>,
    pub descr_contains: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(cantiere) = &self.cantiere {
            if !contains_all_tokens(&entry.cantiere, cantiere) {
                return false;
            }
        }
        if let Some(macchina) = &self.macchina {
            if entry.macchina.to_lowercase() != macchina.to_lowercase() {
                return false;
            }
        }
        if let Some(linea) = &self.linea {
            if entry.linea.to_lowercase() != linea.to_lowercase() {
                return false;
            }
        }
        if let Some(operator) = &self.operator {
            if !contains_all_tokens(&entry.operator, operator) {
                return false;
            }
        }
        if let Some(needle) = &self.descr_contains {
            if !entry
                .descrizione
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Ogni parola cercata deve essere contenuta nel valore
fn contains_all_tokens(haystack: &str, query: &str) -> bool {
    let haystack = haystack.to_lowercase();
    search_tokens(query).iter().all(|t| haystack.contains(t.as_str()))
}

// ENTRY REPO
#[derive(Clone)]
pub struct EntryRepository {
    connection_pool: SqlitePool,
}

impl EntryRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Turno aperto più recente dell'operatore (confronto case-insensitive)
    #[instrument(skip(self))]
    pub async fn find_open_by_operator(&self, operator: &str) -> Result<Option<Entry>, Error> {
        debug!("Looking up open shift");
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries \
             WHERE operator_key = ? AND end_time IS NULL AND start_time IS NOT NULL \
             ORDER BY id DESC LIMIT 1"
        );
        let entry = sqlx::query_as::<_, Entry>(&sql)
            .bind(operator_key(operator))
            .fetch_optional(&self.connection_pool)
            .await?;
        Ok(entry)
    }

    /// Chiude un turno aperto. Restituisce `None` se la voce non esiste
    /// o è stata chiusa nel frattempo.
    #[instrument(skip(self, data), fields(entry_id = %id))]
    pub async fn close(&self, id: &i64, data: &CloseEntryDTO) -> Result<Option<Entry>, Error> {
        let result = sqlx::query(
            r#"
            UPDATE entries
            SET end_time = ?, ore = ?, break_minutes = ?, transfer_minutes = ?,
                descrizione = ?, location = ?, end_location = ?
            WHERE id = ? AND end_time IS NULL
            "#,
        )
        .bind(&data.end_time)
        .bind(data.ore)
        .bind(data.break_minutes)
        .bind(data.transfer_minutes)
        .bind(&data.descrizione)
        .bind(&data.location)
        .bind(&data.end_location)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("No open entry updated");
            return Ok(None);
        }
        info!("Shift closed");
        self.read(id).await
    }

    /// Ricerca admin ordinata per data di lavoro e id
    #[instrument(skip(self))]
    pub async fn search(&self, filter: &EntryFilter) -> Result<Vec<Entry>, Error> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE 1 = 1"));
        if let Some(from) = filter.date_from {
            qb.push(" AND work_date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            qb.push(" AND work_date <= ").push_bind(to);
        }
        qb.push(" ORDER BY work_date ASC, id ASC");

        let rows = qb
            .build_query_as::<Entry>()
            .fetch_all(&self.connection_pool)
            .await?;
        let entries: Vec<Entry> = rows.into_iter().filter(|e| filter.matches(e)).collect();
        debug!("Search returned {} entries", entries.len());
        Ok(entries)
    }

    /// Cancella tutte le voci indicate, restituisce quante sono state rimosse
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn delete_many(&self, ids: &[i64]) -> Result<u64, Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM entries WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let result = qb.build().execute(&self.connection_pool).await?;
        info!("Deleted {} entries", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Inserisce una voce storica mantenendone l'id; i duplicati vengono ignorati.
    /// Restituisce `true` se la riga è stata inserita.
    pub async fn import_with_id(&self, id: i64, data: &NewEntryDTO) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO entries (
                id, operator, operator_key, cantiere, macchina, linea, ore, data_dmy, work_date,
                descrizione, location, start_location, end_location, start_time, end_time,
                break_minutes, transfer_minutes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&data.operator)
        .bind(operator_key(&data.operator))
        .bind(&data.cantiere)
        .bind(&data.macchina)
        .bind(&data.linea)
        .bind(data.ore)
        .bind(format_dmy(data.work_date))
        .bind(data.work_date)
        .bind(&data.descrizione)
        .bind(&data.location)
        .bind(&data.start_location)
        .bind(&data.end_location)
        .bind(&data.start_time)
        .bind(&data.end_time)
        .bind(data.break_minutes)
        .bind(data.transfer_minutes)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Create<Entry, NewEntryDTO> for EntryRepository {
    #[instrument(skip(self, data), fields(operator = %data.operator))]
    async fn create(&self, data: &NewEntryDTO) -> Result<Entry, Error> {
        debug!("Inserting new entry");
        let result = sqlx::query(
            r#"
            INSERT INTO entries (
                operator, operator_key, cantiere, macchina, linea, ore, data_dmy, work_date,
                descrizione, location, start_location, end_location, start_time, end_time,
                break_minutes, transfer_minutes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.operator)
        .bind(operator_key(&data.operator))
        .bind(&data.cantiere)
        .bind(&data.macchina)
        .bind(&data.linea)
        .bind(data.ore)
        .bind(format_dmy(data.work_date))
        .bind(data.work_date)
        .bind(&data.descrizione)
        .bind(&data.location)
        .bind(&data.start_location)
        .bind(&data.end_location)
        .bind(&data.start_time)
        .bind(&data.end_time)
        .bind(data.break_minutes)
        .bind(data.transfer_minutes)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();
        info!("Entry created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Entry, i64> for EntryRepository {
    #[instrument(skip(self), fields(entry_id = %id))]
    async fn read(&self, id: &i64) -> Result<Option<Entry>, Error> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?");
        let entry = sqlx::query_as::<_, Entry>(&sql)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;
        Ok(entry)
    }
}

impl Delete<i64> for EntryRepository {
    #[instrument(skip(self), fields(entry_id = %id))]
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
