//! Seed iniziale delle liste controllate e import delle voci storiche

use crate::dtos::{NewEntryDTO, OptionsDTO};
use crate::entities::OptionCategory;
use crate::repositories::{EntryRepository, OptionRepository};
use crate::shift::parse_ore;
use crate::utils::date::parse_dmy;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Popola le liste dal file JSON solo se gli operatori sono ancora vuoti.
/// Restituisce il numero di valori inseriti.
#[instrument(skip(repo))]
pub async fn seed_options(repo: &OptionRepository, path: &Path) -> Result<usize, SeedError> {
    if !repo.is_empty(OptionCategory::Operators).await? {
        debug!("Operators already present, skipping seed");
        return Ok(0);
    }
    let raw = tokio::fs::read_to_string(path).await?;
    let seed: OptionsDTO = serde_json::from_str(&raw)?;

    let mut inserted = 0;
    for category in OptionCategory::ALL {
        for value in seed.get(category) {
            let value = value.trim();
            if !value.is_empty() && repo.add(category, value).await? {
                inserted += 1;
            }
        }
    }
    info!("Seeded {} option values from {}", inserted, path.display());
    Ok(inserted)
}

/// Voce del vecchio archivio `entries.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyEntry {
    id: Option<Value>,
    operator: Option<String>,
    cantiere: Option<String>,
    macchina: Option<String>,
    linea: Option<String>,
    ore: Option<Value>,
    hours: Option<Value>,
    data: Option<String>,
    data_dmy: Option<String>,
    descrizione: Option<String>,
    location: Option<String>,
}

fn legacy_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl LegacyEntry {
    /// Solo righe con id numerico, data DD/MM/YYYY valida, ore numeriche e assegnazione completa
    fn into_new_entry(self) -> Option<(i64, NewEntryDTO)> {
        let id = self.id.as_ref().and_then(legacy_id)?;
        let work_date = self.data.or(self.data_dmy).as_deref().and_then(parse_dmy)?;
        let ore = self.ore.or(self.hours).as_ref().and_then(parse_ore)?;
        let entry = NewEntryDTO {
            operator: required(self.operator)?,
            cantiere: required(self.cantiere)?,
            macchina: required(self.macchina)?,
            linea: required(self.linea)?,
            ore,
            work_date,
            descrizione: self.descrizione.unwrap_or_default(),
            location: required(self.location),
            start_location: None,
            end_location: None,
            start_time: None,
            end_time: None,
            break_minutes: None,
            transfer_minutes: None,
        };
        Some((id, entry))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Importa le voci storiche mantenendo gli id; righe non valide o già presenti vengono saltate
#[instrument(skip(repo))]
pub async fn import_legacy_entries(
    repo: &EntryRepository,
    path: &Path,
) -> Result<ImportSummary, SeedError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let rows: Vec<LegacyEntry> = serde_json::from_str(&raw)?;

    let mut summary = ImportSummary::default();
    for row in rows {
        match row.into_new_entry() {
            Some((id, entry)) if repo.import_with_id(id, &entry).await? => summary.imported += 1,
            _ => summary.skipped += 1,
        }
    }
    if summary.skipped > 0 {
        warn!("Skipped {} legacy entries", summary.skipped);
    }
    info!("Imported {} legacy entries", summary.imported);
    Ok(summary)
}
