//! ShiftService - ciclo di vita dei turni per operatore
//!
//! Flusso: `start` apre una voce senza orario di fine, `status` restituisce il
//! turno aperto, `finish` lo chiude calcolando le ore. Le voci "one-shot"
//! vengono create già chiuse. Tutta la validazione avviene prima di toccare il database.

use super::ShiftError;
use super::calc::{compute_worked_time, validate_break, validate_transfer};
use crate::dtos::{CloseEntryDTO, CreateEntryDTO, FinishShiftDTO, NewEntryDTO, StartShiftDTO};
use crate::entities::Entry;
use crate::repositories::{Create, EntryRepository, Read};
use crate::utils::date::{format_hhmm, normalize_hhmm, parse_dmy, parse_hhmm, today};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Esito della chiusura di un turno
#[derive(Debug, Clone)]
pub struct FinishOutcome {
    pub entry: Entry,
    pub duration_warning: bool,
}

/// Operatore, cantiere, macchina e linea già ripuliti
struct Assignment {
    operator: String,
    cantiere: String,
    macchina: String,
    linea: String,
}

impl Assignment {
    fn from_fields(
        operator: &Option<String>,
        cantiere: &Option<String>,
        macchina: &Option<String>,
        linea: &Option<String>,
    ) -> Result<Self, ShiftError> {
        let required = |v: &Option<String>| -> Result<String, ShiftError> {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or(ShiftError::InvalidInput(
                    "Tutti i campi sono obbligatori (tranne descrizione).",
                ))
        };
        Ok(Self {
            operator: required(operator)?,
            cantiere: required(cantiere)?,
            macchina: required(macchina)?,
            linea: required(linea)?,
        })
    }
}

fn clean_optional(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Ore come numero o stringa numerica (anche con la virgola decimale)
pub(crate) fn parse_ore(value: &Value) -> Option<f64> {
    let ore = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    ore.is_finite().then_some(ore)
}

#[derive(Clone)]
pub struct ShiftService {
    entries: EntryRepository,
}

impl ShiftService {
    pub fn new(entries: EntryRepository) -> Self {
        Self { entries }
    }

    /// Apre un turno per l'operatore. Fallisce con `Conflict` se ne esiste già uno aperto.
    #[instrument(skip(self, req), fields(operator = ?req.operator))]
    pub async fn start(&self, req: &StartShiftDTO) -> Result<Entry, ShiftError> {
        let assignment = Assignment::from_fields(&req.operator, &req.cantiere, &req.macchina, &req.linea)?;
        let start_time = req
            .start_time
            .as_deref()
            .and_then(normalize_hhmm)
            .ok_or(ShiftError::InvalidInput("Orario di inizio non valido (usa HH:MM)."))?;

        if let Some(open) = self.entries.find_open_by_operator(&assignment.operator).await? {
            warn!("Operator already has open entry {}", open.id);
            return Err(ShiftError::Conflict(Box::new(open)));
        }

        let location = clean_optional(&req.location);
        let new_entry = NewEntryDTO {
            operator: assignment.operator,
            cantiere: assignment.cantiere,
            macchina: assignment.macchina,
            linea: assignment.linea,
            ore: 0.0,
            work_date: today(),
            descrizione: clean_optional(&req.descrizione).unwrap_or_default(),
            location: location.clone(),
            start_location: location,
            end_location: None,
            start_time: Some(start_time),
            end_time: None,
            break_minutes: None,
            transfer_minutes: None,
        };

        match self.entries.create(&new_entry).await {
            Ok(entry) => {
                info!("Shift {} started at {:?}", entry.id, entry.start_time);
                Ok(entry)
            }
            // due richieste concorrenti: l'indice univoco lascia passare solo la prima
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!("Concurrent start rejected by unique open-shift index");
                match self.entries.find_open_by_operator(&new_entry.operator).await? {
                    Some(open) => Err(ShiftError::Conflict(Box::new(open))),
                    None => Err(ShiftError::Database(sqlx::Error::Database(db_err))),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Turno aperto più recente dell'operatore, se esiste
    #[instrument(skip(self))]
    pub async fn status(&self, operator: &str) -> Result<Option<Entry>, ShiftError> {
        let operator = operator.trim();
        if operator.is_empty() {
            return Ok(None);
        }
        Ok(self.entries.find_open_by_operator(operator).await?)
    }

    /// Chiude il turno `entryId`. Con `acting_as` la voce deve appartenere a quell'operatore.
    #[instrument(skip(self, req), fields(entry_id = ?req.entry_id))]
    pub async fn finish(
        &self,
        req: &FinishShiftDTO,
        acting_as: Option<&str>,
    ) -> Result<FinishOutcome, ShiftError> {
        let entry_id = req
            .entry_id
            .ok_or(ShiftError::InvalidInput("ID della voce mancante."))?;
        let end_minutes = req
            .end_time
            .as_deref()
            .and_then(parse_hhmm)
            .ok_or(ShiftError::InvalidInput("Orario di fine non valido (usa HH:MM)."))?;
        let break_minutes = validate_break(
            req.break_minutes
                .ok_or(ShiftError::InvalidInput("Seleziona la durata della pausa."))?,
        )?;
        let transfer_minutes = validate_transfer(req.transfer_minutes.unwrap_or(0))?;

        let entry = self.entries.read(&entry_id).await?.ok_or(ShiftError::NotFound)?;
        if let Some(operator) = acting_as {
            if !entry.belongs_to(operator) {
                return Err(ShiftError::NotOwner);
            }
        }
        if !entry.is_open() {
            return Err(ShiftError::InvalidState("Il turno è già stato chiuso."));
        }
        let start_minutes = entry
            .start_time
            .as_deref()
            .and_then(parse_hhmm)
            .ok_or(ShiftError::InvalidState("La voce non ha un orario di inizio."))?;

        let worked = compute_worked_time(start_minutes, end_minutes, break_minutes, transfer_minutes)?;
        if worked.duration_warning {
            warn!("Shift {} lasted 24h or more, hours recorded as 0", entry.id);
        }
        debug!("Worked {} of {} minutes", worked.worked_minutes, worked.elapsed_minutes);

        let end_location = clean_optional(&req.location);
        let close = CloseEntryDTO {
            end_time: format_hhmm(end_minutes),
            ore: worked.ore,
            break_minutes: i64::from(break_minutes),
            transfer_minutes: i64::from(transfer_minutes),
            descrizione: clean_optional(&req.descrizione).unwrap_or(entry.descrizione.clone()),
            location: entry.location.clone().or_else(|| end_location.clone()),
            end_location,
        };

        let closed = self
            .entries
            .close(&entry.id, &close)
            .await?
            .ok_or(ShiftError::InvalidState("Il turno è già stato chiuso."))?;

        Ok(FinishOutcome {
            entry: closed,
            duration_warning: worked.duration_warning,
        })
    }

    /// Crea una voce già chiusa: variante a orari oppure variante con ore esplicite.
    #[instrument(skip(self, req), fields(operator = ?req.operator))]
    pub async fn create_one_shot(&self, req: &CreateEntryDTO) -> Result<FinishOutcome, ShiftError> {
        let assignment = Assignment::from_fields(&req.operator, &req.cantiere, &req.macchina, &req.linea)?;
        let work_date = match req.data.as_deref() {
            Some(d) if !d.trim().is_empty() => Some(
                parse_dmy(d).ok_or(ShiftError::InvalidInput("Formato data non valido (usa DD/MM/YYYY)."))?,
            ),
            _ => None,
        };

        if req.start_time.is_some() || req.end_time.is_some() {
            self.create_timed(assignment, req, work_date.unwrap_or_else(today)).await
        } else {
            let ore = req.ore.as_ref().ok_or(ShiftError::InvalidInput(
                "Tutti i campi sono obbligatori (tranne descrizione).",
            ))?;
            let ore = parse_ore(ore).ok_or(ShiftError::InvalidInput("Ore deve essere un numero."))?;
            if ore <= 0.0 {
                return Err(ShiftError::InvalidInput("Ore deve essere maggiore di zero."));
            }
            let work_date = work_date.ok_or(ShiftError::InvalidInput(
                "Tutti i campi sono obbligatori (tranne descrizione).",
            ))?;
            self.create_direct(assignment, req, ore, work_date).await
        }
    }

    async fn create_timed(
        &self,
        assignment: Assignment,
        req: &CreateEntryDTO,
        work_date: NaiveDate,
    ) -> Result<FinishOutcome, ShiftError> {
        let start_minutes = req
            .start_time
            .as_deref()
            .and_then(parse_hhmm)
            .ok_or(ShiftError::InvalidInput("Orario di inizio non valido (usa HH:MM)."))?;
        let end_minutes = req
            .end_time
            .as_deref()
            .and_then(parse_hhmm)
            .ok_or(ShiftError::InvalidInput("Orario di fine non valido (usa HH:MM)."))?;
        let break_minutes = validate_break(
            req.break_minutes
                .ok_or(ShiftError::InvalidInput("Seleziona la durata della pausa."))?,
        )?;
        let transfer_minutes = validate_transfer(req.transfer_minutes.unwrap_or(0))?;
        let worked = compute_worked_time(start_minutes, end_minutes, break_minutes, transfer_minutes)?;

        let location = clean_optional(&req.location);
        let new_entry = NewEntryDTO {
            operator: assignment.operator,
            cantiere: assignment.cantiere,
            macchina: assignment.macchina,
            linea: assignment.linea,
            ore: worked.ore,
            work_date,
            descrizione: clean_optional(&req.descrizione).unwrap_or_default(),
            location: location.clone(),
            start_location: location,
            end_location: None,
            start_time: Some(format_hhmm(start_minutes)),
            end_time: Some(format_hhmm(end_minutes)),
            break_minutes: Some(i64::from(break_minutes)),
            transfer_minutes: Some(i64::from(transfer_minutes)),
        };
        let entry = self.entries.create(&new_entry).await?;
        info!("One-shot entry {} created with {} hours", entry.id, entry.ore);
        Ok(FinishOutcome {
            entry,
            duration_warning: worked.duration_warning,
        })
    }

    async fn create_direct(
        &self,
        assignment: Assignment,
        req: &CreateEntryDTO,
        ore: f64,
        work_date: NaiveDate,
    ) -> Result<FinishOutcome, ShiftError> {
        let new_entry = NewEntryDTO {
            operator: assignment.operator,
            cantiere: assignment.cantiere,
            macchina: assignment.macchina,
            linea: assignment.linea,
            ore,
            work_date,
            descrizione: clean_optional(&req.descrizione).unwrap_or_default(),
            location: clean_optional(&req.location),
            start_location: None,
            end_location: None,
            start_time: None,
            end_time: None,
            break_minutes: None,
            transfer_minutes: None,
        };
        let entry = self.entries.create(&new_entry).await?;
        info!("Direct-hours entry {} created", entry.id);
        Ok(FinishOutcome {
            entry,
            duration_warning: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ore_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_ore(&json!(7.5)), Some(7.5));
        assert_eq!(parse_ore(&json!("6")), Some(6.0));
        assert_eq!(parse_ore(&json!("6,5")), Some(6.5));
        assert_eq!(parse_ore(&json!("otto")), None);
        assert_eq!(parse_ore(&json!(null)), None);
    }

    #[test]
    fn assignment_requires_all_fields() {
        let some = |s: &str| Some(s.to_string());
        assert!(Assignment::from_fields(&some("A"), &some("B"), &some("C"), &some("D")).is_ok());
        assert!(matches!(
            Assignment::from_fields(&some("A"), &some("  "), &some("C"), &some("D")),
            Err(ShiftError::InvalidInput(_))
        ));
        assert!(Assignment::from_fields(&None, &some("B"), &some("C"), &some("D")).is_err());
    }
}
