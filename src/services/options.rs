//! Options services - Liste controllate per i menu a tendina

use crate::core::{AppError, AppState};
use crate::dtos::{OptionMutationDTO, OptionsDTO};
use crate::entities::OptionCategory;
use axum::extract::{Json, State};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Categoria nota e valore non vuoto
fn parse_mutation(body: &OptionMutationDTO) -> Result<(OptionCategory, String), AppError> {
    let category = body
        .category
        .as_deref()
        .and_then(|c| c.trim().parse::<OptionCategory>().ok());
    let value = body
        .value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());
    match (category, value) {
        (Some(category), Some(value)) => Ok((category, value.to_string())),
        _ => Err(AppError::bad_request("Categoria o valore non valido")),
    }
}

#[instrument(skip(state))]
pub async fn list_options(State(state): State<Arc<AppState>>) -> Result<Json<OptionsDTO>, AppError> {
    Ok(Json(state.option.list().await?))
}

/// Elenco operatori per i client più vecchi
#[instrument(skip(state))]
pub async fn list_operators(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let options = state.option.list().await?;
    Ok(Json(json!({ "operators": options.operators })))
}

#[instrument(skip(state))]
pub async fn add_option(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OptionMutationDTO>,
) -> Result<Json<Value>, AppError> {
    let (category, value) = parse_mutation(&body)?;
    let created = state.option.add(category, &value).await?;
    if created {
        info!("Option {:?} added to {}", value, category);
    } else {
        info!("Option {:?} already present in {}", value, category);
    }
    let options = state.option.list().await?;
    Ok(Json(json!({ "ok": true, "options": options, "created": created })))
}

#[instrument(skip(state))]
pub async fn remove_option(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OptionMutationDTO>,
) -> Result<Json<Value>, AppError> {
    let (category, value) = parse_mutation(&body)?;
    let removed = state.option.remove(category, &value).await?;
    let options = state.option.list().await?;
    if !removed {
        warn!("Option {:?} not found in {}", value, category);
        return Err(AppError::not_found("Voce non trovata").with_field("options", options));
    }
    info!("Option {:?} removed from {}", value, category);
    Ok(Json(json!({ "ok": true, "options": options })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutation(category: &str, value: &str) -> OptionMutationDTO {
        OptionMutationDTO {
            category: Some(category.to_string()),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn mutation_accepts_any_case_category_and_trims_value() {
        let (category, value) = parse_mutation(&mutation("Macchine", "  Escavatore ")).unwrap();
        assert_eq!(category, OptionCategory::Macchine);
        assert_eq!(value, "Escavatore");
    }

    #[test]
    fn mutation_rejects_unknown_category_or_blank_value() {
        assert!(parse_mutation(&mutation("veicoli", "Furgone")).is_err());
        assert!(parse_mutation(&mutation("linee", "   ")).is_err());
        assert!(parse_mutation(&OptionMutationDTO::default()).is_err());
    }
}
