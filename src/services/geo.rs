//! Geolocation service - Posizione stimata dall'IP del client

use crate::core::AppState;
use crate::geo::client_ip;
use axum::extract::{ConnectInfo, Json, State};
use axum::http::{Extensions, HeaderMap};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, instrument};

/// IP pubblico del client, o "unknown" (header di proxy, poi indirizzo della connessione)
pub(crate) fn request_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    let remote = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    client_ip(headers, remote)
}

#[instrument(skip(state, headers, extensions))]
pub async fn geolocation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    extensions: Extensions,
) -> Json<Value> {
    let ip = request_ip(&headers, &extensions);
    let location = state.locations.lookup_ip(&ip).await;
    debug!("Geolocation for {}: {:?}", ip, location);
    Json(json!({ "location": location }))
}
