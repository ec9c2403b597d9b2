//! Query DTOs - Data Transfer Objects per query string

use serde::{Deserialize, Serialize};

/// GET /api/entry/status?operator=
#[derive(Serialize, Deserialize, Debug)]
pub struct StatusQuery {
    #[serde(default)]
    pub operator: Option<String>,
}
