//! User DTOs - Data Transfer Objects per autenticazione e profilo

use crate::entities::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login admin con credenziali condivise
#[derive(Deserialize, Debug)]
pub struct AdminLoginDTO {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterDTO {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Il reset richiede gli stessi campi della registrazione
pub type ResetPasswordDTO = RegisterDTO;

/// Login operatore: nome e cognome, oppure email per gli account storici
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserDTO {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// DTO per creare un nuovo utente (id e timestamp assegnati dal repository)
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub login_key: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub operator_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDTO {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub operator_name: String,
}

impl From<User> for UserProfileDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            operator_name: value.operator_name,
            // password_hash mai esposta al client
        }
    }
}
