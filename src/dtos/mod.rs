//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod entry;
pub mod export;
pub mod option;
pub mod query;
pub mod user;

// Re-exports per facilitare l'import
pub use entry::{
    BulkDeleteDTO, CloseEntryDTO, CreateEntryDTO, FinishShiftDTO, NewEntryDTO, SearchEntriesDTO,
    StartShiftDTO,
};
pub use export::{ExportDTO, ExportRow};
pub use option::{OptionMutationDTO, OptionsDTO};
pub use query::StatusQuery;
pub use user::{
    AdminLoginDTO, CreateUserDTO, LoginUserDTO, RegisterDTO, ResetPasswordDTO, UserProfileDTO,
};
