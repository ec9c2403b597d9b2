//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.

// ************************* NOTA SULLE QUERY ************************* //

/*
   Le query sono scritte con sqlx::query / sqlx::query_as::<_, T> e le entità derivano FromRow:
   così il crate compila senza un database raggiungibile (le macro query! lo richiedono a compile time).
   Regole pratiche:
   - .execute(...)         -> INSERT/UPDATE/DELETE, si guarda rows_affected() o last_insert_rowid()
   - .fetch_optional(...)  -> zero o una riga
   - .fetch_one(...)       -> esattamente una riga (RowNotFound altrimenti)
   - .fetch_all(...)       -> Vec di righe
   Gli errori sqlx risalgono con ? fino al service, che li converte in AppError.
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod entry;
pub mod option;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use entry::{EntryFilter, EntryRepository};
pub use option::OptionRepository;
pub use user::UserRepository;
