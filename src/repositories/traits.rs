//! Trait comuni dei repository
//!
//! Solo le operazioni che più repository implementano allo stesso modo;
//! le query specifiche (ricerca, chiusura turno, opzioni) restano metodi inerenti.

/// Inserimento di una nuova riga; l'id viene assegnato dal database
/// (rowid per le voci, UUID per gli utenti).
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Lettura per chiave primaria
///
/// `Ok(None)` quando la riga non esiste: il chiamante decide se è un 404.
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Cancellazione per chiave primaria; `Ok(false)` se non c'era nulla da cancellare
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}
