use crate::DomainResult;
use crate::journalpost::{Journalpost, JournalpostId};
use crate::ports::BoxFuture;

pub trait JournalpostRepository: Send + Sync {
    /// Stores the row unless one exists already; an existing row wins.
    fn lagre(&self, journalpost: &Journalpost) -> BoxFuture<'_, DomainResult<Journalpost>>;

    fn hent_hvis(&self, journalpost_id: &str) -> BoxFuture<'_, DomainResult<Option<Journalpost>>>;

    /// True only when every listed entry exists and is still sendable.
    fn kan_sende_inn(
        &self,
        journalpost_ider: &[JournalpostId],
    ) -> BoxFuture<'_, DomainResult<bool>>;

    fn ferdig(&self, journalpost_id: &str) -> BoxFuture<'_, DomainResult<()>>;
}
