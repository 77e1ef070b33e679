use crate::DomainResult;
use crate::journalpost::SafJournalpost;
use crate::ports::BoxFuture;

/// Read-only view into the document archive.
pub trait SafGateway: Send + Sync {
    fn hent_journalpost_info(
        &self,
        journalpost_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<SafJournalpost>>>;
}
