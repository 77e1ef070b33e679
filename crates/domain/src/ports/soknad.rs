use crate::DomainResult;
use crate::ports::BoxFuture;
use crate::soknad::SoknadEntitet;

pub trait SoknadRepository: Send + Sync {
    /// Fails with Conflict when the id already exists; the stored value is
    /// returned unchanged.
    fn opprett(&self, soknad: &SoknadEntitet) -> BoxFuture<'_, DomainResult<SoknadEntitet>>;

    fn hent(&self, soknad_id: &str) -> BoxFuture<'_, DomainResult<Option<SoknadEntitet>>>;

    fn hent_for_mappe(&self, mappe_id: &str) -> BoxFuture<'_, DomainResult<Vec<SoknadEntitet>>>;

    /// Fails with NotFound when the id is unknown. The stored submitted flag
    /// is kept regardless of the value passed in.
    fn oppdater(&self, soknad: &SoknadEntitet) -> BoxFuture<'_, DomainResult<SoknadEntitet>>;

    fn marker_sendt_inn(&self, soknad_id: &str) -> BoxFuture<'_, DomainResult<()>>;
}
