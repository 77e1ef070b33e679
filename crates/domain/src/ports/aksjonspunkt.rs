use crate::DomainResult;
use crate::aksjonspunkt::{AksjonspunktEntitet, AksjonspunktKode, AksjonspunktStatus};
use crate::ports::BoxFuture;

pub trait AksjonspunktRepository: Send + Sync {
    fn opprett(
        &self,
        aksjonspunkt: &AksjonspunktEntitet,
    ) -> BoxFuture<'_, DomainResult<AksjonspunktEntitet>>;

    fn hent_alle(
        &self,
        journalpost_id: &str,
    ) -> BoxFuture<'_, DomainResult<Vec<AksjonspunktEntitet>>>;

    /// The most recent action point with the given code, completed or not.
    fn hent(
        &self,
        journalpost_id: &str,
        kode: AksjonspunktKode,
    ) -> BoxFuture<'_, DomainResult<Option<AksjonspunktEntitet>>>;

    fn sett_status(
        &self,
        aksjonspunkt_id: &str,
        status: AksjonspunktStatus,
    ) -> BoxFuture<'_, DomainResult<()>>;
}
