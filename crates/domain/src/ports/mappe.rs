use crate::DomainResult;
use crate::mappe::Mappe;
use crate::ports::BoxFuture;
use crate::ytelse::FagsakYtelseType;

pub trait MappeRepository: Send + Sync {
    /// Upsert; returns the stored value.
    fn lagre(&self, mappe: &Mappe) -> BoxFuture<'_, DomainResult<Mappe>>;

    fn hent(&self, mappe_id: &str) -> BoxFuture<'_, DomainResult<Option<Mappe>>>;

    fn hent_for_person(
        &self,
        norsk_ident: &str,
        ytelse: FagsakYtelseType,
    ) -> BoxFuture<'_, DomainResult<Option<Mappe>>>;

    fn fjern(&self, mappe_id: &str) -> BoxFuture<'_, DomainResult<()>>;
}
