pub mod aksjonspunkt;
pub mod error;
pub mod hendelse;
pub mod journalpost;
pub mod k9format;
pub mod mappe;
pub mod merge;
pub mod ports;
pub mod soknad;
pub mod util;
pub mod ytelse;

pub type DomainResult<T> = Result<T, error::DomainError>;
