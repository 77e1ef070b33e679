use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub mod aksjonspunkt;
pub mod fagsak;
pub mod hendelse;
pub mod journalpost;
pub mod mappe;
pub mod person;
pub mod saf;
pub mod soknad;
