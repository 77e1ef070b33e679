use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::ports::BoxFuture;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub norsk_ident: String,
    pub aktoer_id: String,
}

pub trait PersonTjeneste: Send + Sync {
    /// Fails with NotFound for unknown idents.
    fn finn_person(&self, norsk_ident: &str) -> BoxFuture<'_, DomainResult<Person>>;
}
