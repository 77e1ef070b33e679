use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use punsj_domain::DomainResult;
use punsj_domain::error::DomainError;
use punsj_domain::journalpost::SafJournalpost;
use punsj_domain::ports::BoxFuture;
use punsj_domain::ports::fagsak::{FagsakTjeneste, Saksnummer, SaksnummerForespoersel};
use punsj_domain::ports::person::{Person, PersonTjeneste};
use punsj_domain::ports::saf::SafGateway;

#[derive(Clone, Default)]
pub struct InMemoryPersonTjeneste {
    personer: Arc<RwLock<HashMap<String, Person>>>,
}

impl InMemoryPersonTjeneste {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn registrer(&self, person: Person) {
        self.personer
            .write()
            .await
            .insert(person.norsk_ident.clone(), person);
    }
}

impl PersonTjeneste for InMemoryPersonTjeneste {
    fn finn_person(&self, norsk_ident: &str) -> BoxFuture<'_, DomainResult<Person>> {
        let norsk_ident = norsk_ident.to_string();
        let personer = self.personer.clone();
        Box::pin(async move {
            personer
                .read()
                .await
                .get(&norsk_ident)
                .cloned()
                .ok_or(DomainError::NotFound)
        })
    }
}

/// Case-routing stand-in for the memory backend: validates the request shape
/// and hands out a fixed case number.
#[derive(Clone)]
pub struct InMemoryFagsakTjeneste {
    saksnummer: String,
}

impl InMemoryFagsakTjeneste {
    pub fn new(saksnummer: impl Into<String>) -> Self {
        Self {
            saksnummer: saksnummer.into(),
        }
    }
}

impl FagsakTjeneste for InMemoryFagsakTjeneste {
    fn opprett_eller_hent_saksnummer(
        &self,
        foresporsel: &SaksnummerForespoersel,
    ) -> BoxFuture<'_, DomainResult<Saksnummer>> {
        let gyldig = foresporsel.journalpost_id.is_some() || foresporsel.periode.is_some();
        let saksnummer = self.saksnummer.clone();
        Box::pin(async move {
            if !gyldig {
                return Err(DomainError::Validation(
                    "må sette minst en av journalpostId og periode".into(),
                ));
            }
            Ok(Saksnummer(saksnummer))
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemorySafGateway {
    journalposter: Arc<RwLock<HashMap<String, SafJournalpost>>>,
}

impl InMemorySafGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn registrer(&self, journalpost_id: impl Into<String>, info: SafJournalpost) {
        self.journalposter
            .write()
            .await
            .insert(journalpost_id.into(), info);
    }
}

impl SafGateway for InMemorySafGateway {
    fn hent_journalpost_info(
        &self,
        journalpost_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<SafJournalpost>>> {
        let journalpost_id = journalpost_id.to_string();
        let journalposter = self.journalposter.clone();
        Box::pin(async move { Ok(journalposter.read().await.get(&journalpost_id).cloned()) })
    }
}
