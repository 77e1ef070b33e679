use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use punsj_domain::DomainResult;
use punsj_domain::aksjonspunkt::{AksjonspunktEntitet, AksjonspunktKode, AksjonspunktStatus};
use punsj_domain::error::DomainError;
use punsj_domain::journalpost::{Journalpost, JournalpostId};
use punsj_domain::mappe::Mappe;
use punsj_domain::ports::BoxFuture;
use punsj_domain::ports::aksjonspunkt::AksjonspunktRepository;
use punsj_domain::ports::journalpost::JournalpostRepository;
use punsj_domain::ports::mappe::MappeRepository;
use punsj_domain::ports::soknad::SoknadRepository;
use punsj_domain::soknad::SoknadEntitet;
use punsj_domain::ytelse::FagsakYtelseType;

#[derive(Clone, Default)]
pub struct InMemoryMappeRepository {
    store: Arc<RwLock<HashMap<String, Mappe>>>,
}

impl InMemoryMappeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappeRepository for InMemoryMappeRepository {
    fn lagre(&self, mappe: &Mappe) -> BoxFuture<'_, DomainResult<Mappe>> {
        let mappe = mappe.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            store.insert(mappe.mappe_id.clone(), mappe.clone());
            Ok(mappe)
        })
    }

    fn hent(&self, mappe_id: &str) -> BoxFuture<'_, DomainResult<Option<Mappe>>> {
        let mappe_id = mappe_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&mappe_id).cloned()) })
    }

    fn hent_for_person(
        &self,
        norsk_ident: &str,
        ytelse: FagsakYtelseType,
    ) -> BoxFuture<'_, DomainResult<Option<Mappe>>> {
        let norsk_ident = norsk_ident.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let store = store.read().await;
            Ok(store
                .values()
                .find(|mappe| mappe.ytelse == ytelse && mappe.personer.contains_key(&norsk_ident))
                .cloned())
        })
    }

    fn fjern(&self, mappe_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let mappe_id = mappe_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            store.write().await.remove(&mappe_id);
            Ok(())
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemorySoknadRepository {
    store: Arc<RwLock<HashMap<String, SoknadEntitet>>>,
}

impl InMemorySoknadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SoknadRepository for InMemorySoknadRepository {
    fn opprett(&self, soknad: &SoknadEntitet) -> BoxFuture<'_, DomainResult<SoknadEntitet>> {
        let soknad = soknad.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            if store.contains_key(&soknad.soknad_id) {
                return Err(DomainError::Conflict);
            }
            store.insert(soknad.soknad_id.clone(), soknad.clone());
            Ok(soknad)
        })
    }

    fn hent(&self, soknad_id: &str) -> BoxFuture<'_, DomainResult<Option<SoknadEntitet>>> {
        let soknad_id = soknad_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&soknad_id).cloned()) })
    }

    fn hent_for_mappe(&self, mappe_id: &str) -> BoxFuture<'_, DomainResult<Vec<SoknadEntitet>>> {
        let mappe_id = mappe_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let store = store.read().await;
            let mut soknader: Vec<SoknadEntitet> = store
                .values()
                .filter(|soknad| soknad.mappe_id == mappe_id)
                .cloned()
                .collect();
            soknader.sort_by(|a, b| a.soknad_id.cmp(&b.soknad_id));
            Ok(soknader)
        })
    }

    fn oppdater(&self, soknad: &SoknadEntitet) -> BoxFuture<'_, DomainResult<SoknadEntitet>> {
        let soknad = soknad.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            let lagret = store
                .get(&soknad.soknad_id)
                .ok_or(DomainError::NotFound)?
                .clone();
            // The submitted flag is only writable through marker_sendt_inn.
            let oppdatert = SoknadEntitet {
                sendt_inn: lagret.sendt_inn,
                ..soknad
            };
            store.insert(oppdatert.soknad_id.clone(), oppdatert.clone());
            Ok(oppdatert)
        })
    }

    fn marker_sendt_inn(&self, soknad_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let soknad_id = soknad_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            let soknad = store.get_mut(&soknad_id).ok_or(DomainError::NotFound)?;
            soknad.sendt_inn = true;
            Ok(())
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryJournalpostRepository {
    store: Arc<RwLock<HashMap<String, Journalpost>>>,
}

impl InMemoryJournalpostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalpostRepository for InMemoryJournalpostRepository {
    fn lagre(&self, journalpost: &Journalpost) -> BoxFuture<'_, DomainResult<Journalpost>> {
        let journalpost = journalpost.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            let lagret = store
                .entry(journalpost.journalpost_id.clone())
                .or_insert(journalpost);
            Ok(lagret.clone())
        })
    }

    fn hent_hvis(&self, journalpost_id: &str) -> BoxFuture<'_, DomainResult<Option<Journalpost>>> {
        let journalpost_id = journalpost_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&journalpost_id).cloned()) })
    }

    fn kan_sende_inn(
        &self,
        journalpost_ider: &[JournalpostId],
    ) -> BoxFuture<'_, DomainResult<bool>> {
        let journalpost_ider = journalpost_ider.to_vec();
        let store = self.store.clone();
        Box::pin(async move {
            let store = store.read().await;
            Ok(journalpost_ider.iter().all(|journalpost_id| {
                store
                    .get(journalpost_id)
                    .is_some_and(|journalpost| journalpost.kan_sende_inn)
            }))
        })
    }

    fn ferdig(&self, journalpost_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let journalpost_id = journalpost_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            let journalpost = store.get_mut(&journalpost_id).ok_or(DomainError::NotFound)?;
            journalpost.kan_sende_inn = false;
            Ok(())
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAksjonspunktRepository {
    store: Arc<RwLock<HashMap<String, Vec<AksjonspunktEntitet>>>>,
}

impl InMemoryAksjonspunktRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AksjonspunktRepository for InMemoryAksjonspunktRepository {
    fn opprett(
        &self,
        aksjonspunkt: &AksjonspunktEntitet,
    ) -> BoxFuture<'_, DomainResult<AksjonspunktEntitet>> {
        let aksjonspunkt = aksjonspunkt.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            store
                .entry(aksjonspunkt.journalpost_id.clone())
                .or_default()
                .push(aksjonspunkt.clone());
            Ok(aksjonspunkt)
        })
    }

    fn hent_alle(
        &self,
        journalpost_id: &str,
    ) -> BoxFuture<'_, DomainResult<Vec<AksjonspunktEntitet>>> {
        let journalpost_id = journalpost_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            Ok(store
                .read()
                .await
                .get(&journalpost_id)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn hent(
        &self,
        journalpost_id: &str,
        kode: AksjonspunktKode,
    ) -> BoxFuture<'_, DomainResult<Option<AksjonspunktEntitet>>> {
        let journalpost_id = journalpost_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let store = store.read().await;
            Ok(store.get(&journalpost_id).and_then(|aksjonspunkter| {
                aksjonspunkter
                    .iter()
                    .rev()
                    .find(|aksjonspunkt| aksjonspunkt.kode == kode)
                    .cloned()
            }))
        })
    }

    fn sett_status(
        &self,
        aksjonspunkt_id: &str,
        status: AksjonspunktStatus,
    ) -> BoxFuture<'_, DomainResult<()>> {
        let aksjonspunkt_id = aksjonspunkt_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut store = store.write().await;
            for aksjonspunkter in store.values_mut() {
                if let Some(aksjonspunkt) = aksjonspunkter
                    .iter_mut()
                    .find(|aksjonspunkt| aksjonspunkt.aksjonspunkt_id == aksjonspunkt_id)
                {
                    aksjonspunkt.status = status;
                    return Ok(());
                }
            }
            Err(DomainError::NotFound)
        })
    }
}
