use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainResult;
use crate::error::DomainError;
use crate::journalpost::JournalpostId;
use crate::merge::{self, IdGenerator};
use crate::ports::mappe::MappeRepository;
use crate::ytelse::FagsakYtelseType;

pub type MappeId = String;
pub type NorskIdent = String;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonInnhold {
    pub innsendinger: BTreeSet<JournalpostId>,
    pub soknad: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Mappe {
    pub mappe_id: MappeId,
    pub ytelse: FagsakYtelseType,
    pub personer: BTreeMap<NorskIdent, PersonInnhold>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JournalpostInnhold {
    pub journalpost_id: JournalpostId,
    pub soknad: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Innsending {
    pub personer: BTreeMap<NorskIdent, JournalpostInnhold>,
}

/// Merges an incoming submission into a folder, producing a new folder value.
/// Inputs are never mutated; persistence is the caller's decision. The benefit
/// type of an existing folder is immutable; a brand new folder requires one.
pub fn legg_i_mappe(
    eksisterende: Option<&Mappe>,
    innsending: &Innsending,
    ytelse: Option<FagsakYtelseType>,
    ids: &dyn IdGenerator,
) -> DomainResult<Mappe> {
    let ytelse = match eksisterende {
        Some(mappe) => mappe.ytelse,
        None => ytelse.ok_or(DomainError::ManglerYtelse)?,
    };

    let mut personer = eksisterende
        .map(|mappe| mappe.personer.clone())
        .unwrap_or_default();

    for (norsk_ident, innhold) in &innsending.personer {
        let forrige = eksisterende.and_then(|mappe| mappe.personer.get(norsk_ident));

        let mut innsendinger = forrige
            .map(|person| person.innsendinger.clone())
            .unwrap_or_default();
        innsendinger.insert(innhold.journalpost_id.clone());

        let sammenslaatt = match forrige {
            Some(person) => merge::dyp_merge(&person.soknad, &innhold.soknad),
            None => innhold.soknad.clone(),
        };

        personer.insert(
            norsk_ident.clone(),
            PersonInnhold {
                innsendinger,
                soknad: merge::stemple_id(&sammenslaatt, ids),
            },
        );
    }

    Ok(Mappe {
        mappe_id: eksisterende
            .map(|mappe| mappe.mappe_id.clone())
            .unwrap_or_else(|| ids.neste_id()),
        ytelse,
        personer,
    })
}

#[derive(Clone)]
pub struct MappeService {
    repository: Arc<dyn MappeRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl MappeService {
    pub fn new(repository: Arc<dyn MappeRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repository, ids }
    }

    pub async fn foerste_innsending(
        &self,
        ytelse: FagsakYtelseType,
        innsending: &Innsending,
    ) -> DomainResult<Mappe> {
        let mappe = legg_i_mappe(None, innsending, Some(ytelse), self.ids.as_ref())?;
        self.repository.lagre(&mappe).await
    }

    pub async fn utfyllende_innsending(
        &self,
        mappe_id: &str,
        innsending: &Innsending,
    ) -> DomainResult<Option<Mappe>> {
        let Some(eksisterende) = self.repository.hent(mappe_id).await? else {
            return Ok(None);
        };
        let oppdatert = legg_i_mappe(Some(&eksisterende), innsending, None, self.ids.as_ref())?;
        Ok(Some(self.repository.lagre(&oppdatert).await?))
    }

    pub async fn hent(&self, mappe_id: &str) -> DomainResult<Option<Mappe>> {
        self.repository.hent(mappe_id).await
    }

    pub async fn hent_for_person(
        &self,
        norsk_ident: &str,
        ytelse: FagsakYtelseType,
    ) -> DomainResult<Option<Mappe>> {
        self.repository.hent_for_person(norsk_ident, ytelse).await
    }

    /// Removing the last person removes the folder itself.
    pub async fn fjern(&self, mappe_id: &str, norsk_ident: &str) -> DomainResult<()> {
        let Some(mut mappe) = self.repository.hent(mappe_id).await? else {
            return Ok(());
        };
        if !mappe.personer.contains_key(norsk_ident) {
            return Ok(());
        }
        if mappe.personer.len() == 1 {
            self.repository.fjern(mappe_id).await?;
            return Ok(());
        }
        mappe.personer.remove(norsk_ident);
        self.repository.lagre(&mappe).await?;
        Ok(())
    }
}
