use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainResult;
use crate::error::DomainError;
use crate::journalpost::JournalpostId;
use crate::mappe::MappeId;
use crate::ports::soknad::SoknadRepository;
use crate::util;

pub type SoknadId = String;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SoknadEntitet {
    pub soknad_id: SoknadId,
    pub mappe_id: MappeId,
    pub soeker_id: String,
    pub barn_id: Option<String>,
    pub barn_foedselsdato: Option<NaiveDate>,
    pub soknad: Value,
    pub journalposter: BTreeSet<JournalpostId>,
    pub sendt_inn: bool,
    pub saksnummer: Option<String>,
    pub endret_av: Option<String>,
    pub endret_tid: Option<NaiveDateTime>,
}

/// Writable fields of an existing draft. The submitted flag and the
/// person linkage are deliberately absent.
#[derive(Clone, Debug)]
pub struct OppdaterSoknad {
    pub soknad_id: SoknadId,
    pub soknad: Value,
    pub journalposter: BTreeSet<JournalpostId>,
    pub endret_av: Option<String>,
    pub saksnummer: Option<String>,
}

#[derive(Clone)]
pub struct SoknadService {
    repository: Arc<dyn SoknadRepository>,
}

impl SoknadService {
    pub fn new(repository: Arc<dyn SoknadRepository>) -> Self {
        Self { repository }
    }

    pub async fn opprett(&self, soknad: &SoknadEntitet) -> DomainResult<SoknadEntitet> {
        if self.repository.hent(&soknad.soknad_id).await?.is_some() {
            return Err(DomainError::Conflict);
        }
        self.repository.opprett(soknad).await
    }

    pub async fn hent(&self, soknad_id: &str) -> DomainResult<Option<SoknadEntitet>> {
        self.repository.hent(soknad_id).await
    }

    pub async fn hent_for_mappe(&self, mappe_id: &str) -> DomainResult<Vec<SoknadEntitet>> {
        self.repository.hent_for_mappe(mappe_id).await
    }

    pub async fn oppdater(&self, oppdatering: OppdaterSoknad) -> DomainResult<SoknadEntitet> {
        let mut lagret = self
            .repository
            .hent(&oppdatering.soknad_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        lagret.soknad = oppdatering.soknad;
        lagret.journalposter = oppdatering.journalposter;
        lagret.endret_av = oppdatering.endret_av;
        if oppdatering.saksnummer.is_some() {
            lagret.saksnummer = oppdatering.saksnummer;
        }
        lagret.endret_tid = Some(util::naa_lokal());

        self.repository.oppdater(&lagret).await
    }

    pub async fn sett_saksnummer(&self, soknad_id: &str, saksnummer: &str) -> DomainResult<()> {
        let mut lagret = self
            .repository
            .hent(soknad_id)
            .await?
            .ok_or(DomainError::NotFound)?;
        lagret.saksnummer = Some(saksnummer.to_string());
        lagret.endret_tid = Some(util::naa_lokal());
        self.repository.oppdater(&lagret).await?;
        Ok(())
    }

    /// Idempotent: flagging an already submitted draft is a no-op success.
    pub async fn marker_sendt_inn(&self, soknad_id: &str) -> DomainResult<()> {
        let lagret = self
            .repository
            .hent(soknad_id)
            .await?
            .ok_or(DomainError::NotFound)?;
        if lagret.sendt_inn {
            return Ok(());
        }
        self.repository.marker_sendt_inn(soknad_id).await
    }
}

impl SoknadEntitet {
    pub fn ny(soknad_id: impl Into<String>, mappe_id: impl Into<String>, soeker_id: impl Into<String>) -> Self {
        Self {
            soknad_id: soknad_id.into(),
            mappe_id: mappe_id.into(),
            soeker_id: soeker_id.into(),
            barn_id: None,
            barn_foedselsdato: None,
            soknad: Value::Object(serde_json::Map::new()),
            journalposter: BTreeSet::new(),
            sendt_inn: false,
            saksnummer: None,
            endret_av: None,
            endret_tid: None,
        }
    }
}
