use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::journalpost::JournalpostRepository;
use crate::ports::saf::SafGateway;
use crate::util;

pub type JournalpostId = String;

/// How the journal entry reached punsj: routed in by the automated
/// distributor, or registered by a caseworker by hand.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JournalpostKilde {
    Fordel,
    Saksbehandler,
}

impl JournalpostKilde {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fordel => "fordel",
            Self::Saksbehandler => "saksbehandler",
        }
    }
}

impl FromStr for JournalpostKilde {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fordel" => Ok(Self::Fordel),
            "saksbehandler" => Ok(Self::Saksbehandler),
            _ => Err("unknown journal entry source"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Journalpost {
    pub journalpost_id: JournalpostId,
    /// Correlation id used as partition key for every event about this entry.
    pub ekstern_id: String,
    pub aktoer_id: Option<String>,
    pub kilde: JournalpostKilde,
    pub kan_sende_inn: bool,
}

impl Journalpost {
    pub fn ny(
        journalpost_id: impl Into<String>,
        aktoer_id: Option<String>,
        kilde: JournalpostKilde,
    ) -> Self {
        Self {
            journalpost_id: journalpost_id.into(),
            ekstern_id: util::ny_uuid(),
            aktoer_id,
            kilde,
            kan_sende_inn: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafDatotype {
    DatoRegistrert,
    DatoJournalfoert,
    DatoOpprettet,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SafRelevantDato {
    pub dato: NaiveDateTime,
    pub datotype: SafDatotype,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SafJournalpostType {
    #[serde(rename = "I")]
    Inngaaende,
    #[serde(rename = "U")]
    Utgaaende,
    #[serde(rename = "N")]
    Notat,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DokumentInfo {
    pub dokument_id: String,
}

/// Archive metadata for one journal entry, as served by the document archive
/// gateway. `har_tilgang` is the archive's own access verdict for the
/// caseworker; the gateway computes it from the document variants.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SafJournalpost {
    pub journalpost_type: Option<SafJournalpostType>,
    pub journalstatus: Option<String>,
    pub norsk_ident: Option<String>,
    pub aktoer_id: Option<String>,
    pub dokumenter: Vec<DokumentInfo>,
    pub relevante_datoer: Vec<SafRelevantDato>,
    pub har_tilgang: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JournalpostInfo {
    pub journalpost_id: JournalpostId,
    pub norsk_ident: Option<String>,
    pub aktoer_id: Option<String>,
    pub dokumenter: Vec<DokumentInfo>,
    pub mottatt_dato: NaiveDateTime,
    pub er_inngaaende: bool,
    pub journalpost_status: Option<String>,
}

/// Received-date derivation: registered date for inbound entries, journaled
/// date otherwise, then created date, then the current Oslo wall clock.
pub fn utled_mottatt_dato(
    journalpost_type: Option<SafJournalpostType>,
    relevante_datoer: &[SafRelevantDato],
) -> NaiveDateTime {
    let foretrukket = if journalpost_type == Some(SafJournalpostType::Inngaaende) {
        SafDatotype::DatoRegistrert
    } else {
        SafDatotype::DatoJournalfoert
    };

    let finn = |datotype: SafDatotype| {
        relevante_datoer
            .iter()
            .find(|relevant| relevant.datotype == datotype)
            .map(|relevant| relevant.dato)
    };

    finn(foretrukket)
        .or_else(|| finn(SafDatotype::DatoOpprettet))
        .unwrap_or_else(|| {
            warn!(
                datotyper = ?relevante_datoer.iter().map(|d| d.datotype).collect::<Vec<_>>(),
                "fant ikke relevant dato, bruker dagens dato"
            );
            util::naa_lokal()
        })
}

#[derive(Clone)]
pub struct JournalpostService {
    repository: Arc<dyn JournalpostRepository>,
    saf: Arc<dyn SafGateway>,
}

impl JournalpostService {
    pub fn new(repository: Arc<dyn JournalpostRepository>, saf: Arc<dyn SafGateway>) -> Self {
        Self { repository, saf }
    }

    pub async fn hent_journalpost_info(
        &self,
        journalpost_id: &str,
    ) -> DomainResult<Option<JournalpostInfo>> {
        let Some(saf_journalpost) = self.saf.hent_journalpost_info(journalpost_id).await? else {
            return Ok(None);
        };

        if !saf_journalpost.har_tilgang {
            // Identifying fields are deliberately left out of the log line.
            warn!(journalpost_id, "saksbehandler har ikke tilgang til journalposten");
            return Err(DomainError::AccessDenied);
        }

        let mottatt_dato = utled_mottatt_dato(
            saf_journalpost.journalpost_type,
            &saf_journalpost.relevante_datoer,
        );

        Ok(Some(JournalpostInfo {
            journalpost_id: journalpost_id.to_string(),
            norsk_ident: saf_journalpost.norsk_ident,
            aktoer_id: saf_journalpost.aktoer_id,
            dokumenter: saf_journalpost.dokumenter,
            mottatt_dato,
            er_inngaaende: saf_journalpost.journalpost_type == Some(SafJournalpostType::Inngaaende),
            journalpost_status: saf_journalpost.journalstatus,
        }))
    }

    /// Stores the entry unless a row already exists; the stored row wins.
    pub async fn lagre(&self, journalpost: &Journalpost) -> DomainResult<Journalpost> {
        self.repository.lagre(journalpost).await
    }

    pub async fn hent_hvis(&self, journalpost_id: &str) -> DomainResult<Option<Journalpost>> {
        self.repository.hent_hvis(journalpost_id).await
    }

    pub async fn hent(&self, journalpost_id: &str) -> DomainResult<Journalpost> {
        self.repository
            .hent_hvis(journalpost_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    pub async fn kan_sende_inn(&self, journalpost_ider: &[JournalpostId]) -> DomainResult<bool> {
        self.repository.kan_sende_inn(journalpost_ider).await
    }

    pub async fn sett_til_ferdig(&self, journalpost_id: &str) -> DomainResult<()> {
        self.repository.ferdig(journalpost_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dato(dag: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, dag)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn inngaaende_foretrekker_registrert_dato() {
        let datoer = vec![
            SafRelevantDato {
                dato: dato(1),
                datotype: SafDatotype::DatoJournalfoert,
            },
            SafRelevantDato {
                dato: dato(2),
                datotype: SafDatotype::DatoRegistrert,
            },
        ];
        let mottatt = utled_mottatt_dato(Some(SafJournalpostType::Inngaaende), &datoer);
        assert_eq!(mottatt, dato(2));
    }

    #[test]
    fn utgaaende_foretrekker_journalfoert_dato() {
        let datoer = vec![
            SafRelevantDato {
                dato: dato(1),
                datotype: SafDatotype::DatoJournalfoert,
            },
            SafRelevantDato {
                dato: dato(2),
                datotype: SafDatotype::DatoRegistrert,
            },
        ];
        let mottatt = utled_mottatt_dato(Some(SafJournalpostType::Utgaaende), &datoer);
        assert_eq!(mottatt, dato(1));
    }

    #[test]
    fn faller_tilbake_til_opprettet_dato() {
        let datoer = vec![SafRelevantDato {
            dato: dato(3),
            datotype: SafDatotype::DatoOpprettet,
        }];
        let mottatt = utled_mottatt_dato(Some(SafJournalpostType::Inngaaende), &datoer);
        assert_eq!(mottatt, dato(3));
    }

    #[test]
    fn tom_datoliste_gir_dagens_dato() {
        let foer = util::naa_lokal();
        let mottatt = utled_mottatt_dato(None, &[]);
        assert!(mottatt >= foer);
    }
}
