use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DomainResult;
use crate::error::DomainError;
use crate::hendelse::PunsjEventDto;
use crate::journalpost::{Journalpost, JournalpostId};
use crate::ports::aksjonspunkt::AksjonspunktRepository;
use crate::ports::hendelse::HendelseProducer;
use crate::ports::journalpost::JournalpostRepository;
use crate::ports::person::PersonTjeneste;
use crate::ports::soknad::SoknadRepository;
use crate::soknad::SoknadEntitet;
use crate::util;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AksjonspunktKode {
    Punsj,
    VenterPaaInformasjon,
}

impl AksjonspunktKode {
    pub fn kode(&self) -> &'static str {
        match self {
            Self::Punsj => "PUNSJ",
            Self::VenterPaaInformasjon => "MER_INFORMASJON",
        }
    }
}

impl FromStr for AksjonspunktKode {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PUNSJ" => Ok(Self::Punsj),
            "MER_INFORMASJON" => Ok(Self::VenterPaaInformasjon),
            _ => Err("unknown action point code"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AksjonspunktStatus {
    Opprettet,
    Utfoert,
}

impl AksjonspunktStatus {
    pub fn kode(&self) -> &'static str {
        match self {
            Self::Opprettet => "OPPR",
            Self::Utfoert => "UTFO",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VentAarsakType {
    VentTrengerFlereOpplysinger,
}

impl VentAarsakType {
    pub fn navn(&self) -> &'static str {
        match self {
            Self::VentTrengerFlereOpplysinger => "Venter på tilleggsinformasjon",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AksjonspunktEntitet {
    pub aksjonspunkt_id: String,
    pub kode: AksjonspunktKode,
    pub status: AksjonspunktStatus,
    pub journalpost_id: JournalpostId,
    pub vent_aarsak: Option<VentAarsakType>,
    pub frist_tid: Option<NaiveDateTime>,
}

impl AksjonspunktEntitet {
    pub fn ny(journalpost_id: impl Into<String>, kode: AksjonspunktKode) -> Self {
        Self {
            aksjonspunkt_id: util::ny_uuid(),
            kode,
            status: AksjonspunktStatus::Opprettet,
            journalpost_id: journalpost_id.into(),
            vent_aarsak: None,
            frist_tid: None,
        }
    }

    pub fn er_aapen(&self) -> bool {
        self.status != AksjonspunktStatus::Utfoert
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VentInfo {
    pub vente_aarsak: String,
    pub venter_til: NaiveDate,
}

/// Drives the per-journal-entry task lifecycle, synchronized with the external
/// work queue. Every mutation publishes its event first and commits the local
/// rows only after the transport has acknowledged; a failed publish leaves the
/// local state untouched.
#[derive(Clone)]
pub struct AksjonspunktService {
    repository: Arc<dyn AksjonspunktRepository>,
    journalposter: Arc<dyn JournalpostRepository>,
    soknader: Arc<dyn SoknadRepository>,
    personer: Arc<dyn PersonTjeneste>,
    producer: Arc<dyn HendelseProducer>,
    topic: String,
    vent_frist_uker: i64,
}

impl AksjonspunktService {
    pub fn new(
        repository: Arc<dyn AksjonspunktRepository>,
        journalposter: Arc<dyn JournalpostRepository>,
        soknader: Arc<dyn SoknadRepository>,
        personer: Arc<dyn PersonTjeneste>,
        producer: Arc<dyn HendelseProducer>,
        topic: impl Into<String>,
        vent_frist_uker: i64,
    ) -> Self {
        Self {
            repository,
            journalposter,
            soknader,
            personer,
            producer,
            topic: topic.into(),
            vent_frist_uker,
        }
    }

    /// Opens a task for the journal entry. Idempotent: an already open action
    /// point with the same code is left as is.
    pub async fn opprett_aksjonspunkt_og_send(
        &self,
        journalpost: &Journalpost,
        kode: AksjonspunktKode,
        ytelse: Option<String>,
        type_: Option<String>,
    ) -> DomainResult<()> {
        if let Some(eksisterende) = self
            .repository
            .hent(&journalpost.journalpost_id, kode)
            .await?
        {
            if eksisterende.er_aapen() {
                info!(
                    journalpost_id = %journalpost.journalpost_id,
                    kode = kode.kode(),
                    "aksjonspunkt finnes allerede"
                );
                return Ok(());
            }
        }

        let entitet = AksjonspunktEntitet::ny(&journalpost.journalpost_id, kode);
        let event = PunsjEventDto {
            ekstern_id: journalpost.ekstern_id.clone(),
            journalpost_id: journalpost.journalpost_id.clone(),
            event_tid: util::naa_lokal(),
            aktoer_id: journalpost.aktoer_id.clone(),
            aksjonspunkt_koder_med_status_liste: BTreeMap::from([(
                kode.kode().to_string(),
                AksjonspunktStatus::Opprettet.kode().to_string(),
            )]),
            pleietrengende_aktoer_id: None,
            ytelse,
            type_,
            sendt_inn: None,
            ferdigstilt_av: None,
        };

        self.producer
            .send(&self.topic, &journalpost.ekstern_id, &event.til_json()?)
            .await?;

        self.repository.opprett(&entitet).await?;
        info!(
            aksjonspunkt_id = %entitet.aksjonspunkt_id,
            kode = entitet.kode.kode(),
            "opprettet aksjonspunkt"
        );
        Ok(())
    }

    /// Closes every open action point for the journal entry and tells the work
    /// queue. No-op when nothing is open.
    pub async fn sett_utfoert_paa_alt_og_send(
        &self,
        journalpost_id: &str,
        sendt_inn: bool,
        ansvarlig_saksbehandler: Option<String>,
    ) -> DomainResult<()> {
        let skal_lukkes: Vec<AksjonspunktEntitet> = self
            .repository
            .hent_alle(journalpost_id)
            .await?
            .into_iter()
            .filter(AksjonspunktEntitet::er_aapen)
            .collect();

        if skal_lukkes.is_empty() {
            return Ok(());
        }

        let mut koder = BTreeMap::new();
        for aksjonspunkt in &skal_lukkes {
            koder.insert(
                aksjonspunkt.kode.kode().to_string(),
                AksjonspunktStatus::Utfoert.kode().to_string(),
            );
        }

        let journalpost = self
            .journalposter
            .hent_hvis(journalpost_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let event = PunsjEventDto {
            ekstern_id: journalpost.ekstern_id.clone(),
            journalpost_id: journalpost_id.to_string(),
            event_tid: util::naa_lokal(),
            aktoer_id: journalpost.aktoer_id.clone(),
            aksjonspunkt_koder_med_status_liste: koder,
            pleietrengende_aktoer_id: None,
            ytelse: None,
            type_: None,
            sendt_inn: Some(sendt_inn),
            ferdigstilt_av: ansvarlig_saksbehandler,
        };

        self.producer
            .send(&self.topic, &journalpost.ekstern_id, &event.til_json()?)
            .await?;

        for aksjonspunkt in &skal_lukkes {
            self.repository
                .sett_status(&aksjonspunkt.aksjonspunkt_id, AksjonspunktStatus::Utfoert)
                .await?;
            info!(
                aksjonspunkt_id = %aksjonspunkt.aksjonspunkt_id,
                kode = aksjonspunkt.kode.kode(),
                "satt aksjonspunkt til utført"
            );
        }
        Ok(())
    }

    pub async fn sett_utfoert_paa_alle_og_send(
        &self,
        journalpost_ider: &[JournalpostId],
        sendt_inn: bool,
        ansvarlig_saksbehandler: Option<String>,
    ) -> DomainResult<()> {
        for journalpost_id in journalpost_ider {
            self.sett_utfoert_paa_alt_og_send(
                journalpost_id,
                sendt_inn,
                ansvarlig_saksbehandler.clone(),
            )
            .await?;
        }
        Ok(())
    }

    /// Puts the journal entry on hold. An open punch task is superseded: it is
    /// completed and a wait point is created in the same event. On the manual
    /// path (no punch task) the wait point is created directly, unless one is
    /// already open.
    pub async fn sett_paa_vent_og_send(
        &self,
        journalpost_id: &str,
        soknad_id: Option<&str>,
    ) -> DomainResult<()> {
        let journalpost = self
            .journalposter
            .hent_hvis(journalpost_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let soknad = match soknad_id {
            Some(id) => self.soknader.hent(id).await?,
            None => None,
        };
        let barn_ident = soknad.as_ref().and_then(barn_ident_fra_soknad);
        if soknad.is_some() && barn_ident.is_none() {
            info!(journalpost_id, "ikke barn i søknaden");
        }
        let aktoer_id = self.utled_aktoer_id(soknad.as_ref(), &journalpost).await?;

        let mut vente_punkt =
            AksjonspunktEntitet::ny(journalpost_id, AksjonspunktKode::VenterPaaInformasjon);
        vente_punkt.vent_aarsak = Some(VentAarsakType::VentTrengerFlereOpplysinger);
        vente_punkt.frist_tid = Some(util::naa_lokal() + Duration::weeks(self.vent_frist_uker));

        let naavaerende = self
            .repository
            .hent(journalpost_id, AksjonspunktKode::Punsj)
            .await?
            .filter(AksjonspunktEntitet::er_aapen);

        if let Some(punsj_punkt) = naavaerende {
            let event = PunsjEventDto {
                ekstern_id: journalpost.ekstern_id.clone(),
                journalpost_id: journalpost_id.to_string(),
                event_tid: util::naa_lokal(),
                aktoer_id,
                aksjonspunkt_koder_med_status_liste: BTreeMap::from([
                    (
                        AksjonspunktKode::Punsj.kode().to_string(),
                        AksjonspunktStatus::Utfoert.kode().to_string(),
                    ),
                    (
                        AksjonspunktKode::VenterPaaInformasjon.kode().to_string(),
                        AksjonspunktStatus::Opprettet.kode().to_string(),
                    ),
                ]),
                pleietrengende_aktoer_id: barn_ident,
                ytelse: None,
                type_: None,
                sendt_inn: None,
                ferdigstilt_av: None,
            };

            self.producer
                .send(&self.topic, &journalpost.ekstern_id, &event.til_json()?)
                .await?;

            self.repository
                .sett_status(&punsj_punkt.aksjonspunkt_id, AksjonspunktStatus::Utfoert)
                .await?;
            self.repository.opprett(&vente_punkt).await?;
            info!(
                aksjonspunkt_id = %vente_punkt.aksjonspunkt_id,
                "punsjoppgave satt på vent"
            );
            return Ok(());
        }

        // Manual path: no punch task was ever opened for this entry.
        let allerede_paa_vent = self
            .repository
            .hent(journalpost_id, AksjonspunktKode::VenterPaaInformasjon)
            .await?
            .filter(AksjonspunktEntitet::er_aapen);

        if let Some(ventende) = allerede_paa_vent {
            info!(
                journalpost_id,
                frist = ?ventende.frist_tid,
                "journalposten venter allerede"
            );
            return Ok(());
        }

        let event = PunsjEventDto {
            ekstern_id: journalpost.ekstern_id.clone(),
            journalpost_id: journalpost_id.to_string(),
            event_tid: util::naa_lokal(),
            aktoer_id,
            aksjonspunkt_koder_med_status_liste: BTreeMap::from([(
                AksjonspunktKode::VenterPaaInformasjon.kode().to_string(),
                AksjonspunktStatus::Opprettet.kode().to_string(),
            )]),
            pleietrengende_aktoer_id: barn_ident,
            ytelse: None,
            type_: None,
            sendt_inn: None,
            ferdigstilt_av: None,
        };

        self.producer
            .send(&self.topic, &journalpost.ekstern_id, &event.til_json()?)
            .await?;

        self.repository.opprett(&vente_punkt).await?;
        info!(
            aksjonspunkt_id = %vente_punkt.aksjonspunkt_id,
            "opprettet ventepunkt"
        );
        Ok(())
    }

    pub async fn sjekk_om_paa_vent(&self, journalpost_id: &str) -> DomainResult<Option<VentInfo>> {
        let aksjonspunkt = self
            .repository
            .hent(journalpost_id, AksjonspunktKode::VenterPaaInformasjon)
            .await?;

        Ok(aksjonspunkt
            .filter(AksjonspunktEntitet::er_aapen)
            .and_then(|aapen| {
                let frist = aapen.frist_tid?;
                let aarsak = aapen.vent_aarsak?;
                Some(VentInfo {
                    vente_aarsak: aarsak.navn().to_string(),
                    venter_til: frist.date(),
                })
            }))
    }

    /// The draft's applicant may resolve to a different aktør id than the
    /// journal entry carries (the entry can arrive on the child's number);
    /// the resolved applicant wins.
    async fn utled_aktoer_id(
        &self,
        soknad: Option<&SoknadEntitet>,
        journalpost: &Journalpost,
    ) -> DomainResult<Option<String>> {
        let Some(soknad) = soknad else {
            return Ok(journalpost.aktoer_id.clone());
        };
        match self.personer.finn_person(&soknad.soeker_id).await {
            Ok(person) => {
                if Some(&person.aktoer_id) != journalpost.aktoer_id.as_ref() {
                    Ok(Some(person.aktoer_id))
                } else {
                    Ok(journalpost.aktoer_id.clone())
                }
            }
            Err(DomainError::NotFound) => Ok(journalpost.aktoer_id.clone()),
            Err(err) => Err(err),
        }
    }
}

fn barn_ident_fra_soknad(soknad: &SoknadEntitet) -> Option<String> {
    soknad
        .soknad
        .get("barn")
        .and_then(|barn| barn.get("norskIdent"))
        .and_then(|ident| ident.as_str())
        .map(str::to_string)
}
