use std::collections::BTreeSet;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Europe::Oslo;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::ytelse::FagsakYtelseType;

pub const VERSJON: &str = "1.0.0";

/// One accumulated validation failure. The mapper never aborts on these;
/// callers reject the send when the list is non-empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feil {
    pub felt: String,
    pub feilkode: String,
    pub feilmelding: String,
}

impl Feil {
    pub fn ny(
        felt: impl Into<String>,
        feilkode: impl Into<String>,
        feilmelding: impl Into<String>,
    ) -> Self {
        Self {
            felt: felt.into(),
            feilkode: feilkode.into(),
            feilmelding: feilmelding.into(),
        }
    }
}

/// The draft document as the frontend stores it. Tolerant by design: unknown
/// fields are ignored, known fields are all optional so that each required
/// check can report its own failure.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PunsjSoknadDto {
    #[serde(default)]
    pub soeker_id: Option<String>,
    #[serde(default)]
    pub barn: Option<BarnDto>,
    #[serde(default)]
    pub mottatt_dato: Option<NaiveDate>,
    #[serde(default)]
    pub klokkeslett: Option<NaiveTime>,
    #[serde(default)]
    pub har_info_som_ikke_kan_punsjes: Option<bool>,
    #[serde(default)]
    pub har_medisinske_opplysninger: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarnDto {
    #[serde(default)]
    pub norsk_ident: Option<String>,
    #[serde(default)]
    pub foedselsdato: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K9Soeker {
    pub norsk_identitetsnummer: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K9Barn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norsk_identitetsnummer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foedselsdato: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K9Journalpost {
    pub journalpost_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub informasjon_som_ikke_kan_punsjes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inneholder_medisinske_opplysninger: Option<bool>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum K9Ytelse {
    #[serde(rename = "PLEIEPENGER_SYKT_BARN", rename_all = "camelCase")]
    PleiepengerSyktBarn { barn: Option<K9Barn> },
    #[serde(rename = "OMSORGSPENGER_KRONISK_SYKT_BARN", rename_all = "camelCase")]
    OmsorgspengerKroniskSyktBarn {
        barn: Option<K9Barn>,
        kronisk_eller_funksjonshemming: bool,
    },
    #[serde(rename = "OMSORGSPENGER_UTBETALING", rename_all = "camelCase")]
    Omsorgspengerutbetaling { fosterbarn: Vec<K9Barn> },
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K9Soknad {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soeknad_id: Option<String>,
    pub versjon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mottatt_dato: Option<DateTime<Tz>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soeker: Option<K9Soeker>,
    pub journalposter: Vec<K9Journalpost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ytelse: Option<K9Ytelse>,
}

/// Maps a stored draft to the external case-processing format. Business-rule
/// violations are accumulated; only each failing field's own contribution is
/// skipped. Structurally unparseable input becomes a single mapping-failure
/// entry, so the caller always gets the same two-part result.
pub fn map_til_k9_format(
    soknad_id: &str,
    journalposter: &BTreeSet<String>,
    ytelse: FagsakYtelseType,
    soknad: &Value,
) -> (K9Soknad, Vec<Feil>) {
    let mut feil = Vec::new();
    let mut k9 = K9Soknad {
        soeknad_id: None,
        versjon: VERSJON.to_string(),
        mottatt_dato: None,
        soeker: None,
        journalposter: Vec::new(),
        ytelse: None,
    };

    let dto: PunsjSoknadDto = match serde_json::from_value(soknad.clone()) {
        Ok(dto) => dto,
        Err(err) => {
            warn!(soknad_id, "uventet mappingfeil: {err}");
            feil.push(Feil::ny("søknad", "uventetMappingfeil", err.to_string()));
            return (k9, feil);
        }
    };

    if !soknad_id.trim().is_empty() {
        k9.soeknad_id = Some(soknad_id.to_string());
    }

    k9.mottatt_dato = utled_mottatt_tidspunkt(&dto, &mut feil);

    match dto.soeker_id.as_deref().filter(|id| !id.trim().is_empty()) {
        Some(norsk_ident) => {
            k9.soeker = Some(K9Soeker {
                norsk_identitetsnummer: norsk_ident.to_string(),
            });
        }
        None => feil.push(Feil::ny("søker", "soekerId", "Søkers ident mangler")),
    }

    k9.journalposter = journalposter
        .iter()
        .map(|journalpost_id| K9Journalpost {
            journalpost_id: journalpost_id.clone(),
            informasjon_som_ikke_kan_punsjes: dto.har_info_som_ikke_kan_punsjes,
            inneholder_medisinske_opplysninger: dto.har_medisinske_opplysninger,
        })
        .collect();

    k9.ytelse = Some(utled_ytelse(ytelse, &dto, &mut feil));

    (k9, feil)
}

fn utled_mottatt_tidspunkt(dto: &PunsjSoknadDto, feil: &mut Vec<Feil>) -> Option<DateTime<Tz>> {
    let Some(mottatt_dato) = dto.mottatt_dato else {
        feil.push(Feil::ny("søknad", "mottattDato", "Mottatt dato mangler"));
        return None;
    };
    let Some(klokkeslett) = dto.klokkeslett else {
        feil.push(Feil::ny("søknad", "klokkeslett", "Klokkeslett mangler"));
        return None;
    };

    match Oslo.from_local_datetime(&mottatt_dato.and_time(klokkeslett)) {
        LocalResult::Single(tidspunkt) => Some(tidspunkt),
        LocalResult::Ambiguous(foerste, _) => Some(foerste),
        LocalResult::None => {
            feil.push(Feil::ny(
                "søknad",
                "klokkeslett",
                "Klokkeslettet finnes ikke i norsk tid",
            ));
            None
        }
    }
}

fn utled_ytelse(ytelse: FagsakYtelseType, dto: &PunsjSoknadDto, feil: &mut Vec<Feil>) -> K9Ytelse {
    match ytelse {
        FagsakYtelseType::PleiepengerSyktBarn => K9Ytelse::PleiepengerSyktBarn {
            barn: utled_barn(dto, feil),
        },
        FagsakYtelseType::OmsorgspengerKroniskSyktBarn => K9Ytelse::OmsorgspengerKroniskSyktBarn {
            barn: utled_barn(dto, feil),
            kronisk_eller_funksjonshemming: true,
        },
        FagsakYtelseType::Omsorgspengerutbetaling => K9Ytelse::Omsorgspengerutbetaling {
            fosterbarn: dto
                .barn
                .iter()
                .filter(|barn| barn.norsk_ident.is_some() || barn.foedselsdato.is_some())
                .map(|barn| K9Barn {
                    norsk_identitetsnummer: barn.norsk_ident.clone(),
                    foedselsdato: barn.foedselsdato,
                })
                .collect(),
        },
    }
}

/// The child is identified by national id when present, by birth date
/// otherwise. Both absent is a validation failure for the child-bound types.
fn utled_barn(dto: &PunsjSoknadDto, feil: &mut Vec<Feil>) -> Option<K9Barn> {
    match &dto.barn {
        Some(barn) if barn.norsk_ident.is_some() || barn.foedselsdato.is_some() => Some(K9Barn {
            norsk_identitetsnummer: barn.norsk_ident.clone(),
            foedselsdato: barn.foedselsdato,
        }),
        _ => {
            feil.push(Feil::ny("ytelse.barn", "barn", "Barn mangler"));
            None
        }
    }
}
