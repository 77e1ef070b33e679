use std::collections::{BTreeMap, BTreeSet};

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::http::header::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use punsj_domain::aksjonspunkt::AksjonspunktKode;
use punsj_domain::error::DomainError;
use punsj_domain::journalpost::{Journalpost, JournalpostKilde};
use punsj_domain::k9format::{self, Feil};
use punsj_domain::mappe::{Innsending, JournalpostInnhold, Mappe};
use punsj_domain::ports::fagsak::SaksnummerForespoersel;
use punsj_domain::soknad::{OppdaterSoknad, SoknadEntitet};
use punsj_domain::ytelse::FagsakYtelseType;

use super::{map_domain_error, norsk_ident_from_headers, saksbehandler_from_headers};
use crate::error::ApiError;
use crate::middleware::CorrelationId;
use crate::observability;
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdentOgJournalpost {
    #[validate(length(min = 1))]
    pub norsk_ident: String,
    #[validate(length(min = 1))]
    pub journalpost_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendSoknad {
    #[validate(length(min = 1))]
    pub norsk_ident: String,
    #[validate(length(min = 1))]
    pub soeknad: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SoknadDto {
    pub soeknad_id: String,
    pub soeker_id: String,
    pub journalposter: Vec<String>,
    pub sendt_inn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saksnummer: Option<String>,
    pub soknad: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SvarDto {
    pub soeker: String,
    pub fagsak_type_kode: &'static str,
    pub soknader: Vec<SoknadDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SoknadFeil {
    pub soeknad_id: String,
    pub feil: Vec<Feil>,
}

fn soknad_dto(entitet: &SoknadEntitet) -> SoknadDto {
    SoknadDto {
        soeknad_id: entitet.soknad_id.clone(),
        soeker_id: entitet.soeker_id.clone(),
        journalposter: entitet.journalposter.iter().cloned().collect(),
        sendt_inn: entitet.sendt_inn,
        saksnummer: entitet.saksnummer.clone(),
        soknad: entitet.soknad.clone(),
    }
}

fn ytelse_fra_uri(soknad_type: &str) -> Result<FagsakYtelseType, ApiError> {
    FagsakYtelseType::fra_uri_del(soknad_type)
        .ok_or_else(|| ApiError::Validation(format!("ukjent søknadstype: {soknad_type}")))
}

pub(crate) async fn hent_mappe(
    State(state): State<AppState>,
    Path(soknad_type): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SvarDto>, ApiError> {
    let ytelse = ytelse_fra_uri(&soknad_type)?;
    let norsk_ident = norsk_ident_from_headers(&headers)?;

    let mut soknader = Vec::new();
    if let Some(mappe) = state
        .mappe_service
        .hent_for_person(&norsk_ident, ytelse)
        .await
        .map_err(map_domain_error)?
    {
        soknader = state
            .soknad_service
            .hent_for_mappe(&mappe.mappe_id)
            .await
            .map_err(map_domain_error)?
            .iter()
            .filter(|soknad| soknad.soeker_id == norsk_ident)
            .map(soknad_dto)
            .collect();
    }

    Ok(Json(SvarDto {
        soeker: norsk_ident,
        fagsak_type_kode: ytelse.kode(),
        soknader,
    }))
}

pub(crate) async fn hent_soknad(
    State(state): State<AppState>,
    Path((soknad_type, soknad_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    ytelse_fra_uri(&soknad_type)?;
    let soknad = state
        .soknad_service
        .hent(&soknad_id)
        .await
        .map_err(map_domain_error)?;

    // Read path: an unknown id is an absent result, never an error.
    Ok(match soknad {
        Some(entitet) => (StatusCode::OK, Json(soknad_dto(&entitet))).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

pub(crate) async fn ny_soknad(
    State(state): State<AppState>,
    Path(soknad_type): Path<String>,
    Json(payload): Json<IdentOgJournalpost>,
) -> Result<Response, ApiError> {
    validation::validate(&payload)?;
    let ytelse = ytelse_fra_uri(&soknad_type)?;

    let aktoer_id = match state
        .person_tjeneste
        .finn_person(&payload.norsk_ident)
        .await
    {
        Ok(person) => Some(person.aktoer_id),
        Err(DomainError::NotFound) => None,
        Err(err) => return Err(map_domain_error(err)),
    };

    let journalpost = state
        .journalpost_service
        .lagre(&Journalpost::ny(
            &payload.journalpost_id,
            aktoer_id,
            JournalpostKilde::Saksbehandler,
        ))
        .await
        .map_err(map_domain_error)?;

    let innsending = Innsending {
        personer: BTreeMap::from([(
            payload.norsk_ident.clone(),
            JournalpostInnhold {
                journalpost_id: payload.journalpost_id.clone(),
                soknad: Value::Object(serde_json::Map::new()),
            },
        )]),
    };

    let eksisterende = state
        .mappe_service
        .hent_for_person(&payload.norsk_ident, ytelse)
        .await
        .map_err(map_domain_error)?;

    let mappe: Mappe = match eksisterende {
        Some(mappe) => state
            .mappe_service
            .utfyllende_innsending(&mappe.mappe_id, &innsending)
            .await
            .map_err(map_domain_error)?
            .ok_or(ApiError::NotFound)?,
        None => state
            .mappe_service
            .foerste_innsending(ytelse, &innsending)
            .await
            .map_err(map_domain_error)?,
    };

    let person = mappe
        .personer
        .get(&payload.norsk_ident)
        .ok_or(ApiError::Internal)?;
    let soknad_id = person
        .soknad
        .get("id")
        .and_then(Value::as_str)
        .ok_or(ApiError::Internal)?
        .to_string();

    let mut entitet = SoknadEntitet::ny(&soknad_id, &mappe.mappe_id, &payload.norsk_ident);
    entitet.journalposter = person.innsendinger.clone();
    entitet.soknad = person.soknad.clone();

    match state.soknad_service.opprett(&entitet).await {
        Ok(_) => {}
        // Resubmission for the same person and type folds into the open
        // draft: the journal-entry set grows, edited content is kept.
        Err(DomainError::Conflict) => {
            let lagret = state
                .soknad_service
                .hent(&soknad_id)
                .await
                .map_err(map_domain_error)?
                .ok_or(ApiError::Internal)?;
            state
                .soknad_service
                .oppdater(OppdaterSoknad {
                    soknad_id: soknad_id.clone(),
                    soknad: lagret.soknad,
                    journalposter: person.innsendinger.clone(),
                    endret_av: lagret.endret_av,
                    saksnummer: None,
                })
                .await
                .map_err(map_domain_error)?;
        }
        Err(err) => return Err(map_domain_error(err)),
    }

    state
        .aksjonspunkt_service
        .opprett_aksjonspunkt_og_send(
            &journalpost,
            AksjonspunktKode::Punsj,
            Some(ytelse.kode().to_string()),
            Some(journalpost.kilde.as_str().to_string()),
        )
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "soeknadId": soknad_id })),
    )
        .into_response())
}

pub(crate) async fn oppdater_soknad(
    State(state): State<AppState>,
    Path(soknad_type): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<SoknadDto>, ApiError> {
    ytelse_fra_uri(&soknad_type)?;

    let soknad_id = body
        .get("soeknadId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("soeknadId mangler".into()))?
        .to_string();

    let lagret = state
        .soknad_service
        .hent(&soknad_id)
        .await
        .map_err(map_domain_error)?
        .ok_or(ApiError::NotFound)?;

    let mut journalposter: BTreeSet<String> = lagret.journalposter.clone();
    if let Some(fra_body) = body.get("journalposter").and_then(Value::as_array) {
        journalposter.extend(
            fra_body
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string),
        );
    }

    let oppdatert = state
        .soknad_service
        .oppdater(OppdaterSoknad {
            soknad_id,
            soknad: body,
            journalposter,
            endret_av: saksbehandler_from_headers(&headers),
            saksnummer: None,
        })
        .await
        .map_err(map_domain_error)?;

    Ok(Json(soknad_dto(&oppdatert)))
}

pub(crate) async fn send_soknad(
    State(state): State<AppState>,
    Path(soknad_type): Path<String>,
    Extension(CorrelationId(correlation_id)): Extension<CorrelationId>,
    headers: HeaderMap,
    Json(payload): Json<SendSoknad>,
) -> Result<Response, ApiError> {
    validation::validate(&payload)?;
    let ytelse = ytelse_fra_uri(&soknad_type)?;

    let Some(soknad) = state
        .soknad_service
        .hent(&payload.soeknad)
        .await
        .map_err(map_domain_error)?
    else {
        return Err(ApiError::NotFound);
    };

    if soknad.sendt_inn {
        return Err(ApiError::Conflict);
    }

    let journalposter: Vec<String> = soknad.journalposter.iter().cloned().collect();
    let kan_sendes = state
        .journalpost_service
        .kan_sende_inn(&journalposter)
        .await
        .map_err(map_domain_error)?;
    if !kan_sendes {
        observability::register_innsending(ytelse.kode(), "avvist");
        return Err(ApiError::Conflict);
    }

    let (_k9_soknad, feil) = k9format::map_til_k9_format(
        &soknad.soknad_id,
        &soknad.journalposter,
        ytelse,
        &soknad.soknad,
    );
    if !feil.is_empty() {
        observability::register_innsending(ytelse.kode(), "avvist");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(SoknadFeil {
                soeknad_id: soknad.soknad_id.clone(),
                feil,
            }),
        )
            .into_response());
    }

    let saksnummer = state
        .fagsak_tjeneste
        .opprett_eller_hent_saksnummer(&SaksnummerForespoersel {
            soeker: soknad.soeker_id.clone(),
            pleietrengende: soknad.barn_id.clone(),
            annen_part: None,
            journalpost_id: journalposter.first().cloned(),
            periode: None,
            correlation_id,
            ytelse,
        })
        .await
        .map_err(map_domain_error)?;

    state
        .soknad_service
        .sett_saksnummer(&soknad.soknad_id, &saksnummer.0)
        .await
        .map_err(map_domain_error)?;

    // Publish first; the local rows below only change after the work queue
    // has acknowledged the close event.
    state
        .aksjonspunkt_service
        .sett_utfoert_paa_alle_og_send(&journalposter, true, saksbehandler_from_headers(&headers))
        .await
        .map_err(map_domain_error)?;

    for journalpost_id in &journalposter {
        state
            .journalpost_service
            .sett_til_ferdig(journalpost_id)
            .await
            .map_err(map_domain_error)?;
    }

    state
        .soknad_service
        .marker_sendt_inn(&soknad.soknad_id)
        .await
        .map_err(map_domain_error)?;

    observability::register_innsending(ytelse.kode(), "ok");
    Ok((
        StatusCode::ACCEPTED,
        Json(SoknadFeil {
            soeknad_id: soknad.soknad_id,
            feil: Vec::new(),
        }),
    )
        .into_response())
}

/// Dry run of the mapper: same failure list as `send`, no side effects.
pub(crate) async fn valider_soknad(
    State(state): State<AppState>,
    Path(soknad_type): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let ytelse = ytelse_fra_uri(&soknad_type)?;

    let soknad_id = body
        .get("soeknadId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let journalposter: BTreeSet<String> = match state
        .soknad_service
        .hent(&soknad_id)
        .await
        .map_err(map_domain_error)?
    {
        Some(lagret) => lagret.journalposter,
        None => body
            .get("journalposter")
            .and_then(Value::as_array)
            .map(|liste| {
                liste
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };

    let (_, feil) = k9format::map_til_k9_format(&soknad_id, &journalposter, ytelse, &body);

    let status = if feil.is_empty() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((
        status,
        Json(SoknadFeil {
            soeknad_id: soknad_id,
            feil,
        }),
    )
        .into_response())
}

/// Folder deletion was retired; the flow stays mapped so old clients get a
/// deliberate server error instead of a silent 404.
pub(crate) async fn slett_soknad(
    Path(soknad_type): Path<String>,
) -> Result<Response, ApiError> {
    ytelse_fra_uri(&soknad_type)?;
    Err(map_domain_error(DomainError::IllegalState(
        "støtter ikke lenger sletting av mapper".into(),
    )))
}
