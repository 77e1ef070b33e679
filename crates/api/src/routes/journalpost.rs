use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use punsj_domain::aksjonspunkt::VentInfo;
use punsj_domain::journalpost::DokumentInfo;

use super::map_domain_error;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JournalpostInfoDto {
    pub journalpost_id: String,
    pub norsk_ident: Option<String>,
    pub dokumenter: Vec<DokumentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venter: Option<VentInfo>,
    pub kan_sende_inn: bool,
    pub journalpost_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SettPaaVent {
    pub soeknad_id: Option<String>,
}

pub(crate) async fn hent_journalpost_info(
    State(state): State<AppState>,
    Path(journalpost_id): Path<String>,
) -> Result<Response, ApiError> {
    let info = state
        .journalpost_service
        .hent_journalpost_info(&journalpost_id)
        .await
        .map_err(map_domain_error)?;

    let Some(info) = info else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let venter = state
        .aksjonspunkt_service
        .sjekk_om_paa_vent(&journalpost_id)
        .await
        .map_err(map_domain_error)?;

    let kan_sende_inn = state
        .journalpost_service
        .kan_sende_inn(&[journalpost_id.clone()])
        .await
        .map_err(map_domain_error)?;

    Ok(Json(JournalpostInfoDto {
        journalpost_id: info.journalpost_id,
        norsk_ident: info.norsk_ident,
        dokumenter: info.dokumenter,
        venter,
        kan_sende_inn,
        journalpost_status: info.journalpost_status,
    })
    .into_response())
}

pub(crate) async fn sett_paa_vent(
    State(state): State<AppState>,
    Path(journalpost_id): Path<String>,
    body: Option<Json<SettPaaVent>>,
) -> Result<StatusCode, ApiError> {
    let soeknad_id = body.and_then(|Json(payload)| payload.soeknad_id);

    state
        .aksjonspunkt_service
        .sett_paa_vent_og_send(&journalpost_id, soeknad_id.as_deref())
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::OK)
}
