use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::error::DomainError;

/// Work-queue event about a journal entry's action points. Serialized as the
/// downstream task-routing system expects it, keyed by the entry's external
/// correlation id for per-entity ordering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PunsjEventDto {
    pub ekstern_id: String,
    pub journalpost_id: String,
    pub event_tid: NaiveDateTime,
    pub aktoer_id: Option<String>,
    pub aksjonspunkt_koder_med_status_liste: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pleietrengende_aktoer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ytelse: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sendt_inn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ferdigstilt_av: Option<String>,
}

impl PunsjEventDto {
    pub fn til_json(&self) -> DomainResult<String> {
        serde_json::to_string(self)
            .map_err(|err| DomainError::Validation(format!("kunne ikke serialisere hendelse: {err}")))
    }
}
