use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::ports::BoxFuture;
use crate::ytelse::FagsakYtelseType;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Periode {
    pub fom: NaiveDate,
    pub tom: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Saksnummer(pub String);

#[derive(Clone, Debug)]
pub struct SaksnummerForespoersel {
    pub soeker: String,
    pub pleietrengende: Option<String>,
    pub annen_part: Option<String>,
    /// At least one of journalpost_id and periode must be set; implementations
    /// fail with a validation error otherwise.
    pub journalpost_id: Option<String>,
    pub periode: Option<Periode>,
    pub correlation_id: String,
    pub ytelse: FagsakYtelseType,
}

pub trait FagsakTjeneste: Send + Sync {
    fn opprett_eller_hent_saksnummer(
        &self,
        foresporsel: &SaksnummerForespoersel,
    ) -> BoxFuture<'_, DomainResult<Saksnummer>>;
}
