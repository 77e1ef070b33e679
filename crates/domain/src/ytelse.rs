use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FagsakYtelseType {
    PleiepengerSyktBarn,
    OmsorgspengerKroniskSyktBarn,
    Omsorgspengerutbetaling,
}

impl FagsakYtelseType {
    pub fn kode(&self) -> &'static str {
        match self {
            Self::PleiepengerSyktBarn => "PSB",
            Self::OmsorgspengerKroniskSyktBarn => "OMP_KS",
            Self::Omsorgspengerutbetaling => "OMP_UT",
        }
    }

    /// Path segment used by the route layer, e.g. `/api/{uri_del}/mappe`.
    pub fn uri_del(&self) -> &'static str {
        match self {
            Self::PleiepengerSyktBarn => "pleiepenger-sykt-barn-soknad",
            Self::OmsorgspengerKroniskSyktBarn => "omsorgspenger-kronisk-sykt-barn-soknad",
            Self::Omsorgspengerutbetaling => "omsorgspengerutbetaling-soknad",
        }
    }

    pub fn fra_uri_del(value: &str) -> Option<Self> {
        match value {
            "pleiepenger-sykt-barn-soknad" => Some(Self::PleiepengerSyktBarn),
            "omsorgspenger-kronisk-sykt-barn-soknad" => Some(Self::OmsorgspengerKroniskSyktBarn),
            "omsorgspengerutbetaling-soknad" => Some(Self::Omsorgspengerutbetaling),
            _ => None,
        }
    }
}

impl FromStr for FagsakYtelseType {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PSB" => Ok(Self::PleiepengerSyktBarn),
            "OMP_KS" => Ok(Self::OmsorgspengerKroniskSyktBarn),
            "OMP_UT" => Ok(Self::Omsorgspengerutbetaling),
            _ => Err("unknown benefit type"),
        }
    }
}
