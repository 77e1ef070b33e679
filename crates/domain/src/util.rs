use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Europe::Oslo;
use chrono_tz::Tz;
use uuid::Uuid;

pub fn ny_uuid() -> String {
    Uuid::new_v4().to_string()
}

pub fn uuid_v7_without_dashes() -> String {
    Uuid::now_v7().simple().to_string()
}

pub fn naa_oslo() -> DateTime<Tz> {
    Utc::now().with_timezone(&Oslo)
}

pub fn naa_lokal() -> NaiveDateTime {
    naa_oslo().naive_local()
}
