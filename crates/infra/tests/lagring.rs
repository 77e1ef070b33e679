use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use punsj_domain::error::DomainError;
use punsj_domain::mappe::{Innsending, JournalpostInnhold, MappeService};
use punsj_domain::merge::UuidIdGenerator;
use punsj_domain::soknad::{OppdaterSoknad, SoknadEntitet, SoknadService};
use punsj_domain::ytelse::FagsakYtelseType;
use punsj_infra::repositories::{InMemoryMappeRepository, InMemorySoknadRepository};

fn soknad_service() -> SoknadService {
    SoknadService::new(Arc::new(InMemorySoknadRepository::new()))
}

fn innsending(norsk_ident: &str, journalpost_id: &str) -> Innsending {
    Innsending {
        personer: BTreeMap::from([(
            norsk_ident.to_string(),
            JournalpostInnhold {
                journalpost_id: journalpost_id.to_string(),
                soknad: json!({}),
            },
        )]),
    }
}

#[tokio::test]
async fn opprett_med_samme_id_gir_konflikt() {
    let service = soknad_service();
    let soknad = SoknadEntitet::ny("S1", "M1", "01010050053");

    service.opprett(&soknad).await.unwrap();
    let resultat = service.opprett(&soknad).await;
    assert!(matches!(resultat, Err(DomainError::Conflict)));
}

#[tokio::test]
async fn oppdater_ukjent_id_gir_not_found() {
    let service = soknad_service();
    let resultat = service
        .oppdater(OppdaterSoknad {
            soknad_id: "finnes-ikke".to_string(),
            soknad: json!({}),
            journalposter: Default::default(),
            endret_av: None,
            saksnummer: None,
        })
        .await;
    assert!(matches!(resultat, Err(DomainError::NotFound)));
}

#[tokio::test]
async fn hent_ukjent_id_gir_tomt_resultat() {
    let service = soknad_service();
    assert!(service.hent("finnes-ikke").await.unwrap().is_none());
    assert!(service.hent_for_mappe("finnes-ikke").await.unwrap().is_empty());
}

#[tokio::test]
async fn oppdatering_roerer_ikke_sendt_inn() {
    let service = soknad_service();
    let soknad = SoknadEntitet::ny("S1", "M1", "01010050053");
    service.opprett(&soknad).await.unwrap();
    service.marker_sendt_inn("S1").await.unwrap();

    let oppdatert = service
        .oppdater(OppdaterSoknad {
            soknad_id: "S1".to_string(),
            soknad: json!({"mottattDato": "2024-02-20"}),
            journalposter: Default::default(),
            endret_av: Some("Z990404".to_string()),
            saksnummer: None,
        })
        .await
        .unwrap();

    assert!(oppdatert.sendt_inn);
    assert_eq!(oppdatert.endret_av.as_deref(), Some("Z990404"));
    assert!(oppdatert.endret_tid.is_some());
}

#[tokio::test]
async fn marker_sendt_inn_er_idempotent() {
    let service = soknad_service();
    service
        .opprett(&SoknadEntitet::ny("S1", "M1", "01010050053"))
        .await
        .unwrap();

    service.marker_sendt_inn("S1").await.unwrap();
    service.marker_sendt_inn("S1").await.unwrap();
    assert!(service.hent("S1").await.unwrap().unwrap().sendt_inn);

    let resultat = service.marker_sendt_inn("finnes-ikke").await;
    assert!(matches!(resultat, Err(DomainError::NotFound)));
}

#[tokio::test]
async fn siste_person_ut_fjerner_mappen() {
    let service = MappeService::new(
        Arc::new(InMemoryMappeRepository::new()),
        Arc::new(UuidIdGenerator),
    );

    let mappe = service
        .foerste_innsending(
            FagsakYtelseType::Omsorgspengerutbetaling,
            &innsending("01010050053", "J1"),
        )
        .await
        .unwrap();
    service
        .utfyllende_innsending(&mappe.mappe_id, &innsending("02020050163", "J2"))
        .await
        .unwrap();

    service.fjern(&mappe.mappe_id, "01010050053").await.unwrap();
    let gjenvaerende = service.hent(&mappe.mappe_id).await.unwrap().unwrap();
    assert_eq!(gjenvaerende.personer.len(), 1);

    service.fjern(&mappe.mappe_id, "02020050163").await.unwrap();
    assert!(service.hent(&mappe.mappe_id).await.unwrap().is_none());
}

#[tokio::test]
async fn utfyllende_innsending_paa_ukjent_mappe_gir_tomt_svar() {
    let service = MappeService::new(
        Arc::new(InMemoryMappeRepository::new()),
        Arc::new(UuidIdGenerator),
    );
    let resultat = service
        .utfyllende_innsending("finnes-ikke", &innsending("01010050053", "J1"))
        .await
        .unwrap();
    assert!(resultat.is_none());
}
