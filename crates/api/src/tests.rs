use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt;

use punsj_domain::aksjonspunkt::{AksjonspunktKode, AksjonspunktStatus};
use punsj_domain::journalpost::{
    DokumentInfo, SafDatotype, SafJournalpost, SafJournalpostType, SafRelevantDato,
};
use punsj_domain::merge::UuidIdGenerator;
use punsj_domain::ports::aksjonspunkt::AksjonspunktRepository;
use punsj_domain::ports::journalpost::JournalpostRepository;
use punsj_domain::ports::person::Person;
use punsj_infra::config::AppConfig;
use punsj_infra::gateways::{InMemoryFagsakTjeneste, InMemoryPersonTjeneste, InMemorySafGateway};
use punsj_infra::hendelse::InMemoryHendelseProducer;
use punsj_infra::repositories::{
    InMemoryAksjonspunktRepository, InMemoryJournalpostRepository, InMemoryMappeRepository,
    InMemorySoknadRepository,
};

use crate::routes;
use crate::state::{AppState, Porter};

const OMS_UT: &str = "omsorgspengerutbetaling-soknad";
const OMS_KS: &str = "omsorgspenger-kronisk-sykt-barn-soknad";

fn test_config() -> AppConfig {
    AppConfig {
        app_env: "test".to_string(),
        port: 0,
        log_level: "info".to_string(),
        data_backend: "memory".to_string(),
        hendelse_transport: "memory".to_string(),
        hendelse_base_url: "http://127.0.0.1:8082".to_string(),
        los_topic: "privat-k9punsj-aksjonspunkthendelse-v1".to_string(),
        vent_frist_uker: 3,
        saksnummer_stub: "133742069666".to_string(),
    }
}

struct TestApp {
    app: Router,
    hendelser: InMemoryHendelseProducer,
    saf: InMemorySafGateway,
    journalposter: InMemoryJournalpostRepository,
    aksjonspunkter: InMemoryAksjonspunktRepository,
    personer: InMemoryPersonTjeneste,
}

fn test_app() -> TestApp {
    let config = test_config();
    let hendelser = InMemoryHendelseProducer::new();
    let saf = InMemorySafGateway::new();
    let journalposter = InMemoryJournalpostRepository::new();
    let aksjonspunkter = InMemoryAksjonspunktRepository::new();
    let personer = InMemoryPersonTjeneste::new();

    let porter = Porter {
        mappe_repo: Arc::new(InMemoryMappeRepository::new()),
        soknad_repo: Arc::new(InMemorySoknadRepository::new()),
        journalpost_repo: Arc::new(journalposter.clone()),
        aksjonspunkt_repo: Arc::new(aksjonspunkter.clone()),
        person_tjeneste: Arc::new(personer.clone()),
        fagsak_tjeneste: Arc::new(InMemoryFagsakTjeneste::new(config.saksnummer_stub.clone())),
        saf_gateway: Arc::new(saf.clone()),
        hendelse_producer: Arc::new(hendelser.clone()),
        id_generator: Arc::new(UuidIdGenerator),
    };

    let state = AppState::med_porter(config, porter);
    TestApp {
        app: routes::router(state),
        hendelser,
        saf,
        journalposter,
        aksjonspunkter,
        personer,
    }
}

async fn kall(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_med_ident(uri: &str, norsk_ident: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(routes::NORSK_IDENT_HEADER, norsk_ident)
        .body(Body::empty())
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn opprett_soknad(app: &TestApp, norsk_ident: &str, journalpost_id: &str) -> String {
    let (status, body) = kall(
        &app.app,
        json_request(
            "POST",
            &format!("/api/{OMS_UT}"),
            &json!({ "norskIdent": norsk_ident, "journalpostId": journalpost_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["soeknadId"].as_str().expect("soeknadId").to_string()
}

fn komplett_innhold(soknad_id: &str, norsk_ident: &str, journalpost_id: &str) -> Value {
    json!({
        "soeknadId": soknad_id,
        "soekerId": norsk_ident,
        "mottattDato": "2024-02-20",
        "klokkeslett": "11:15",
        "journalposter": [journalpost_id]
    })
}

#[tokio::test]
async fn tom_mappe_gir_tom_liste() {
    let app = test_app();
    let (status, body) = kall(
        &app.app,
        get_med_ident(&format!("/api/{OMS_UT}/mappe"), "01110050053"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["soknader"], json!([]));
}

#[tokio::test]
async fn opprette_ny_soknad_gir_201_med_generert_id() {
    let app = test_app();
    let soknad_id = opprett_soknad(&app, "01010050053", "J1").await;
    assert!(!soknad_id.is_empty());

    let (status, body) = kall(
        &app.app,
        get_med_ident(&format!("/api/{OMS_UT}/mappe"), "01010050053"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["soknader"][0]["journalposter"], json!(["J1"]));
    assert_eq!(body["soknader"][0]["sendtInn"], json!(false));
}

#[tokio::test]
async fn ny_innsending_for_samme_person_gjenbruker_utkastet() {
    let app = test_app();
    let forste = opprett_soknad(&app, "02020050163", "J1").await;
    let andre = opprett_soknad(&app, "02020050163", "J2").await;
    assert_eq!(forste, andre);

    let (_, body) = kall(
        &app.app,
        get_med_ident(&format!("/api/{OMS_UT}/mappe"), "02020050163"),
    )
    .await;
    assert_eq!(body["soknader"].as_array().unwrap().len(), 1);
    assert_eq!(body["soknader"][0]["journalposter"], json!(["J1", "J2"]));
}

#[tokio::test]
async fn oppdatering_reflekteres_i_utkastet() {
    let app = test_app();
    let soknad_id = opprett_soknad(&app, "02030050163", "J1").await;

    let (status, body) = kall(
        &app.app,
        json_request(
            "PUT",
            &format!("/api/{OMS_UT}/oppdater"),
            &komplett_innhold(&soknad_id, "02030050163", "J1"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["soekerId"], json!("02030050163"));
    assert_eq!(body["sendtInn"], json!(false));

    let (status, body) = kall(&app.app, get(&format!("/api/{OMS_UT}/mappe/{soknad_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["soknad"]["mottattDato"], json!("2024-02-20"));
}

#[tokio::test]
async fn oppdater_ukjent_soknad_gir_not_found() {
    let app = test_app();
    let (status, _) = kall(
        &app.app,
        json_request(
            "PUT",
            &format!("/api/{OMS_UT}/oppdater"),
            &komplett_innhold("finnes-ikke", "02030050163", "J1"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hent_ukjent_soknad_gir_no_content() {
    let app = test_app();
    let (status, _) = kall(&app.app, get(&format!("/api/{OMS_UT}/mappe/finnes-ikke"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn ukjent_soknadstype_avvises() {
    let app = test_app();
    let (status, _) = kall(
        &app.app,
        json_request(
            "POST",
            "/api/ukjent-soknad",
            &json!({ "norskIdent": "01010050053", "journalpostId": "J1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn send_gyldig_soknad_stenger_journalposten() {
    let app = test_app();
    let soknad_id = opprett_soknad(&app, "02020050123", "J1").await;
    kall(
        &app.app,
        json_request(
            "PUT",
            &format!("/api/{OMS_UT}/oppdater"),
            &komplett_innhold(&soknad_id, "02020050123", "J1"),
        ),
    )
    .await;

    let (status, body) = kall(
        &app.app,
        json_request(
            "POST",
            &format!("/api/{OMS_UT}/send"),
            &json!({ "norskIdent": "02020050123", "soeknad": soknad_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["feil"], json!([]));

    let (_, soknad) = kall(&app.app, get(&format!("/api/{OMS_UT}/mappe/{soknad_id}"))).await;
    assert_eq!(soknad["sendtInn"], json!(true));
    assert_eq!(soknad["saksnummer"], json!("133742069666"));

    let kan_sendes = app
        .journalposter
        .kan_sende_inn(&["J1".to_string()])
        .await
        .unwrap();
    assert!(!kan_sendes, "journalposten skal være stengt etter innsending");

    // The flag flips exactly once; a second send is rejected.
    let (status, _) = kall(
        &app.app,
        json_request(
            "POST",
            &format!("/api/{OMS_UT}/send"),
            &json!({ "norskIdent": "02020050123", "soeknad": soknad_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn send_med_manglende_felter_gir_feilliste() {
    let app = test_app();
    let soknad_id = opprett_soknad(&app, "02022352122", "J1").await;
    kall(
        &app.app,
        json_request(
            "PUT",
            &format!("/api/{OMS_UT}/oppdater"),
            &json!({ "soeknadId": soknad_id, "soekerId": "02022352122" }),
        ),
    )
    .await;

    let (status, body) = kall(
        &app.app,
        json_request(
            "POST",
            &format!("/api/{OMS_UT}/send"),
            &json!({ "norskIdent": "02022352122", "soeknad": soknad_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["feil"][0]["feilkode"], json!("mottattDato"));

    let (_, soknad) = kall(&app.app, get(&format!("/api/{OMS_UT}/mappe/{soknad_id}"))).await;
    assert_eq!(soknad["sendtInn"], json!(false));
}

#[tokio::test]
async fn feilet_publisering_blokkerer_innsendingen() {
    let app = test_app();
    let soknad_id = opprett_soknad(&app, "02020050123", "J1").await;
    kall(
        &app.app,
        json_request(
            "PUT",
            &format!("/api/{OMS_UT}/oppdater"),
            &komplett_innhold(&soknad_id, "02020050123", "J1"),
        ),
    )
    .await;

    app.hendelser.sett_feiler(true);
    let (status, _) = kall(
        &app.app,
        json_request(
            "POST",
            &format!("/api/{OMS_UT}/send"),
            &json!({ "norskIdent": "02020050123", "soeknad": soknad_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Local workflow state follows the event stream: the flag and the
    // journal entry are untouched when the publish never happened.
    let (_, soknad) = kall(&app.app, get(&format!("/api/{OMS_UT}/mappe/{soknad_id}"))).await;
    assert_eq!(soknad["sendtInn"], json!(false));
    assert!(soknad["saksnummer"].is_string());
    assert!(
        app.journalposter
            .kan_sende_inn(&["J1".to_string()])
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn valider_gir_en_feil_per_manglende_felt() {
    let app = test_app();
    let (status, body) = kall(
        &app.app,
        json_request(
            "POST",
            &format!("/api/{OMS_KS}/valider"),
            &json!({ "journalposter": ["J9"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let feilkoder: Vec<&str> = body["feil"]
        .as_array()
        .unwrap()
        .iter()
        .map(|feil| feil["feilkode"].as_str().unwrap())
        .collect();
    assert_eq!(feilkoder, vec!["mottattDato", "soekerId", "barn"]);
}

#[tokio::test]
async fn valider_godtar_komplett_soknad() {
    let app = test_app();
    let (status, body) = kall(
        &app.app,
        json_request(
            "POST",
            &format!("/api/{OMS_UT}/valider"),
            &json!({
                "soekerId": "02022352122",
                "mottattDato": "2024-02-20",
                "klokkeslett": "08:00",
                "journalposter": ["J9"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["feil"], json!([]));
}

#[tokio::test]
async fn vent_supersederer_punsjoppgaven() {
    let app = test_app();
    app.personer
        .registrer(Person {
            norsk_ident: "02030050163".to_string(),
            aktoer_id: "9916683336111".to_string(),
        })
        .await;
    let soknad_id = opprett_soknad(&app, "02030050163", "J1").await;

    let (status, _) = kall(
        &app.app,
        json_request(
            "POST",
            "/api/journalpost/J1/vent",
            &json!({ "soeknadId": soknad_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let alle = app.aksjonspunkter.hent_alle("J1").await.unwrap();
    assert_eq!(alle.len(), 2);
    let punsj = alle
        .iter()
        .find(|a| a.kode == AksjonspunktKode::Punsj)
        .unwrap();
    assert_eq!(punsj.status, AksjonspunktStatus::Utfoert);

    let siste: Value =
        serde_json::from_str(&app.hendelser.sendte().await.last().unwrap().data).unwrap();
    assert_eq!(siste["aktoerId"], json!("9916683336111"));
    assert_eq!(
        siste["aksjonspunktKoderMedStatusListe"]["MER_INFORMASJON"],
        json!("OPPR")
    );

    // Repeating the request while waiting is a logged no-op.
    let (status, _) = kall(
        &app.app,
        json_request(
            "POST",
            "/api/journalpost/J1/vent",
            &json!({ "soeknadId": soknad_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.aksjonspunkter.hent_alle("J1").await.unwrap().len(), 2);
}

fn saf_journalpost(har_tilgang: bool) -> SafJournalpost {
    SafJournalpost {
        journalpost_type: Some(SafJournalpostType::Inngaaende),
        journalstatus: Some("MOTTATT".to_string()),
        norsk_ident: Some("02030050163".to_string()),
        aktoer_id: None,
        dokumenter: vec![DokumentInfo {
            dokument_id: "470164680".to_string(),
        }],
        relevante_datoer: vec![SafRelevantDato {
            dato: NaiveDate::from_ymd_opt(2024, 2, 20)
                .unwrap()
                .and_hms_opt(11, 15, 0)
                .unwrap(),
            datotype: SafDatotype::DatoRegistrert,
        }],
        har_tilgang,
    }
}

#[tokio::test]
async fn journalpostinfo_viser_ventestatus() {
    let app = test_app();
    app.saf.registrer("J1", saf_journalpost(true)).await;
    let soknad_id = opprett_soknad(&app, "02030050163", "J1").await;
    kall(
        &app.app,
        json_request(
            "POST",
            "/api/journalpost/J1/vent",
            &json!({ "soeknadId": soknad_id }),
        ),
    )
    .await;

    let (status, body) = kall(&app.app, get("/api/journalpost/J1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dokumenter"][0]["dokumentId"], json!("470164680"));
    assert_eq!(body["kanSendeInn"], json!(true));
    assert_eq!(
        body["venter"]["venteAarsak"],
        json!("Venter på tilleggsinformasjon")
    );
}

#[tokio::test]
async fn journalpost_uten_tilgang_avvises() {
    let app = test_app();
    app.saf.registrer("J2", saf_journalpost(false)).await;

    let (status, _) = kall(&app.app, get("/api/journalpost/J2")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn ukjent_journalpost_gir_no_content() {
    let app = test_app();
    let (status, _) = kall(&app.app, get("/api/journalpost/finnes-ikke")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn sletting_av_mapper_stoettes_ikke() {
    let app = test_app();
    let (status, _) = kall(
        &app.app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/{OMS_UT}/send"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
