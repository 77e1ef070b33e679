use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use punsj_domain::error::DomainError;
use punsj_domain::mappe::{Innsending, JournalpostInnhold, legg_i_mappe};
use punsj_domain::merge::IdGenerator;
use punsj_domain::ytelse::FagsakYtelseType;

struct TellendeId {
    teller: AtomicUsize,
}

impl TellendeId {
    fn ny() -> Self {
        Self {
            teller: AtomicUsize::new(0),
        }
    }
}

impl IdGenerator for TellendeId {
    fn neste_id(&self) -> String {
        format!("id-{}", self.teller.fetch_add(1, Ordering::SeqCst))
    }
}

fn innsending(norsk_ident: &str, journalpost_id: &str, soknad: Value) -> Innsending {
    Innsending {
        personer: BTreeMap::from([(
            norsk_ident.to_string(),
            JournalpostInnhold {
                journalpost_id: journalpost_id.to_string(),
                soknad,
            },
        )]),
    }
}

#[test]
fn samme_innsending_to_ganger_er_idempotent() {
    let ids = TellendeId::ny();
    let soknad = json!({"soekerId": "01010050053", "barn": {"norskIdent": "22110089275"}});
    let forste = innsending("01010050053", "J1", soknad.clone());

    let mappe = legg_i_mappe(
        None,
        &forste,
        Some(FagsakYtelseType::Omsorgspengerutbetaling),
        &ids,
    )
    .unwrap();
    let igjen = legg_i_mappe(Some(&mappe), &forste, None, &ids).unwrap();

    let person_foer = &mappe.personer["01010050053"];
    let person_etter = &igjen.personer["01010050053"];
    assert_eq!(person_foer.soknad, person_etter.soknad);
    assert_eq!(person_foer.innsendinger, person_etter.innsendinger);
    // The generated document id was stamped exactly once.
    assert_eq!(person_etter.soknad["id"], json!("id-0"));
}

#[test]
fn journalpostsettet_er_kommutativt() {
    let ids = TellendeId::ny();
    let s1 = innsending("01010050053", "J1", json!({"a": 1}));
    let s2 = innsending("01010050053", "J2", json!({"b": 2}));

    let en_to = {
        let mappe = legg_i_mappe(
            None,
            &s1,
            Some(FagsakYtelseType::PleiepengerSyktBarn),
            &ids,
        )
        .unwrap();
        legg_i_mappe(Some(&mappe), &s2, None, &ids).unwrap()
    };
    let to_en = {
        let mappe = legg_i_mappe(
            None,
            &s2,
            Some(FagsakYtelseType::PleiepengerSyktBarn),
            &ids,
        )
        .unwrap();
        legg_i_mappe(Some(&mappe), &s1, None, &ids).unwrap()
    };

    assert_eq!(
        en_to.personer["01010050053"].innsendinger,
        to_en.personer["01010050053"].innsendinger
    );
}

#[test]
fn ny_mappe_krever_ytelse() {
    let ids = TellendeId::ny();
    let resultat = legg_i_mappe(None, &innsending("01010050053", "J1", json!({})), None, &ids);
    assert!(matches!(resultat, Err(DomainError::ManglerYtelse)));
}

#[test]
fn ytelsen_er_uforanderlig_etter_opprettelse() {
    let ids = TellendeId::ny();
    let mappe = legg_i_mappe(
        None,
        &innsending("01010050053", "J1", json!({})),
        Some(FagsakYtelseType::PleiepengerSyktBarn),
        &ids,
    )
    .unwrap();

    let oppdatert = legg_i_mappe(
        Some(&mappe),
        &innsending("01010050053", "J2", json!({})),
        Some(FagsakYtelseType::Omsorgspengerutbetaling),
        &ids,
    )
    .unwrap();

    assert_eq!(oppdatert.ytelse, FagsakYtelseType::PleiepengerSyktBarn);
    assert_eq!(oppdatert.mappe_id, mappe.mappe_id);
}

#[test]
fn nye_felter_vinner_og_gamle_bevares() {
    let ids = TellendeId::ny();
    let mappe = legg_i_mappe(
        None,
        &innsending(
            "01010050053",
            "J1",
            json!({"barn": {"norskIdent": "22110089275", "navn": "Ola"}, "perioder": [1]}),
        ),
        Some(FagsakYtelseType::OmsorgspengerKroniskSyktBarn),
        &ids,
    )
    .unwrap();

    let oppdatert = legg_i_mappe(
        Some(&mappe),
        &innsending(
            "01010050053",
            "J2",
            json!({"barn": {"navn": "Kari"}, "mottattDato": "2024-02-20"}),
        ),
        None,
        &ids,
    )
    .unwrap();

    let soknad = &oppdatert.personer["01010050053"].soknad;
    assert_eq!(soknad["barn"]["navn"], json!("Kari"));
    assert_eq!(soknad["barn"]["norskIdent"], json!("22110089275"));
    assert_eq!(soknad["perioder"], json!([1]));
    assert_eq!(soknad["mottattDato"], json!("2024-02-20"));
    assert_eq!(soknad["id"], mappe.personer["01010050053"].soknad["id"]);
}

#[test]
fn flere_personer_holder_hver_sin_soknad() {
    let ids = TellendeId::ny();
    let begge = Innsending {
        personer: BTreeMap::from([
            (
                "01010050053".to_string(),
                JournalpostInnhold {
                    journalpost_id: "J1".to_string(),
                    soknad: json!({"soekerId": "01010050053"}),
                },
            ),
            (
                "02020050163".to_string(),
                JournalpostInnhold {
                    journalpost_id: "J1".to_string(),
                    soknad: json!({"soekerId": "02020050163"}),
                },
            ),
        ]),
    };

    let mappe = legg_i_mappe(
        None,
        &begge,
        Some(FagsakYtelseType::Omsorgspengerutbetaling),
        &ids,
    )
    .unwrap();

    assert_eq!(mappe.personer.len(), 2);
    assert_ne!(
        mappe.personer["01010050053"].soknad["id"],
        mappe.personer["02020050163"].soknad["id"]
    );
}
