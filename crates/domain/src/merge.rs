use serde_json::{Map, Value};

use crate::util;

/// Id source for merge stamping. Injectable so tests can pin generated ids.
pub trait IdGenerator: Send + Sync {
    fn neste_id(&self) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn neste_id(&self) -> String {
        util::ny_uuid()
    }
}

/// Deep union of two document trees. A key present in `ny` wins, also when its
/// value is an explicit null; keys only present in `eksisterende` pass through.
/// Arrays and scalars are replaced wholesale.
pub fn dyp_merge(eksisterende: &Value, ny: &Value) -> Value {
    match (eksisterende, ny) {
        (Value::Object(gammel), Value::Object(oppdatert)) => {
            let mut resultat: Map<String, Value> = gammel.clone();
            for (nokkel, verdi) in oppdatert {
                match gammel.get(nokkel) {
                    Some(forrige) => {
                        resultat.insert(nokkel.clone(), dyp_merge(forrige, verdi));
                    }
                    None => {
                        resultat.insert(nokkel.clone(), verdi.clone());
                    }
                }
            }
            Value::Object(resultat)
        }
        (_, nytt) => nytt.clone(),
    }
}

/// Stamps a generated `"id"` on the document when it lacks one. Only object
/// documents are stamped; a present id is never replaced.
pub fn stemple_id(soknad: &Value, ids: &dyn IdGenerator) -> Value {
    match soknad {
        Value::Object(felter) if !felter.contains_key("id") => {
            let mut med_id = felter.clone();
            med_id.insert("id".to_string(), Value::String(ids.neste_id()));
            Value::Object(med_id)
        }
        annet => annet.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct FastId(&'static str);

    impl IdGenerator for FastId {
        fn neste_id(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn nye_nokler_vinner_og_gamle_bevares() {
        let gammel = json!({"a": 1, "b": {"c": 2, "d": 3}});
        let ny = json!({"b": {"c": 9}, "e": 4});
        let resultat = dyp_merge(&gammel, &ny);
        assert_eq!(resultat, json!({"a": 1, "b": {"c": 9, "d": 3}, "e": 4}));
    }

    #[test]
    fn eksplisitt_null_overskriver() {
        let gammel = json!({"a": 1});
        let ny = json!({"a": null});
        assert_eq!(dyp_merge(&gammel, &ny), json!({"a": null}));
    }

    #[test]
    fn array_erstattes_i_sin_helhet() {
        let gammel = json!({"perioder": [1, 2, 3]});
        let ny = json!({"perioder": [4]});
        assert_eq!(dyp_merge(&gammel, &ny), json!({"perioder": [4]}));
    }

    #[test]
    fn id_stemples_bare_naar_den_mangler() {
        let uten = json!({"a": 1});
        let stemplet = stemple_id(&uten, &FastId("id-1"));
        assert_eq!(stemplet, json!({"a": 1, "id": "id-1"}));

        let med = json!({"id": "original", "a": 1});
        assert_eq!(stemple_id(&med, &FastId("id-2")), med);
    }
}
