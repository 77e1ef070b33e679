use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use metrics::counter;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::warn;

use punsj_domain::DomainResult;
use punsj_domain::error::DomainError;
use punsj_domain::ports::BoxFuture;
use punsj_domain::ports::hendelse::HendelseProducer;

const HENDELSER_PUBLISERT_TOTAL: &str = "punsj_hendelser_publisert_total";
const HENDELSER_FEILET_TOTAL: &str = "punsj_hendelser_feilet_total";

/// Publishes events to the work-queue bridge over HTTP. A 2xx response is the
/// acknowledgment; anything else blocks the caller's local commit. Retries are
/// the bridge's responsibility.
#[derive(Clone)]
pub struct HttpHendelseProducer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpHendelseProducer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl HendelseProducer for HttpHendelseProducer {
    fn send(&self, topic: &str, key: &str, data: &str) -> BoxFuture<'_, DomainResult<()>> {
        let url = format!("{}/topics/{topic}", self.base_url);
        let topic = topic.to_string();
        let key = key.to_string();
        let data = data.to_string();
        let client = self.client.clone();
        Box::pin(async move {
            let respons = client
                .post(&url)
                .json(&json!({ "records": [{ "key": key, "value": data }] }))
                .send()
                .await
                .map_err(|err| {
                    counter!(HENDELSER_FEILET_TOTAL, "topic" => topic.clone()).increment(1);
                    DomainError::Publish(err.to_string())
                })?;

            if !respons.status().is_success() {
                counter!(HENDELSER_FEILET_TOTAL, "topic" => topic.clone()).increment(1);
                warn!(%topic, status = %respons.status(), "hendelse ble ikke bekreftet");
                return Err(DomainError::Publish(format!(
                    "uventet status {}",
                    respons.status()
                )));
            }

            counter!(HENDELSER_PUBLISERT_TOTAL, "topic" => topic).increment(1);
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendtHendelse {
    pub topic: String,
    pub key: String,
    pub data: String,
}

/// Transport double used by the memory backend and the test suites. Records
/// every acknowledged event and can be flipped into a failing state.
#[derive(Clone, Default)]
pub struct InMemoryHendelseProducer {
    sendte: Arc<RwLock<Vec<SendtHendelse>>>,
    feiler: Arc<AtomicBool>,
}

impl InMemoryHendelseProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sett_feiler(&self, feiler: bool) {
        self.feiler.store(feiler, Ordering::SeqCst);
    }

    pub async fn sendte(&self) -> Vec<SendtHendelse> {
        self.sendte.read().await.clone()
    }
}

impl HendelseProducer for InMemoryHendelseProducer {
    fn send(&self, topic: &str, key: &str, data: &str) -> BoxFuture<'_, DomainResult<()>> {
        let hendelse = SendtHendelse {
            topic: topic.to_string(),
            key: key.to_string(),
            data: data.to_string(),
        };
        let sendte = self.sendte.clone();
        let feiler = self.feiler.clone();
        Box::pin(async move {
            if feiler.load(Ordering::SeqCst) {
                counter!(HENDELSER_FEILET_TOTAL, "topic" => hendelse.topic).increment(1);
                return Err(DomainError::Publish("transporten er nede".into()));
            }
            counter!(HENDELSER_PUBLISERT_TOTAL, "topic" => hendelse.topic.clone()).increment(1);
            sendte.write().await.push(hendelse);
            Ok(())
        })
    }
}
