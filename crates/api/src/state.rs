use std::sync::Arc;

use punsj_domain::aksjonspunkt::AksjonspunktService;
use punsj_domain::journalpost::JournalpostService;
use punsj_domain::mappe::MappeService;
use punsj_domain::merge::{IdGenerator, UuidIdGenerator};
use punsj_domain::ports::aksjonspunkt::AksjonspunktRepository;
use punsj_domain::ports::fagsak::FagsakTjeneste;
use punsj_domain::ports::hendelse::HendelseProducer;
use punsj_domain::ports::journalpost::JournalpostRepository;
use punsj_domain::ports::mappe::MappeRepository;
use punsj_domain::ports::person::PersonTjeneste;
use punsj_domain::ports::saf::SafGateway;
use punsj_domain::ports::soknad::SoknadRepository;
use punsj_domain::soknad::SoknadService;
use punsj_infra::config::AppConfig;
use punsj_infra::gateways::{InMemoryFagsakTjeneste, InMemoryPersonTjeneste, InMemorySafGateway};
use punsj_infra::hendelse::{HttpHendelseProducer, InMemoryHendelseProducer};
use punsj_infra::repositories::{
    InMemoryAksjonspunktRepository, InMemoryJournalpostRepository, InMemoryMappeRepository,
    InMemorySoknadRepository,
};

/// Every seam the services depend on. Production wiring and the test suites
/// build this with different backings.
pub struct Porter {
    pub mappe_repo: Arc<dyn MappeRepository>,
    pub soknad_repo: Arc<dyn SoknadRepository>,
    pub journalpost_repo: Arc<dyn JournalpostRepository>,
    pub aksjonspunkt_repo: Arc<dyn AksjonspunktRepository>,
    pub person_tjeneste: Arc<dyn PersonTjeneste>,
    pub fagsak_tjeneste: Arc<dyn FagsakTjeneste>,
    pub saf_gateway: Arc<dyn SafGateway>,
    pub hendelse_producer: Arc<dyn HendelseProducer>,
    pub id_generator: Arc<dyn IdGenerator>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub mappe_service: MappeService,
    pub soknad_service: SoknadService,
    pub journalpost_service: JournalpostService,
    pub aksjonspunkt_service: AksjonspunktService,
    pub person_tjeneste: Arc<dyn PersonTjeneste>,
    pub fagsak_tjeneste: Arc<dyn FagsakTjeneste>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        if !config.data_backend.eq_ignore_ascii_case("memory") {
            anyhow::bail!("unsupported data backend: {}", config.data_backend);
        }

        let hendelse_producer: Arc<dyn HendelseProducer> =
            match config.hendelse_transport.as_str() {
                "http" => Arc::new(HttpHendelseProducer::new(config.hendelse_base_url.clone())),
                _ => Arc::new(InMemoryHendelseProducer::new()),
            };

        let porter = Porter {
            mappe_repo: Arc::new(InMemoryMappeRepository::new()),
            soknad_repo: Arc::new(InMemorySoknadRepository::new()),
            journalpost_repo: Arc::new(InMemoryJournalpostRepository::new()),
            aksjonspunkt_repo: Arc::new(InMemoryAksjonspunktRepository::new()),
            person_tjeneste: Arc::new(InMemoryPersonTjeneste::new()),
            fagsak_tjeneste: Arc::new(InMemoryFagsakTjeneste::new(config.saksnummer_stub.clone())),
            saf_gateway: Arc::new(InMemorySafGateway::new()),
            hendelse_producer,
            id_generator: Arc::new(UuidIdGenerator),
        };

        Ok(Self::med_porter(config, porter))
    }

    pub fn med_porter(config: AppConfig, porter: Porter) -> Self {
        let mappe_service = MappeService::new(porter.mappe_repo, porter.id_generator);
        let soknad_service = SoknadService::new(porter.soknad_repo.clone());
        let journalpost_service =
            JournalpostService::new(porter.journalpost_repo.clone(), porter.saf_gateway);
        let aksjonspunkt_service = AksjonspunktService::new(
            porter.aksjonspunkt_repo,
            porter.journalpost_repo,
            porter.soknad_repo,
            porter.person_tjeneste.clone(),
            porter.hendelse_producer,
            config.los_topic.clone(),
            config.vent_frist_uker,
        );

        Self {
            config,
            mappe_service,
            soknad_service,
            journalpost_service,
            aksjonspunkt_service,
            person_tjeneste: porter.person_tjeneste,
            fagsak_tjeneste: porter.fagsak_tjeneste,
        }
    }
}
