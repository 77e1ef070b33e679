use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub port: u16,
    pub log_level: String,
    pub data_backend: String,
    pub hendelse_transport: String,
    pub hendelse_base_url: String,
    pub los_topic: String,
    pub vent_frist_uker: i64,
    pub saksnummer_stub: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let cfg = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("port", 8080)?
            .set_default("log_level", "info")?
            .set_default("data_backend", "memory")?
            .set_default("hendelse_transport", "memory")?
            .set_default("hendelse_base_url", "http://127.0.0.1:8082")?
            .set_default("los_topic", "privat-k9punsj-aksjonspunkthendelse-v1")?
            .set_default("vent_frist_uker", 3)?
            .set_default("saksnummer_stub", "133742069666")?
            .add_source(config::Environment::default().separator("__"))
            .build()?;
        cfg.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}
