use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub dataset_path: String,
    pub bind_addr: String,
    pub seed_items: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://annotator.db?mode=rwc".to_string());
        let dataset_path =
            std::env::var("DATASET_PATH").unwrap_or_else(|_| "dataset.json".to_string());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Only consulted when the dataset file does not exist yet.
        let seed_items = match std::env::var("SEED_ITEMS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("SEED_ITEMS must be an integer, got {v:?}"))?,
            Err(_) => 1000,
        };

        Ok(Self {
            database_url,
            dataset_path,
            bind_addr,
            seed_items,
        })
    }
}
