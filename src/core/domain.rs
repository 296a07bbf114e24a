use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::repository::RepositoryStore;

pub const DEFAULT_PAGE_SIZE: usize = 50;

// Configuration abstracts config options for the books service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub store: RepositoryStore,
    pub table_name: String,
    pub ddb_endpoint: String,
    pub listen_addr: String,
    pub log_level: String,
    pub max_page_size: usize,
    pub lambda: bool,
}

impl Configuration {
    pub fn new(store: RepositoryStore) -> Self {
        Configuration {
            store,
            table_name: "books".to_string(),
            ddb_endpoint: "http://localhost:8000".to_string(),
            listen_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            max_page_size: DEFAULT_PAGE_SIZE,
            lambda: false,
        }
    }

    pub fn from_env() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    // unknown or malformed values fall back to the defaults
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let store = vars.get("BOOKS_STORE")
            .map(|s| RepositoryStore::from(s.clone()))
            .unwrap_or(RepositoryStore::Memory);
        let mut config = Configuration::new(store);
        if let Some(table_name) = vars.get("BOOKS_TABLE") {
            config.table_name = table_name.to_string();
        }
        if let Some(endpoint) = vars.get("BOOKS_DDB_ENDPOINT") {
            config.ddb_endpoint = endpoint.to_string();
        }
        if let Some(addr) = vars.get("BOOKS_LISTEN_ADDR") {
            config.listen_addr = addr.to_string();
        }
        if let Some(level) = vars.get("BOOKS_LOG_LEVEL") {
            config.log_level = level.to_lowercase();
        }
        if let Some(size) = vars.get("BOOKS_MAX_PAGE_SIZE").and_then(|s| s.parse::<usize>().ok()) {
            if size > 0 {
                config.max_page_size = size;
            }
        }
        config.lambda = vars.contains_key("AWS_LAMBDA_FUNCTION_NAME");
        config
    }

    pub fn sequence_table_name(&self) -> String {
        format!("{}_sequence", self.table_name)
    }
}
