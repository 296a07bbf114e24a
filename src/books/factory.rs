use std::sync::Arc;
use tracing::warn;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub async fn create_book_repository(config: &Configuration) -> Arc<dyn BookRepository> {
    match config.store {
        RepositoryStore::Memory => {
            Arc::new(MemoryBookRepository::new())
        }
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config).await;
            Arc::new(DDBBookRepository::new(client, config.table_name.as_str(), config.sequence_table_name().as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config).await;
            // tables usually exist already after the first start
            if let Err(err) = create_table(&client, config.table_name.as_str(), "isbn").await {
                warn!("skipped creating {} table: {}", config.table_name, err);
            }
            if let Err(err) = create_table(&client, config.sequence_table_name().as_str(), "name").await {
                warn!("skipped creating {} table: {}", config.sequence_table_name(), err);
            }
            Arc::new(DDBBookRepository::new(client, config.table_name.as_str(), config.sequence_table_name().as_str()))
        }
    }
}
