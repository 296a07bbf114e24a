use async_trait::async_trait;
use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, Page, PageRequest};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity, failing with DuplicateKey when its unique key is taken
    async fn create(&self, entity: &Entity) -> LibraryResult<Entity>;

    // replaces the entity stored under the given key
    async fn update(&self, key: &str, entity: &Entity) -> LibraryResult<Entity>;

    // get an entity
    async fn get(&self, key: &str) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, key: &str) -> LibraryResult<usize>;

    // one sorted page along with the total count
    async fn find_all(&self, req: &PageRequest) -> LibraryResult<Page<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    Memory,
    DynamoDB,
    LocalDynamoDB,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.as_str() {
            "dynamodb" => RepositoryStore::DynamoDB,
            "local-dynamodb" => RepositoryStore::LocalDynamoDB,
            _ => RepositoryStore::Memory,
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::Memory => write!(f, "memory"),
            RepositoryStore::DynamoDB => write!(f, "dynamodb"),
            RepositoryStore::LocalDynamoDB => write!(f, "local-dynamodb"),
        }
    }
}
