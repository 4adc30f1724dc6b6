//! Infrastructure layer - SeaORM storage and the in-memory store

pub mod memory;
pub mod storage;

pub use memory::{InMemoryStoreFactory, InMemoryTenantDb, InMemoryTenantRepository};
pub use storage::{SeaOrmTenantRepository, SeaOrmTenantStoreFactory};
