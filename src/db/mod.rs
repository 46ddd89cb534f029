pub mod account_repository;
pub mod connection;
pub mod job_repository;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod store;

pub use account_repository::AccountRepository;
pub use job_repository::JobRepository;
pub use memory::MemoryStore;
pub use store::{AccountStore, JobStore};
