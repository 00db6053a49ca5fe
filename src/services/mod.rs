// Service exports
pub mod postgres;
pub mod store;

pub use postgres::PgCandidateStore;
pub use store::{CandidateStore, MemoryStore, StoreError};
