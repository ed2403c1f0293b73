//! In-memory storage backend.
//!
//! Records live in a `BTreeMap` behind an `Arc<RwLock<_>>` and identities come
//! from an atomic sequence. Nothing is persisted.

mod repository;

pub use repository::InMemoryRepository;
