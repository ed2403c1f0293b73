//! Functional core for notifyd.
//!
//! Pure domain types, trait seams for the external collaborators (record store,
//! cache, lock backend, event topic) and the error taxonomy shared by every
//! backend. Nothing in this crate performs I/O.

pub mod cache;
pub mod events;
pub mod lock;
pub mod notification;
pub mod service;
pub mod storage;
