//! Helpers for tests: throwaway SQLite databases, and in-memory stand-ins for the order source and the notification
//! sink.
pub mod doubles;
pub mod prepare_env;
