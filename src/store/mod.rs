//! File-backed stores for the metering API.
//!
//! Both stores hold a whole-store lock around every read-modify-write and
//! persist through an injected backend: JSON files in production, memory in
//! tests.

pub mod accounts;
pub mod json_file;
pub mod readings;

pub use accounts::{AccountBackend, AccountStore, JsonFileBackend, MemoryBackend, Upserted};
pub use readings::{JsonDirBackend, MemoryReadings, ReadingsBackend, ReadingsLog};
