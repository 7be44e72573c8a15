pub mod payload_store;

pub use payload_store::{slugify, PayloadStore, StoredPaths};
