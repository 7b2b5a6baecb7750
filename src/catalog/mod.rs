//! Static lookup tables: carrier names, airport coordinates and the mock
//! route table. Loaded once at startup and shared read-only afterwards.

mod error;
mod loader;
mod types;

pub use error::CatalogError;
pub use loader::Catalog;
