//! Vendor lifecycle, discount audit log and vendor pricing services.
//!
//! Services persist through a [`store::VendorStore`], either `PostgreSQL` or an
//! in-process store, and delegate all price arithmetic to the `vendora` engine.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;
pub mod store;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
