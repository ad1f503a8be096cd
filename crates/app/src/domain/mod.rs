//! Vendora Domain Concerns

pub mod discount_history;
pub mod pricing;
pub mod users;
pub mod validation;
pub mod vendors;
