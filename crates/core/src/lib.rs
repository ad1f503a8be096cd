//! Vendora
//!
//! Vendora resolves the discount and price a vendor pays for a product. A vendor's
//! terms are a default discount, per-product overrides added on top of it, and
//! bulk quantity tiers that can supersede both.

pub mod percent;
pub mod prelude;
pub mod products;
pub mod resolver;
pub mod tiers;
pub mod vendors;
