//! Monetization ("mint") entities.

mod organization;

pub use organization::Organization;
