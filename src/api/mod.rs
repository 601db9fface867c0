//! HTTP surface: the health handler, the router that hosts it, and the
//! middleware shared by every route.

pub mod health;
pub mod request_id;
pub mod router;

pub use router::router;
