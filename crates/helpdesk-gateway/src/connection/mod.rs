//! Connection management
//!
//! Tracks open transport connections and their outbound queues.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState, Delivery};
pub use manager::{BroadcastReport, ConnectionManager};
