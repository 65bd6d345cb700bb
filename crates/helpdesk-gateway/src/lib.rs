//! # helpdesk-gateway
//!
//! Real-time presence and message relay over WebSocket.
//!
//! Clients open `/socket`, announce who they are with `addUser`, and from then
//! on receive presence snapshots and messages addressed to them.

pub mod connection;
pub mod hub;
pub mod presence;
pub mod protocol;
pub mod relay;
pub mod server;

pub use server::{create_app, create_gateway_state, run};
