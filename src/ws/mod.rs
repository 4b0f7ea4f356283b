//! WebSocket session layer

pub mod handler;
pub mod protocol;
