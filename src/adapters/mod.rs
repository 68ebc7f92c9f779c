//! Adapters - implementations of ports against concrete technology.

pub mod admission;
pub mod http;
pub mod postgres;
pub mod websocket;
