//! Pitchside - Live Sports Commentary Backend
//!
//! This crate ingests match and commentary writes over HTTP and fans the
//! committed events out in real time to WebSocket viewers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
