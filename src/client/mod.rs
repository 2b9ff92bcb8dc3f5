//! Backend Client Module
//!
//! Typed access to the clinic REST backend. Callers only ever see
//! canonical payloads and [`ApiError`](crate::error::ApiError).

pub mod envelope;
mod rest;

pub use rest::{ClientConfig, RestClient};
