//! gated library - exposes the router for integration tests

pub mod routes;
pub mod server;
