//! The Quillpad HTTP server.
//!
//! Wires the authorization gates from `quillpad-auth` and the cache-aside
//! store around a primary-store backend, and exposes the notes CRUD surface
//! plus the host pages. See `routes::build_router` for the full surface and
//! middleware ordering.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{QuillpadServer, ServerBuilder};
