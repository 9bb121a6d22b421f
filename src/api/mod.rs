//! API server module for serving legal question answering and document services via REST

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use routes::build_router;
pub use server::serve_api;
