//! Backend implementations of the engine ports.

pub mod http;

pub use http::HttpBackend;
