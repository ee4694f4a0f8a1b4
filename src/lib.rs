pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pool;
pub mod request;
pub mod server;
pub mod stdin;
pub mod text;

pub use client::TextClient;
pub use config::{ConnectionConfig, Scheme, ServerConfig};
pub use error::{Error, Result};
pub use pool::{ResultFuture, WorkerPool, WorkerSnapshot, WorkerState};
pub use request::{Method, RequestDescriptor, ResponseRecord};
pub use server::create_app;
