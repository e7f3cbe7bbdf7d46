pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod services;
pub mod transport;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use services::{Notice, SessionController};
