pub mod availability;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod service;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use repository::*;
pub use service::*;
