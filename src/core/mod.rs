// Core domain layer
pub mod interfaces;
pub mod manifest;
pub mod models;
pub mod plugin;
pub mod services;

pub use interfaces::*;
pub use manifest::*;
pub use models::*;
pub use plugin::*;
pub use services::*;
