// Processors module
pub mod css_processor;
pub mod minifier;

pub use css_processor::*;
pub use minifier::*;
