// ezmin - post-bundle asset minifier
// Library surface shared by the CLI and the integration tests

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod plugins;
pub mod utils;
