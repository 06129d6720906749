// Built-in plugins for ezmin

pub mod minify_plugin;

pub use minify_plugin::AssetMinifyPlugin;
