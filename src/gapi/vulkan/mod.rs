pub mod builder;
pub mod config;
pub mod debug;
pub mod driver;
pub mod entry;
pub mod errors;
pub mod extensions;
pub mod instance;
pub mod layers;
pub mod surface;
