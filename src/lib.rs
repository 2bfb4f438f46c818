pub mod decorator;
pub mod errors;
pub mod http;
pub mod logging;
pub mod registry;
pub mod salt;
pub mod server;
pub mod widgets_config;
