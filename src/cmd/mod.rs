//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                 |
//! |------------|----------------------------------|
//! | `decorate` | `Decorate`                       |
//! | `widgets`  | `Registry`, `Servers`, `States`  |
//! | `serve`    | `Serve`                          |
//! | `config`   | `Config`                         |

pub mod config;
pub mod decorate;
pub mod serve;
pub mod widgets;

pub use config::cmd_config;
pub use decorate::cmd_decorate;
pub use serve::cmd_serve;
pub use widgets::{cmd_registry, cmd_servers, cmd_states};
