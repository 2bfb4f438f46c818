//! Salt configuration viewer.
//!
//! Two views with drill-down navigation between them:
//!
//! - the servers list, restricted to servers managed by Salt
//! - the states applied to one server, grouped by role then by SLS unit,
//!   with state arguments dumped recursively and `salt://` sources linked
//!   to the repository browser
//!
//! ## Module Map
//!
//! | Module    | Responsibility                                         |
//! |-----------|--------------------------------------------------------|
//! | `servers` | `Server`, `ServerList` (order-preserving), list view   |
//! | `states`  | `StatesView`, `SaltLinks`, recursive `dump`            |
//! | `client`  | `SaltClient` fetching the servers list and states      |

mod client;
mod servers;
mod states;

pub use client::{DEFAULT_SERVERS_API_URL, SaltClient};
pub use servers::{Server, ServerList, format_servers};
pub use states::{
    DEFAULT_DOC_STATES_URL, DEFAULT_SALT_BASE_URL, DEFAULT_SALT_STAGING_URL, SaltLinks, StatesView,
    extract_method, is_in_staging_repo, make_id,
};
