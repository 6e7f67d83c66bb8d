//! Server plumbing shared by the `api`, `db`, `services` and `migration`
//! crates.

pub mod config;
pub mod paths;
pub mod state;
pub mod system_health;
pub mod test_helpers;
pub mod ws;
