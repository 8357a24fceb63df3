//! Waystone Engine library.
//!
//! Delayed, interruptible teleports for players in a tick-driven world.
//!
//! ## Structure
//!
//! - `use_cases/` - Teleport scheduling and player lifecycle hooks
//! - `stores/` - In-memory runtime state (profiles, pending teleports)
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - Operator console entry point
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
