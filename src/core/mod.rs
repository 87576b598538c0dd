//! # Core Application Logic
//!
//! The client's state layer. It knows nothing about how offers are drawn
//! on screen.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (3 slices)     │
//!                    │  • Action (transitions) │
//!                    │  • update() (reducer)   │
//!                    │  • Selectors (derived)  │
//!                    │  • Effects (async ops)  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    CLI     │      │    API     │      │   Token    │
//!     │  (main.rs) │      │  Gateway   │      │   Store    │
//!     │            │      │ (reqwest)  │      │  (file)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `RootState` and its slices
//! - [`action`]: the `Action` enum and `update()`
//! - [`store`]: the owned state container views bind to
//! - [`selectors`]: memoized derived reads
//! - [`effects`]: async operations that call the API and dispatch
//! - [`validation`]: form checks done before any request
//! - [`config`]: settings resolution

pub mod action;
pub mod config;
pub mod effects;
pub mod selectors;
pub mod state;
pub mod store;
pub mod validation;

pub use action::{Action, Effect, update};
pub use state::{AuthStatus, RootState};
pub use store::{Store, ViewState};
