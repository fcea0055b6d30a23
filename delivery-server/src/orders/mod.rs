//! Order Lifecycle Domain
//!
//! The one part of the system with real invariants:
//!
//! - [`status`] — the canonical state machine (transition legality,
//!   per-stage timestamp fields, default history notes)
//! - [`engine`] — validates and applies transitions against the stores
//! - [`assignment`] — driver binding rules and availability side effects
//! - [`board`] — read-side projection into the three dashboard columns
//! - [`timeline`] — customer-facing progress steps, derived per read
//! - [`money`] — decimal-precise totals and item validation

pub mod assignment;
pub mod board;
pub mod engine;
pub mod error;
pub mod money;
pub mod status;
pub mod timeline;

pub use assignment::AssignmentResolver;
pub use board::{BoardProjector, BoardView, OrderView};
pub use engine::{CreateOrderInput, LifecycleEngine, OrderItemInput};
pub use error::{LifecycleError, LifecycleResult};
pub use timeline::{TimelineStep, build_timeline};
