//! Request pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! axum handler
//!     → driver.rs (Pipeline::handle)
//!     → context.rs (RequestContext, owned for one request)
//!     → stage.rs (Stage list from the route; Flow::Continue / Flow::Respond)
//!     → Forwarder or local handler
//! ```
//!
//! # Design Decisions
//! - The pipeline is immutable and shared; per-request state lives in the context
//! - A stage that responds ends the request; later stages never run
//! - Stages are a closed enum, dispatched by the driver

pub mod context;
pub mod driver;
pub mod stage;

pub use context::RequestContext;
pub use driver::{MatchedRoute, Pipeline};
pub use stage::{Flow, Stage};
