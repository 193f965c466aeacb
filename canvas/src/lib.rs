//! Layout editing engine for the court planner.
//!
//! This crate owns everything that happens on the facility floor plan: the
//! placed elements (courts and zones), the pan/zoom camera, hit-testing, the
//! drag-session model for move and resize gestures, and the geometry math
//! those gestures rely on. It draws nothing. A host layer feeds it pointer and
//! keyboard events and processes the [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Input state machine and the [`engine::EngineCore`] that owns the layout |
//! | [`doc`] | Element types and the in-memory layout store |
//! | [`geometry`] | Body-frame basis, move and resize math, rotation toggle |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the drag session |
//! | [`hit`] | Hit-testing against element bodies and resize handles |
//! | [`consts`] | Shared numeric constants (scale, footprints, minimum sizes) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
