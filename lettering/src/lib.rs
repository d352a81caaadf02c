//! Bubble model and placement engine for the manga lettering editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and natively
//! for tests. It owns the ordered collection of dialogue bubbles for the page
//! being lettered, keeps it consistent under interactive edits, and computes
//! where every bubble and its tail land on the canvas. The host JavaScript
//! layer wires DOM events to the engine, performs the suggestion-service call,
//! and offers the exported PNG for download.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EditorCore`] |
//! | [`model`] | Bubble descriptors, typed updates, and the [`model::BubbleModel`] store |
//! | [`shape`] | Shape kinds and the per-kind presentation table |
//! | [`placement`] | Pure bubble and tail geometry |
//! | [`view`] | Page image, view framing, and canvas size conversions |
//! | [`input`] | Input event types and the drag state machine |
//! | [`hit`] | Hit-testing against placed bubbles |
//! | [`suggest`] | Suggestion-service wire types and ingestion |
//! | [`export`] | Rasterizer interface and export artifacts |
//! | [`render`] | Scene painting onto a 2D canvas context |
//! | [`consts`] | Shared numeric constants (clamp ranges, defaults, tail metrics) |

pub mod consts;
pub mod engine;
pub mod export;
pub mod hit;
pub mod input;
pub mod model;
pub mod placement;
pub mod render;
pub mod shape;
pub mod suggest;
pub mod view;
