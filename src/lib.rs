//! Interaction engine for a pannable, zoomable pinboard of heterogeneous objects.
//!
//! Photos, notes, stickers, decorations, and embedded media are placed,
//! dragged, rotated, resized, and layered on a 2D surface. This crate owns the
//! parts that are not rendering: the item collection and its id/ordering
//! invariants, the pointer gesture state machine, overlap-aware layering, and
//! viewport culling. The camera widget, asset storage, persistence, and
//! per-kind painting are host collaborators that talk to the engine through
//! [`engine::Action`]s and [`command::Command`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and its output actions |
//! | [`doc`] | Object types and the [`doc::Collection`] store |
//! | [`camera`] | Screen/canvas coordinate conversions |
//! | [`geom`] | Axis-aligned rectangles |
//! | [`input`] | Buttons, modifiers, and the gesture state |
//! | [`hit`] | Pointer-down hit-testing and rotate-corner detection |
//! | [`layering`] | Overlap-aware bring-forward / send-backward |
//! | [`cull`] | Viewport culling |
//! | [`sync`] | Change detection and snapshot codec for persistence |
//! | [`command`] | Commands against the selected object |
//! | [`config`] | Tunables loaded from the environment |
//! | [`wasm`] | `wasm-bindgen` facade for a browser host |
//! | [`consts`] | Default numeric constants |

pub mod camera;
pub mod command;
pub mod config;
pub mod consts;
pub mod cull;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layering;
pub mod sync;
pub mod wasm;
