//! Composable building blocks for voice patches.
//!
//! Graph nodes wrap the DSP primitives with note events and block rendering;
//! `extensions` adds the fluent `.amplify()`, `.through()` and `.mix()`
//! combinators patches are written with.

/// Multiply a signal by a modulator (usually an envelope).
pub mod amplify;
/// ADSR envelope node.
pub mod envelope;
/// Fluent combinators.
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Linear blend of two sources.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillator node.
pub mod oscillator;
/// Serial chaining of a source into an effect.
pub mod through;

pub use extensions::NodeExt;
pub use node::{GraphNode, RenderCtx};
