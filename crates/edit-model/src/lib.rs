//! Cutline Edit Model
//!
//! Defines the editing decisions a user makes on a single clip:
//! - **Trim:** the `[start, end]` time window to keep
//! - **Crop:** the source-pixel rectangle to keep, plus its undo history
//! - **Filters:** eight cosmetic parameters and the derived active set
//! - **Media:** the natural duration and size of the loaded clip
//!
//! Crop coordinates are in source pixels; conversion to and from display
//! pixels happens in the interaction and render crates.

pub mod crop;
pub mod filters;
pub mod media;
pub mod trim;

pub use crop::*;
pub use filters::*;
pub use media::*;
pub use trim::*;
