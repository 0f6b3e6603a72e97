//! Cutline Interaction: pointer input to edit requests
//!
//! Turns serialized pointer and keyboard events into edits:
//! - **Timeline:** trim-handle drags and click-to-seek on the thumbnail strip
//! - **Crop overlay:** corner-handle drags in display pixels, applied in source pixels
//! - **Transport:** play/pause, skip, mute, and volume
//! - **Editor:** the single owner of trim, crop, history, filter, and playback state
//!
//! Interaction machines never mutate edit state themselves; they return
//! requests that [`EditorState`] applies. This crate is pure computation
//! with no I/O.

pub mod crop;
pub mod editor;
pub mod events;
pub mod timeline;
pub mod transport;

pub use crop::{CropDrag, CropInteraction, CropRequest, OverlayGeometry};
pub use editor::{EditorState, ExportAvailability, KeyChord};
pub use events::{parse_script, EditorEvent};
pub use timeline::{TimelineDrag, TimelineGeometry, TimelineInteraction, TimelineRequest};
pub use transport::{format_clock, PlaybackState, PlayerCommand};
