//! Cutline Export
//!
//! Builds the three transcode jobs (trim, crop, filter) and runs them
//! through an owned [`Transcoder`] handle:
//!
//! ```text
//! input bytes ──write──▶ input.mp4 ──exec(argv)──▶ output.mp4 ──read──▶ ExportArtifact
//!                                                                │
//!                                       delete input.mp4 + output.mp4
//! ```
//!
//! Also hosts the ffprobe/ffmpeg adapters used to load media metadata and
//! sample frames for the thumbnail strip.

pub mod commands;
pub mod probe;
pub mod session;
pub mod transcoder;

pub use commands::{ExportKind, INPUT_FILE, OUTPUT_FILE};
pub use probe::{probe_media, FfmpegFrameSource};
pub use session::{ExportArtifact, ExportSession, MP4_MIME};
pub use transcoder::{FfmpegTranscoder, Transcoder};
