//! Recording infrastructure module
//!
//! Captures audio with FFmpeg and writes AAC in an MPEG-4 container.

mod ffmpeg;

pub use ffmpeg::FfmpegRecorder;
