//! Call Recorder - voice memos and automatic phone-call recording
//!
//! This crate records voice memos on demand and phone calls automatically
//! when the auto-call preference is on, keeps them as timestamped `.m4a`
//! files in one directory, and plays them back one at a time.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recorder state machine, file naming, call states, permissions
//! - **Application**: Controllers and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (FFmpeg, rodio, notify-rust, filesystem)
//! - **CLI**: Command-line interface, daemon loop, IPC and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
