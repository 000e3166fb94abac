//! Frame sinks: where rendered frames go.
//!
//! A session pushes frames in strictly increasing order between `begin` and `end`.

/// `ffmpeg`-based MP4 output via the system binary.
pub mod ffmpeg;
/// Sink trait plus in-memory and PNG sequence sinks.
pub mod sink;
