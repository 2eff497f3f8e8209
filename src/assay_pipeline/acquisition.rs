//! Frame acquisition module
//!
//! This module reads the device's ASCII pixel stream through a transport-agnostic
//! byte source and assembles it into a frame.

mod source;
mod scripted_source;
mod tcp_source;
mod decoder;
mod assembler;

pub use source::{ByteSource, ReadOutcome};
pub use scripted_source::ScriptedSource;
pub use tcp_source::TcpSource;
pub use decoder::TokenStreamDecoder;
pub use assembler::FrameAssembler;
