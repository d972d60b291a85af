//! Line Protocol
//!
//! Newline-delimited text requests (`VERB arg arg...`) and text responses.

mod codec;
mod command;
mod response;

pub use codec::{LineCodec, DEFAULT_MAX_LINE_LENGTH};
pub use command::Command;
pub use response::Response;
