//! Host serial link: line framing for inbound commands.

pub mod codec;

pub use codec::{LineDecoder, MAX_LINE_LEN};
