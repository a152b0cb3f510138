// Sun Jan 18 2026 - Alex

pub mod codec;
pub mod error;

pub use codec::{decode_partial, decode_unit, encode_partial, encode_unit, JOB_TAG};
pub use error::WireError;
