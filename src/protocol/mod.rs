//! Wire protocol for operations
//!
//! Operations travel as JSON objects with stable field names so that
//! independent implementations can interoperate.

pub mod serialize;

pub use serialize::{
    decode_operation, decode_operations, encode_operation, encode_operations, WireOperation,
};
