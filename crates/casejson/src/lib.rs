//! Idiomatic JSON for Rust enums.
//!
//! Derive [`TaggedUnion`] on an enum and it serializes the way a hand-written
//! JSON API would: optional-like enums as `null` or their payload, wrappers as
//! their payload, single-case records as positional objects, and everything
//! else as positional objects tagged with `"__Case"`.
//!
//! ```ignore
//! use casejson::TaggedUnion;
//!
//! #[derive(Debug, PartialEq, TaggedUnion)]
//! enum CustomerEvent {
//!     CustomerRegistered { company_name: String, number: String },
//!     CustomerDeleted(String),
//! }
//!
//! let event = CustomerEvent::CustomerDeleted("0001".into());
//! let json = casejson::to_string(&event)?;
//! assert_eq!(json, r#"{"__Case":"CustomerDeleted","Item0":"0001"}"#);
//! ```

pub use casejson_core::*;
pub use casejson_derive::TaggedUnion;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
