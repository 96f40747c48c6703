//! This is a Rust library holding the read-only model of a `.proto` file:
//! its services, their methods, and the messages those methods exchange.
//! The model is produced by `protofile-compiler`; consumers only query it.
//!
//! ```
//! use std::collections::BTreeMap;
//! use protofile_schema::*;
//!
//! let mut fields = BTreeMap::new();
//! fields.insert("value".to_owned(), Field::new("value", "int64", false, 1));
//! let id = Message::new("Id", fields);
//!
//! assert_eq!(id.field("value").unwrap().number(), 1);
//! assert!(id.field("missing").is_err());
//! ```

pub mod error;
pub mod model;

pub use error::*;
pub use model::*;
