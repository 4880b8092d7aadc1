//! # proxy-model - Virtualized record access
//!
//! proxy-model presents one or more in-memory records (documents) as a
//! single, uniformly typed model. Every access goes through a property
//! resolution engine that decides which source answers, how public keys map
//! onto stored keys, and how stored values are converted for callers.
//!
//! ## Core Concepts
//!
//! - **Source**: a shared, ordered key/value [`Document`]; the first source
//!   holding a key answers for it
//! - **Alias**: a public key stored under another name
//! - **Converter**: a raw/API transform pair for one field
//! - **Resolution cache**: which source answered each key, trusted on later
//!   reads
//! - **Events**: synchronous lifecycle hooks that can rewrite values or take
//!   over writes and deletes
//!
//! ## Usage
//!
//! ```rust
//! use proxy_model::convert::mongodb;
//! use proxy_model::{Model, Source, Value};
//! use serde_json::json;
//!
//! let user = Model::builder()
//!     .source(Source::from_json(json!({
//!         "_id": {"$oid": "1"},
//!         "name": "Tim",
//!         "level": 99,
//!     }))?)
//!     .alias("id", "_id")
//!     .converter("_id", mongodb::object_id())
//!     .readonly("level")
//!     .build()?;
//!
//! assert_eq!(user.get("id"), Some(Value::from("1")));
//! assert!(user.set("level", 50)); // read-only writes report success by default
//! assert_eq!(user.get("level"), Some(Value::Int(99)));
//! # Ok::<(), proxy_model::ModelError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alias;
pub mod convert;
pub mod error;
pub mod events;
pub mod key;
pub mod observe;
pub mod options;
pub mod resolve;
pub mod schema;
pub mod source;
pub mod value;

mod access;
mod builder;
mod computed;
mod model;

pub use access::WriteOutcome;
pub use alias::AliasTable;
pub use builder::ModelBuilder;
pub use computed::{ComputedFn, ComputedProperty};
pub use convert::{ConversionRegistry, Converter};
pub use error::{ModelError, ModelResult, ReadonlyViolation};
pub use events::{
    AccessEvent, DeleteContext, DescribeContext, EventChannel, EventKind, HasContext, KeysContext,
    ListenerId, ReadContext, WriteContext,
};
pub use key::{Key, Symbol};
pub use model::{Model, WeakModel};
pub use observe::TraceObserver;
pub use options::ModelOptions;
pub use resolve::Origin;
pub use schema::ModelSchema;
pub use source::{Document, PropertyDescriptor, PropertyFlags, Source};
pub use value::Value;
