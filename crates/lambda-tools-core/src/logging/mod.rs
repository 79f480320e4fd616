//! Logging: the `Logger` seam used inside the crate and the key=value line logger
//!
//! - `Logger` trait with `NoOpLogger`, injected into components as `Arc<dyn Logger>`
//! - `KeyValueLogger`: single-line `key=value` records for log search backends

mod traits;
mod noop;
mod error;
mod level;
mod message;
mod sink;
mod key_value;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use error::{LogError, LogResult};
pub use level::Level;
pub use message::{Message, Fields, FieldValue};
pub use sink::{LineSink, StdoutSink, MemorySink};
pub use key_value::{KeyValueLogger, RESERVED_FIELDS};
