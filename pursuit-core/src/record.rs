//! Types and traits for recording values emitted by environments.
//!
//! Every call of [`Env::step`](crate::Env::step) returns a [`Record`] next to the
//! [`Step`](crate::Step) object. Environments use it to report quantities that are
//! not part of the observation, like the distance between agents or the outcome of
//! an episode.
//!
//! # Core Components
//!
//! * [`Record`] - A flexible container for storing key-value pairs of various data types
//! * [`RecordValue`] - An enum representing different types of values that can be stored
//! * [`Recorder`] - A trait defining the interface for writing records
//! * [`RecordStorage`] - A storage system with aggregation capabilities
//! * [`BufferedRecorder`] - A recorder that temporarily stores records in memory
//! * [`NullRecorder`] - A recorder that discards all records (useful for testing)
//!
//! # Basic Usage
//!
//! ```rust
//! use pursuit_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let step = 1;
//! let obs = vec![1f32, 2.0, 3.0, 4.0, 5.0];
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("Step", RecordValue::Scalar(step as f32));
//! record.insert("Reward", RecordValue::Scalar(reward));
//! record.insert("Obs", RecordValue::Array1(obs));
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
