//! tzstats-metrics: turns TzStats API data into Prometheus samples.
//!
//! # Architecture
//!
//! ```text
//! MetricRegistry (built once, shared via Arc)
//!   └── account / explorer / derived definitions
//!
//! Collector
//!   └── collect() → one pass over tip + configured accounts → Vec<MetricSample>
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod collector;
pub mod error;
pub mod prometheus;
pub mod registry;

pub use collector::{Collector, MetricSample};
pub use error::{CollectError, CollectResult};
pub use prometheus::render_prometheus;
pub use registry::{
    AccountField, DerivedMetric, ExplorerField, MetricDefinition, MetricId, MetricRegistry,
};
