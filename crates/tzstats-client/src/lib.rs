//! tzstats-client: upstream API access for the exporter.
//!
//! The collector only sees the [`StatsApi`] trait, so a pass can be driven
//! by [`TzStatsClient`] in production and by an in-memory fake in tests.
//!
//! ```text
//! StatsApi
//!   ├── get_account(hash)  → GET {api_url}/explorer/account/{hash}
//!   └── get_explorer_tip() → GET {api_url}/explorer/tip
//! ```

pub mod client;
pub mod error;

pub use client::{StatsApi, TzStatsClient};
pub use error::{ClientError, ClientResult};
