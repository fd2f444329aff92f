//! Collector: runs one collection pass per scrape.
//!
//! A pass fetches the chain tip once, then every configured account in
//! order, and maps the fields the registry knows about into samples.
//! Nothing is cached between passes.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use tzstats_client::StatsApi;
use tzstats_core::{AccountSnapshot, TipSnapshot};

use crate::error::{CollectError, CollectResult};
use crate::registry::{
    AccountField, DerivedMetric, ExplorerField, MetricDefinition, MetricRegistry, TIP_HEIGHT_FIELD,
};

/// One labeled value produced by a pass.
///
/// `label_values` is ordered like `definition.label_names()`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample<'r> {
    pub definition: &'r MetricDefinition,
    pub label_values: Vec<String>,
    pub value: f64,
}

impl MetricSample<'_> {
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// Value of a label by name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.definition
            .label_names()
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}

/// Maps upstream account and tip data onto the metric registry.
pub struct Collector {
    api: Arc<dyn StatsApi>,
    registry: Arc<MetricRegistry>,
    accounts: Vec<String>,
    network: String,
}

impl Collector {
    /// Create a collector polling `accounts` (in that order) on every pass.
    pub fn new(
        api: Arc<dyn StatsApi>,
        registry: Arc<MetricRegistry>,
        accounts: Vec<String>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            api,
            registry,
            accounts,
            network: network.into(),
        }
    }

    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Run one full pass and return its samples.
    ///
    /// Fails only if the tip cannot be fetched. A failing account is logged
    /// and skipped so the rest of the scrape still goes out.
    pub async fn collect(&self) -> CollectResult<Vec<MetricSample<'_>>> {
        let started = Instant::now();
        let tip = self
            .api
            .get_explorer_tip()
            .await
            .map_err(CollectError::Tip)?;

        let mut samples = Vec::new();
        let mut skipped = 0usize;

        for hash in &self.accounts {
            let account = match self.api.get_account(hash).await {
                Ok(account) => account,
                Err(e) => {
                    warn!(%hash, error = %e, "account fetch failed, skipping");
                    skipped += 1;
                    continue;
                }
            };
            self.push_account_samples(hash, &account, &tip, &mut samples);
        }

        self.push_explorer_samples(&tip, &mut samples);

        debug!(
            accounts = self.accounts.len(),
            skipped,
            samples = samples.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collection pass finished"
        );
        Ok(samples)
    }

    fn push_account_samples<'r>(
        &'r self,
        hash: &str,
        account: &AccountSnapshot,
        tip: &TipSnapshot,
        out: &mut Vec<MetricSample<'r>>,
    ) {
        for &field in AccountField::ALL {
            if let Some(value) = account.get(field.key()) {
                out.push(self.account_sample(self.registry.account(field), hash, value));
            }
        }

        let Some(height) = tip.get(TIP_HEIGHT_FIELD) else {
            debug!(%hash, "tip has no height, skipping derived metrics");
            return;
        };
        for &metric in DerivedMetric::ALL {
            if let Some(target) = account.get(metric.source_field()) {
                out.push(self.account_sample(self.registry.derived(metric), hash, target - height));
            }
        }
    }

    fn push_explorer_samples<'r>(&'r self, tip: &TipSnapshot, out: &mut Vec<MetricSample<'r>>) {
        for &field in ExplorerField::ALL {
            if let Some(value) = tip.get(field.key()) {
                out.push(MetricSample {
                    definition: self.registry.explorer(field),
                    label_values: vec![self.network.clone()],
                    value,
                });
            }
        }
    }

    fn account_sample<'r>(
        &self,
        definition: &'r MetricDefinition,
        hash: &str,
        value: f64,
    ) -> MetricSample<'r> {
        MetricSample {
            definition,
            label_values: vec![hash.to_string(), self.network.clone()],
            value,
        }
    }
}
