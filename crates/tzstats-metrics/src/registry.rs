//! Metric schema registry: the fixed set of metrics the exporter can emit.
//!
//! Three groups, each an enum with a typed key lookup:
//!
//! | Group | Labels | Source |
//! |---|---|---|
//! | [`AccountField`] | `hash`, `network` | account snapshot field |
//! | [`ExplorerField`] | `network` | tip snapshot field |
//! | [`DerivedMetric`] | `hash`, `network` | account height − tip height |
//!
//! Anything not listed here is never emitted.

use tzstats_core::METRIC_PREFIX;

/// Labels on account and derived metrics. `network` is always last.
pub const ACCOUNT_LABELS: &[&str] = &["hash", "network"];

/// Labels on explorer metrics.
pub const EXPLORER_LABELS: &[&str] = &["network"];

/// Tip field that derived metrics are measured against.
pub const TIP_HEIGHT_FIELD: &str = "height";

/// Declare a group of metrics as a fieldless enum with key/description lookups.
macro_rules! metric_group {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($key:literal, $help:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            pub fn description(self) -> &'static str {
                match self {
                    $($name::$variant => $help,)+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

metric_group! {
    /// Per-account fields copied one-to-one from the account snapshot.
    AccountField {
        TotalReceived => ("total_received", "Lifetime total tokens received in transactions."),
        TotalSent => ("total_sent", "Lifetime total tokens sent in transactions."),
        TotalBurned => ("total_burned", "Lifetime total tokens burned in tz."),
        TotalFeesPaid => ("total_fees_paid", "Lifetime fees paid in tz."),
        TotalRewardsEarned => ("total_rewards_earned", "Lifetime rewards earned in tz."),
        TotalFeesEarned => ("total_fees_earned", "Lifetime fees earned in tz."),
        TotalLost => ("total_lost", "Lifetime total tokens lost in tz."),
        FrozenDeposits => ("frozen_deposits", "Currently frozen deposits."),
        FrozenRewards => ("frozen_rewards", "Currently frozen rewards."),
        FrozenFees => ("frozen_fees", "Currently frozen fees."),
        UnclaimedBalance => ("unclaimed_balance", "Currently unclaimed balance (for vesting contracts and commitments)."),
        SpendableBalance => ("spendable_balance", "Currently spendable balance."),
        TotalBalance => ("total_balance", "Currently spendable and frozen balances (except frozen rewards)."),
        DelegatedBalance => ("delegated_balance", "Current incoming delegations."),
        StakingBalance => ("staking_balance", "Current delegated and own total balance."),
        TotalDelegations => ("total_delegations", "Lifetime count of delegations."),
        ActiveDelegations => ("active_delegations", "Currently active and non-zero delegations."),
        BlocksBaked => ("blocks_baked", "Lifetime total blocks baked."),
        BlocksMissed => ("blocks_missed", "Lifetime total block baking missed."),
        BlocksStolen => ("blocks_stolen", "Lifetime total block baked at priority > 0."),
        BlocksEndorsed => ("blocks_endorsed", "Lifetime total blocks endorsed."),
        SlotsEndorsed => ("slots_endorsed", "Lifetime total endorsement slots endorsed."),
        SlotsMissed => ("slots_missed", "Lifetime total endorsement slots missed."),
        NOps => ("n_ops", "Lifetime total number of operations sent and received."),
        NOpsFailed => ("n_ops_failed", "Lifetime total number of operations sent that failed."),
        NTx => ("n_tx", "Lifetime total number of transactions sent and received."),
        NDelegation => ("n_delegation", "Lifetime total number of delegations sent."),
        NOrigination => ("n_origination", "Lifetime total number of originations sent."),
        NProposal => ("n_proposal", "Lifetime total number of proposals (operations) sent."),
        NBallot => ("n_ballot", "Lifetime total number of ballots sent."),
    }
}

metric_group! {
    /// Network-wide fields copied from the tip snapshot.
    ExplorerField {
        Cycle => ("cycle", "Current cycle."),
    }
}

metric_group! {
    /// Metrics synthesized from an account field and the tip height.
    DerivedMetric {
        NextEndorsing => ("next_endorsing", "Blocks until the next endorsing right."),
        NextBaking => ("next_baking", "Blocks until the next baking right."),
    }
}

impl DerivedMetric {
    /// Account field holding the target block height.
    pub fn source_field(self) -> &'static str {
        match self {
            DerivedMetric::NextEndorsing => "next_endorse_height",
            DerivedMetric::NextBaking => "next_bake_height",
        }
    }
}

/// Identifies one registry entry across all groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricId {
    Account(AccountField),
    Explorer(ExplorerField),
    Derived(DerivedMetric),
}

impl MetricId {
    pub fn key(self) -> &'static str {
        match self {
            MetricId::Account(f) => f.key(),
            MetricId::Explorer(f) => f.key(),
            MetricId::Derived(m) => m.key(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricId::Account(f) => f.description(),
            MetricId::Explorer(f) => f.description(),
            MetricId::Derived(m) => m.description(),
        }
    }

    pub fn label_names(self) -> &'static [&'static str] {
        match self {
            MetricId::Account(_) | MetricId::Derived(_) => ACCOUNT_LABELS,
            MetricId::Explorer(_) => EXPLORER_LABELS,
        }
    }
}

/// Name, help text and label shape of one metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDefinition {
    id: MetricId,
    name: String,
    description: &'static str,
    label_names: &'static [&'static str],
}

impl MetricDefinition {
    fn new(id: MetricId) -> Self {
        Self {
            id,
            name: format!("{METRIC_PREFIX}{}", id.key()),
            description: id.description(),
            label_names: id.label_names(),
        }
    }

    pub fn id(&self) -> MetricId {
        self.id
    }

    /// Wire name, e.g. `tzstats_total_balance`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        self.label_names
    }
}

/// Immutable table of every metric definition.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Debug)]
pub struct MetricRegistry {
    account: Vec<MetricDefinition>,
    explorer: Vec<MetricDefinition>,
    derived: Vec<MetricDefinition>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        // Each vector is indexed by the enum discriminant, which matches ALL order.
        Self {
            account: AccountField::ALL
                .iter()
                .map(|&f| MetricDefinition::new(MetricId::Account(f)))
                .collect(),
            explorer: ExplorerField::ALL
                .iter()
                .map(|&f| MetricDefinition::new(MetricId::Explorer(f)))
                .collect(),
            derived: DerivedMetric::ALL
                .iter()
                .map(|&m| MetricDefinition::new(MetricId::Derived(m)))
                .collect(),
        }
    }

    pub fn account(&self, field: AccountField) -> &MetricDefinition {
        &self.account[field as usize]
    }

    pub fn explorer(&self, field: ExplorerField) -> &MetricDefinition {
        &self.explorer[field as usize]
    }

    pub fn derived(&self, metric: DerivedMetric) -> &MetricDefinition {
        &self.derived[metric as usize]
    }

    /// Look up a definition by wire name.
    pub fn by_name(&self, name: &str) -> Option<&MetricDefinition> {
        self.iter().find(|d| d.name == name)
    }

    /// All definitions: account group, then derived, then explorer.
    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.account
            .iter()
            .chain(self.derived.iter())
            .chain(self.explorer.iter())
    }

    pub fn len(&self) -> usize {
        self.account.len() + self.explorer.len() + self.derived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}
