//! Chart builder: tiers a flat leader list and links each node to its nearest parent.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::OrgChart;
use crate::domain::error::DomainError;
use crate::domain::tier::TierRules;
use crate::domain::{Leader, Tier};

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, DomainError>;

/// Assembles an [`OrgChart`] from leader records.
#[derive(Debug, Clone, Default)]
pub struct ChartBuilder {
    rules: TierRules,
}

impl ChartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: TierRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TierRules {
        &self.rules
    }

    /// Build the chart.
    ///
    /// Leaders are stably sorted by tier. Tier-0 nodes become roots. Every other
    /// node goes under the first node exactly one tier above it whose department
    /// matches (a blank department on either side matches anything); nodes with
    /// no such candidate are promoted to roots.
    #[instrument(level = "debug", skip_all, fields(count = leaders.len()))]
    pub fn assemble(&self, leaders: &[Leader]) -> ChartResult<OrgChart> {
        let mut tiered: Vec<(Tier, &Leader)> = leaders
            .iter()
            .map(|l| (self.rules.classify(l.position.as_deref()), l))
            .collect();
        // sort_by_key is stable: input order survives within a tier
        tiered.sort_by_key(|(tier, _)| *tier);

        let mut chart = OrgChart::new();
        let mut placed: Vec<(Index, Tier, Option<&str>)> = Vec::with_capacity(tiered.len());

        for (tier, leader) in tiered {
            let department = leader.department_key();
            let idx = chart.insert_node(leader.clone(), tier);

            let parent = tier.parent_tier().and_then(|wanted| {
                placed
                    .iter()
                    .find(|(_, t, d)| *t == wanted && departments_match(*d, department))
                    .map(|(i, _, _)| *i)
            });

            match parent {
                Some(parent_idx) => {
                    debug!(id = %leader.id, tier = tier.as_u8(), "attached to parent");
                    chart.attach(idx, parent_idx)?;
                }
                None => {
                    if tier != Tier::Board {
                        debug!(
                            id = %leader.id,
                            tier = tier.as_u8(),
                            "no parent found, promoted to root"
                        );
                    }
                    chart.push_root(idx)?;
                }
            }
            placed.push((idx, tier, department));
        }

        Ok(chart)
    }
}

fn departments_match(parent: Option<&str>, child: Option<&str>) -> bool {
    match (parent, child) {
        (Some(p), Some(c)) => p == c,
        _ => true,
    }
}
