//! Summary figures for an assembled chart.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::domain::arena::OrgChart;
use crate::domain::Tier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStats {
    pub total: usize,
    pub per_tier: BTreeMap<Tier, usize>,
    pub roots: usize,
    /// Roots below tier 0, i.e. nodes that found no parent
    pub promoted: usize,
    pub depth: usize,
}

impl ChartStats {
    pub fn from_chart(chart: &OrgChart) -> Self {
        let mut per_tier: BTreeMap<Tier, usize> = Tier::ALL.iter().map(|&t| (t, 0)).collect();
        per_tier.extend(chart.iter().map(|(_, node)| node.tier).counts());

        let promoted = chart
            .roots()
            .iter()
            .filter_map(|&idx| chart.get_node(idx))
            .filter(|node| node.tier != Tier::Board)
            .count();

        Self {
            total: chart.len(),
            per_tier,
            roots: chart.roots().len(),
            promoted,
            depth: chart.depth(),
        }
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.per_tier.get(&tier).copied().unwrap_or(0)
    }
}
