use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::{HierarchyNode, Leader, Tier};

/// Chart node stored in the arena.
#[derive(Debug)]
pub struct ChartNode {
    pub leader: Leader,
    pub tier: Tier,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in attachment order
    pub children: Vec<Index>,
}

impl fmt::Display for ChartNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.leader.name)?;
        if let Some(position) = self.leader.position_label() {
            write!(f, " ({position})")?;
        }
        if let Some(department) = self.leader.department_key() {
            write!(f, " [{department}]")?;
        }
        Ok(())
    }
}

/// Arena-backed org chart: a forest of leader nodes.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Parent links always point to a strictly lower tier, so the structure is acyclic.
#[derive(Debug)]
pub struct OrgChart {
    arena: Arena<ChartNode>,
    /// Root indices in the order they were designated
    roots: Vec<Index>,
}

impl Default for OrgChart {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgChart {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a detached node. It is neither a root nor a child until linked.
    #[instrument(level = "trace", skip(self, leader), fields(id = %leader.id))]
    pub fn insert_node(&mut self, leader: Leader, tier: Tier) -> Index {
        self.arena.insert(ChartNode {
            leader,
            tier,
            parent: None,
            children: Vec::new(),
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn push_root(&mut self, idx: Index) -> Result<(), DomainError> {
        if !self.arena.contains(idx) {
            return Err(DomainError::UnknownNode(format!("{idx:?}")));
        }
        self.roots.push(idx);
        Ok(())
    }

    /// Link `child` under `parent`; the parent must sit on a higher (smaller) tier.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, child: Index, parent: Index) -> Result<(), DomainError> {
        let parent_tier = self
            .arena
            .get(parent)
            .map(|n| n.tier)
            .ok_or_else(|| DomainError::UnknownNode(format!("{parent:?}")))?;
        let child_node = self
            .arena
            .get_mut(child)
            .ok_or_else(|| DomainError::UnknownNode(format!("{child:?}")))?;
        if parent_tier >= child_node.tier {
            return Err(DomainError::TierOrder {
                child: child_node.tier,
                parent: parent_tier,
            });
        }
        child_node.parent = Some(parent);
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(child);
        }
        Ok(())
    }

    pub fn get_node(&self, idx: Index) -> Option<&ChartNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal across all roots, left to right.
    pub fn iter(&self) -> ChartIterator<'_> {
        ChartIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels in the deepest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Names of all childless nodes, in pre-order.
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.leader.name.clone())
            .collect()
    }

    /// Owned hierarchy, one entry per root.
    #[instrument(level = "debug", skip(self))]
    pub fn to_hierarchy(&self) -> Vec<HierarchyNode> {
        self.roots
            .iter()
            .filter_map(|&root| self.subtree(root))
            .collect()
    }

    fn subtree(&self, idx: Index) -> Option<HierarchyNode> {
        let node = self.get_node(idx)?;
        Some(HierarchyNode {
            leader: node.leader.clone(),
            tier: node.tier,
            children: node
                .children
                .iter()
                .filter_map(|&child| self.subtree(child))
                .collect(),
        })
    }
}

pub struct ChartIterator<'a> {
    chart: &'a OrgChart,
    stack: Vec<Index>,
}

impl<'a> ChartIterator<'a> {
    fn new(chart: &'a OrgChart) -> Self {
        let stack = chart.roots.iter().rev().copied().collect();
        Self { chart, stack }
    }
}

impl<'a> Iterator for ChartIterator<'a> {
    type Item = (Index, &'a ChartNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.chart.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    chart: &'a OrgChart,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(chart: &'a OrgChart) -> Self {
        let stack = chart.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { chart, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ChartNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.chart.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
