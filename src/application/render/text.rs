use termtree::Tree;

use crate::application::render::RenderOptions;
use crate::domain::OrgChart;
use generational_arena::Index;

/// One `termtree` block per root, separated by blank lines.
pub fn render_text(chart: &OrgChart, options: &RenderOptions) -> String {
    if chart.is_empty() {
        return format!("{}\n", options.empty_message);
    }
    chart
        .roots()
        .iter()
        .filter_map(|&root| to_tree(chart, root))
        .map(|tree| tree.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_tree(chart: &OrgChart, idx: Index) -> Option<Tree<String>> {
    let node = chart.get_node(idx)?;
    let leaves: Vec<_> = node
        .children
        .iter()
        .filter_map(|&child| to_tree(chart, child))
        .collect();
    Some(Tree::new(node.to_string()).with_leaves(leaves))
}
