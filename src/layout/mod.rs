pub mod bisect;
pub mod geometry;

use std::collections::HashMap;

use rayon::prelude::*;

pub use self::bisect::{find_split_point, BisectionConfig, SplitSearch};
pub use self::geometry::{area, Point, Triangle};
use crate::error::LayoutError;
use crate::tree::aggregate::by_weight_descending;
use crate::tree::arena::{NodeId, WeightedTree};

/// How each parent's triangle is carved up among its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Always cut the current base edge, in sibling order.
    #[default]
    SliceAndDice,
    /// Before every cut except the last, rebase the remaining triangle onto its
    /// longest edge so the pieces stay less elongated.
    Squarify,
}

/// A node's assigned triangle in the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTriangle {
    pub node: NodeId,
    pub triangle: Triangle,
    /// Depth relative to the layout root (root = 0)
    pub depth: u16,
}

/// Counters gathered while splitting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutStats {
    /// Nodes that received a triangle
    pub nodes: usize,
    /// Bisection searches run (one per non-last child)
    pub splits: usize,
    pub bisection_steps: u64,
    /// Searches that hit the step cap
    pub unconverged: usize,
    /// Searches whose initial bracket had no sign change
    pub unbracketed: usize,
    /// Largest relative area error seen on a last child
    pub max_terminal_drift: f64,
}

impl LayoutStats {
    fn record_search(&mut self, search: &SplitSearch) {
        self.splits += 1;
        self.bisection_steps += u64::from(search.steps);
        if !search.converged {
            self.unconverged += 1;
        }
        if !search.bracketed {
            self.unbracketed += 1;
        }
    }

    fn merge(&mut self, other: &LayoutStats) {
        self.nodes += other.nodes;
        self.splits += other.splits;
        self.bisection_steps += other.bisection_steps;
        self.unconverged += other.unconverged;
        self.unbracketed += other.unbracketed;
        self.max_terminal_drift = self.max_terminal_drift.max(other.max_terminal_drift);
    }
}

/// The full layout result (triangles + fast lookup).
#[derive(Debug)]
pub struct Layout {
    /// One entry per node, in pre-order with siblings by descending weight
    pub cells: Vec<LayoutTriangle>,
    /// node → index into `cells`
    pub node_to_cell: HashMap<NodeId, usize>,
    pub stats: LayoutStats,
}

impl Layout {
    pub fn get(&self, node: NodeId) -> Option<&LayoutTriangle> {
        self.node_to_cell.get(&node).map(|&i| &self.cells[i])
    }

    pub fn triangle(&self, node: NodeId) -> Option<Triangle> {
        self.get(node).map(|cell| cell.triangle)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Configuration for triangular treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub mode: SplitMode,
    /// Bisection stops when the bracket is shorter than this (coordinate units)
    pub epsilon: f64,
    /// Safety cap on halvings per split
    pub max_bisection_steps: u32,
    /// Maximum recursion depth below the layout root
    pub max_depth: u16,
    /// Reject trees whose internal weights differ from their children's sums
    pub strict_weights: bool,
    /// Relative tolerance for `strict_weights`
    pub weight_tolerance: f64,
    /// Warn when a last child's area is off by more than this fraction
    pub drift_warn_ratio: f64,
    /// Lay out sibling subtrees on the rayon pool
    pub parallel: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: SplitMode::SliceAndDice,
            epsilon: 0.001,
            max_bisection_steps: 64,
            max_depth: 1024,
            strict_weights: false,
            weight_tolerance: 1e-9,
            drift_warn_ratio: 0.01,
            parallel: false,
        }
    }
}

impl LayoutConfig {
    pub fn bisection(&self) -> BisectionConfig {
        BisectionConfig {
            epsilon: self.epsilon,
            max_steps: self.max_bisection_steps,
        }
    }
}

/// One child's turn in its parent's split sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitStep {
    /// Compute a target area, optionally rebase, bisect.
    Regular(NodeId),
    /// Last child: takes whatever triangle remains, with no bisection and no
    /// rebase, rotated like any other share.
    Terminal(NodeId),
}

fn split_steps(children: &[NodeId]) -> impl Iterator<Item = SplitStep> + '_ {
    let last = children.len().saturating_sub(1);
    children.iter().enumerate().map(move |(i, &child)| {
        if i == last {
            SplitStep::Terminal(child)
        } else {
            SplitStep::Regular(child)
        }
    })
}

/// Compute the triangle of every node under `root`, starting from `container`.
pub fn compute_layout(
    tree: &WeightedTree,
    root: NodeId,
    container: Triangle,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    if let Some(bad) = container.points().into_iter().find(|p| !p.is_finite()) {
        return Err(LayoutError::NonFiniteCoordinate { x: bad.x, y: bad.y });
    }
    if tree.try_get(root).is_none() {
        return Err(LayoutError::UnknownNode(root));
    }
    validate_weights(tree, root, config)?;

    let root_node = tree.get(root);
    tracing::info!(
        "Laying out '{}' (weight {}) in a triangle of area {:.3}, mode {:?}",
        root_node.name,
        root_node.weight,
        container.area(),
        config.mode
    );

    let mut fragment = Fragment::default();
    layout_subtree(tree, root, container, 0, config, &mut fragment)?;

    let node_to_cell = fragment
        .cells
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.node, i))
        .collect();

    let stats = fragment.stats;
    if stats.unconverged > 0 || stats.unbracketed > 0 {
        tracing::warn!(
            "Layout finished with {} unconverged and {} unbracketed splits out of {}",
            stats.unconverged,
            stats.unbracketed,
            stats.splits
        );
    }

    Ok(Layout {
        cells: fragment.cells,
        node_to_cell,
        stats,
    })
}

/// Reject negative or non-finite weights, and (when strict) sum mismatches.
fn validate_weights(
    tree: &WeightedTree,
    root: NodeId,
    config: &LayoutConfig,
) -> Result<(), LayoutError> {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = tree.get(id);
        if !node.weight.is_finite() || node.weight < 0.0 {
            return Err(LayoutError::InvalidWeight {
                node: id,
                name: node.name.to_string(),
                weight: node.weight,
            });
        }

        if config.strict_weights && !node.is_leaf() {
            let children_sum: f64 = tree.children(id).map(|c| tree.get(c).weight).sum();
            let scale = node.weight.abs().max(children_sum.abs());
            if (node.weight - children_sum).abs() > config.weight_tolerance * scale {
                return Err(LayoutError::WeightSumMismatch {
                    node: id,
                    name: node.name.to_string(),
                    weight: node.weight,
                    children_sum,
                });
            }
        }

        stack.extend(tree.children(id));
    }
    Ok(())
}

/// Cells and counters for one subtree.
#[derive(Debug, Default)]
struct Fragment {
    cells: Vec<LayoutTriangle>,
    stats: LayoutStats,
}

impl Fragment {
    fn absorb(&mut self, other: Fragment) {
        self.cells.extend(other.cells);
        self.stats.merge(&other.stats);
    }
}

fn layout_subtree(
    tree: &WeightedTree,
    node: NodeId,
    container: Triangle,
    depth: u16,
    config: &LayoutConfig,
    out: &mut Fragment,
) -> Result<(), LayoutError> {
    out.cells.push(LayoutTriangle {
        node,
        triangle: container,
        depth,
    });
    out.stats.nodes += 1;

    if tree.get(node).is_leaf() {
        return Ok(());
    }
    if depth >= config.max_depth {
        return Err(LayoutError::TooDeep {
            max_depth: config.max_depth,
        });
    }

    let shares = split_children(tree, node, container, config, &mut out.stats);

    if config.parallel && shares.len() > 1 {
        // Split points are already fixed; subtrees are independent from here on.
        let fragments = shares
            .into_par_iter()
            .map(|(child, triangle)| {
                let mut fragment = Fragment::default();
                layout_subtree(tree, child, triangle, depth + 1, config, &mut fragment)
                    .map(|()| fragment)
            })
            .collect::<Result<Vec<_>, _>>()?;
        for fragment in fragments {
            out.absorb(fragment);
        }
    } else {
        for (child, triangle) in shares {
            layout_subtree(tree, child, triangle, depth + 1, config, out)?;
        }
    }

    Ok(())
}

/// Carve `container` into one triangle per child of `parent`.
/// Returned triangles are already oriented for the child's own recursion.
fn split_children(
    tree: &WeightedTree,
    parent: NodeId,
    container: Triangle,
    config: &LayoutConfig,
    stats: &mut LayoutStats,
) -> Vec<(NodeId, Triangle)> {
    let parent_node = tree.get(parent);
    let mut children: Vec<NodeId> = tree.children(parent).collect();
    children.sort_by(|a, b| by_weight_descending(tree.get(*a).weight, tree.get(*b).weight));

    if parent_node.weight <= 0.0 {
        tracing::debug!(
            "Parent {:?} '{}' has zero weight; its {} children get empty triangles",
            parent,
            parent_node.name,
            children.len()
        );
    }

    let bisection = config.bisection();
    let mut remaining = container;
    let mut remaining_weight = parent_node.weight;
    let mut shares = Vec::with_capacity(children.len());

    for step in split_steps(&children) {
        match step {
            SplitStep::Regular(child) => {
                let weight = tree.get(child).weight;
                let fraction = if remaining_weight > 0.0 {
                    (weight / remaining_weight).clamp(0.0, 1.0)
                } else {
                    0.0
                };

                if config.mode == SplitMode::Squarify {
                    remaining = remaining.rebase_to_longest_edge();
                }
                let target = remaining.area() * fraction;

                let search = find_split_point(
                    remaining.apex,
                    remaining.base_start,
                    remaining.base_end,
                    remaining.base_start,
                    target,
                    &bisection,
                );
                stats.record_search(&search);
                if !search.bracketed {
                    tracing::warn!(
                        "Split for {:?} '{}' is not bracketed (target area {})",
                        child,
                        tree.get(child).name,
                        target
                    );
                }

                let share = Triangle::new(remaining.apex, remaining.base_start, search.point);
                // The child's base becomes the cut it shares with the next sibling.
                shares.push((child, share.rotate()));

                remaining = Triangle::new(remaining.apex, search.point, remaining.base_end);
                remaining_weight -= weight;
            }
            SplitStep::Terminal(child) => {
                let drift = terminal_drift(
                    container.area(),
                    parent_node.weight,
                    tree.get(child).weight,
                    remaining.area(),
                );
                if drift > config.drift_warn_ratio {
                    tracing::warn!(
                        "Last child {:?} '{}' area is off by {:.2}% of its share",
                        child,
                        tree.get(child).name,
                        drift * 100.0
                    );
                }
                stats.max_terminal_drift = stats.max_terminal_drift.max(drift);
                shares.push((child, remaining.rotate()));
            }
        }
    }

    shares
}

/// Relative difference between the remainder a last child received and the
/// area its weight asks for. Zero when no meaningful share exists.
fn terminal_drift(parent_area: f64, parent_weight: f64, child_weight: f64, actual: f64) -> f64 {
    if parent_weight <= 0.0 || parent_area <= 0.0 {
        return 0.0;
    }
    let expected = parent_area * child_weight / parent_weight;
    if expected <= 0.0 {
        return 0.0;
    }
    (actual - expected).abs() / expected
}
