pub mod colors;

use vello::kurbo::{Affine, BezPath, Point as KurboPoint, Stroke};
use vello::peniko::Fill;
use vello::Scene;

use self::colors::{node_color, ColorSettings};
use crate::layout::{Layout, Point, Triangle};
use crate::tree::arena::{NodeId, WeightedTree};

/// What `build_scene` drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub filled: usize,
    pub outlined: usize,
}

fn to_kurbo(p: Point) -> KurboPoint {
    KurboPoint::new(p.x, p.y)
}

/// Closed path through the triangle's vertices in drawing order.
pub fn triangle_path(triangle: &Triangle) -> BezPath {
    let [a, b, c] = triangle.points();
    let mut path = BezPath::new();
    path.move_to(to_kurbo(a));
    path.line_to(to_kurbo(b));
    path.line_to(to_kurbo(c));
    path.close_path();
    path
}

/// Fill every leaf triangle and outline every internal one.
/// `view` maps layout coordinates to scene coordinates.
pub fn build_scene(
    scene: &mut Scene,
    tree: &WeightedTree,
    layout: &Layout,
    settings: &ColorSettings,
    view: Affine,
) -> SceneSummary {
    scene.reset();
    let mut summary = SceneSummary::default();

    // Leaves first so outlines of their ancestors land on top.
    for cell in layout.cells.iter().filter(|c| tree.get(c.node).is_leaf()) {
        if cell.triangle.area() <= 0.0 {
            continue;
        }
        let color = node_color(tree, cell.node, cell.depth, settings);
        scene.fill(
            Fill::NonZero,
            view,
            color.to_peniko(),
            None,
            &triangle_path(&cell.triangle),
        );
        summary.filled += 1;
    }

    for cell in layout.cells.iter().filter(|c| !tree.get(c.node).is_leaf()) {
        let width = (2.0 / (1.0 + cell.depth as f64)).max(0.25);
        scene.stroke(
            &Stroke::new(width),
            view,
            settings.outline.to_peniko(),
            None,
            &triangle_path(&cell.triangle),
        );
        summary.outlined += 1;
    }

    tracing::debug!(
        "Scene built: {} filled, {} outlined triangles",
        summary.filled,
        summary.outlined
    );
    summary
}

/// Label positions: the centroid of every cell at most `max_depth` deep whose
/// area reaches `min_area`, largest first.
pub fn label_anchors(
    layout: &Layout,
    max_depth: u16,
    min_area: f64,
) -> Vec<(NodeId, Point)> {
    let mut picked: Vec<_> = layout
        .cells
        .iter()
        .filter(|cell| cell.depth <= max_depth && cell.triangle.area() >= min_area)
        .collect();
    picked.sort_by(|a, b| b.triangle.area().total_cmp(&a.triangle.area()));
    picked
        .into_iter()
        .map(|cell| (cell.node, cell.triangle.centroid()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};
    use crate::tree::arena::WeightedNode;
    use vello::kurbo::PathEl;

    #[test]
    fn triangle_path_is_closed() {
        let t = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 4.0),
        );
        let path = triangle_path(&t);
        let els = path.elements();
        assert_eq!(els.len(), 4);
        assert_eq!(els[0], PathEl::MoveTo(KurboPoint::new(0.0, 0.0)));
        assert_eq!(els[2], PathEl::LineTo(KurboPoint::new(2.0, 4.0)));
        assert_eq!(els[3], PathEl::ClosePath);
    }

    #[test]
    fn scene_fills_leaves_and_outlines_parents() {
        let mut tree = WeightedTree::new("root", 6.0);
        let a = tree.add_child(tree.root, WeightedNode::new("a", 4.0));
        tree.add_child(a, WeightedNode::new("a0", 3.0));
        tree.add_child(a, WeightedNode::new("a1", 1.0));
        tree.add_child(tree.root, WeightedNode::new("b", 2.0));
        let container = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(300.0, 0.0),
            Point::new(150.0, 260.0),
        );
        let layout = compute_layout(&tree, tree.root, container, &LayoutConfig::default()).unwrap();

        let mut scene = Scene::new();
        let summary = build_scene(
            &mut scene,
            &tree,
            &layout,
            &ColorSettings::default(),
            Affine::IDENTITY,
        );
        assert_eq!(summary, SceneSummary { filled: 3, outlined: 2 });
    }

    #[test]
    fn label_anchors_sit_inside_large_shallow_cells() {
        let mut tree = WeightedTree::new("root", 4.0);
        let a = tree.add_child(tree.root, WeightedNode::new("a", 3.0));
        let b = tree.add_child(tree.root, WeightedNode::new("b", 1.0));
        tree.add_child(b, WeightedNode::new("b0", 1.0));
        let container = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 4.0),
        );
        let layout = compute_layout(&tree, tree.root, container, &LayoutConfig::default()).unwrap();

        let anchors = label_anchors(&layout, 1, 1.0);
        let nodes: Vec<_> = anchors.iter().map(|(node, _)| *node).collect();
        assert_eq!(nodes, vec![tree.root, a, b]);
        assert_eq!(anchors[0].1, container.centroid());
        for (node, p) in &anchors {
            assert!(layout.triangle(*node).unwrap().contains(p, 1e-9));
        }

        // b (area 2) drops out once the threshold passes it.
        let anchors = label_anchors(&layout, 1, 3.0);
        assert_eq!(anchors.len(), 2);
    }
}
