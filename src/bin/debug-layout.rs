/// Diagnostic tool to verify records → tree → layout → scene pipeline
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use trimap::layout::{compute_layout, Layout, LayoutConfig, SplitMode};
use trimap::render::{self, colors};
use trimap::tree::{self, arena::WeightedTree, WeightedRecord};
use vello::kurbo::Affine;
use vello::Scene;

fn sample_records() -> Vec<WeightedRecord> {
    [
        ("src/layout/mod.rs", 620.0),
        ("src/layout/bisect.rs", 180.0),
        ("src/layout/geometry.rs", 240.0),
        ("src/tree/mod.rs", 210.0),
        ("src/tree/arena.rs", 190.0),
        ("src/tree/aggregate.rs", 95.0),
        ("src/render/mod.rs", 140.0),
        ("src/render/colors.rs", 200.0),
        ("src/main.rs", 150.0),
        ("docs/design.md", 300.0),
        ("docs/guide.md", 420.0),
        ("Cargo.toml", 40.0),
    ]
    .into_iter()
    .map(|(path, weight)| WeightedRecord::new(path, weight))
    .collect()
}

fn load_records(path: &Path) -> anyhow::Result<Vec<WeightedRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records = tree::parse_records(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(records)
}

/// Ratio of longest to shortest edge, averaged over leaves.
fn mean_elongation(tree: &WeightedTree, layout: &Layout) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for cell in layout.cells.iter().filter(|c| tree.get(c.node).is_leaf()) {
        let [a, b, c] = cell.triangle.points();
        let edges = [
            a.distance_squared(&b),
            b.distance_squared(&c),
            c.distance_squared(&a),
        ];
        let longest = edges.iter().copied().fold(0.0, f64::max);
        let shortest = edges.iter().copied().fold(f64::INFINITY, f64::min);
        if shortest > 0.0 {
            total += (longest / shortest).sqrt();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trimap=debug".parse()?),
        )
        .init();

    let mut input: Option<PathBuf> = None;
    let mut settings = colors::ColorSettings::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--colors" => {
                let value = args.next().context("--colors needs a mode")?;
                settings.mode = colors::parse_mode(&value).with_context(|| {
                    format!("unknown color mode {value:?} (branch, name, depth)")
                })?;
            }
            other if other.starts_with("--") => bail!("unknown flag {other}"),
            other => input = Some(PathBuf::from(other)),
        }
    }

    let records = match input {
        Some(path) => load_records(&path)?,
        None => sample_records(),
    };

    println!("=== DIAGNOSTIC: Records → Tree → Layout Pipeline ===");
    println!("\n[1] Records: {}", records.len());

    let tree = tree::build_tree("root", &records);
    let root_node = tree.get(tree.root);
    println!(
        "\n[2] Tree built: {} nodes, root weight {}",
        tree.len(),
        root_node.weight
    );

    let container = trimap::equilateral(1000.0);
    let root_area = container.area();

    for mode in [SplitMode::SliceAndDice, SplitMode::Squarify] {
        let config = LayoutConfig {
            mode,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&tree, tree.root, container, &config)?;

        println!("\n[3] {:?}: {} triangles", mode, layout.len());
        println!("    Top-level children:");
        for (i, child) in tree.children(tree.root).take(10).enumerate() {
            let node = tree.get(child);
            let area = layout.triangle(child).map(|t| t.area()).unwrap_or(0.0);
            let expected = root_area * node.weight / root_node.weight.max(f64::MIN_POSITIVE);
            println!(
                "    [{}] '{}' weight {} → area {:.1} (expected {:.1})",
                i, node.name, node.weight, area, expected
            );
        }

        let leaf_area: f64 = layout
            .cells
            .iter()
            .filter(|c| tree.get(c.node).is_leaf())
            .map(|c| c.triangle.area())
            .sum();
        println!("    Leaf area:  {:.1}", leaf_area);
        println!("    Root area:  {:.1}", root_area);
        println!("    Coverage:   {:.4}%", leaf_area / root_area * 100.0);
        println!("    Mean leaf elongation: {:.2}", mean_elongation(&tree, &layout));

        let stats = &layout.stats;
        println!(
            "    Splits: {} ({} steps), unconverged {}, unbracketed {}, max drift {:.5}%",
            stats.splits,
            stats.bisection_steps,
            stats.unconverged,
            stats.unbracketed,
            stats.max_terminal_drift * 100.0
        );

        let mut scene = Scene::new();
        let summary =
            render::build_scene(&mut scene, &tree, &layout, &settings, Affine::IDENTITY);
        println!(
            "    Scene ({} colors): {} filled, {} outlined",
            colors::mode_name(settings.mode),
            summary.filled,
            summary.outlined
        );

        println!("    Label anchors:");
        for (node, p) in render::label_anchors(&layout, 1, root_area * 0.02) {
            println!("      {:<24} ({:.1}, {:.1})", tree.path_of(node), p.x, p.y);
        }
    }

    Ok(())
}
