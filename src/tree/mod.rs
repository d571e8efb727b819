pub mod aggregate;
pub mod arena;

use std::collections::HashMap;

use compact_str::CompactString;

use self::arena::{NodeId, WeightedNode, WeightedTree};
use crate::error::RecordError;

/// Flat input record: a slash-separated path and the weight of the leaf it names.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRecord {
    pub path: String,
    pub weight: f64,
}

impl WeightedRecord {
    pub fn new(path: impl Into<String>, weight: f64) -> Self {
        Self {
            path: path.into(),
            weight,
        }
    }
}

/// Parse `<path> <weight>` lines. Blank lines and `#` comments are skipped.
pub fn parse_records(input: &str) -> Result<Vec<WeightedRecord>, RecordError> {
    let mut records = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let (Some(path), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(RecordError::Malformed {
                line,
                content: trimmed.to_string(),
            });
        };

        let weight = value
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w >= 0.0)
            .ok_or_else(|| RecordError::BadWeight {
                line,
                value: value.to_string(),
            })?;

        if path.split('/').all(str::is_empty) {
            return Err(RecordError::EmptyPath { line });
        }

        records.push(WeightedRecord::new(path, weight));
    }
    Ok(records)
}

/// Build a WeightedTree from flat records.
/// Intermediate nodes are created on demand, internal weights are the sums of
/// their children, and siblings end up sorted by descending weight.
/// Repeated leaf paths accumulate; a weight recorded on a path that later
/// gains children is replaced by the children's sum.
pub fn build_tree(root_name: &str, records: &[WeightedRecord]) -> WeightedTree {
    let mut tree = WeightedTree::new(root_name, 0.0);
    if records.is_empty() {
        return tree;
    }

    tracing::info!("Building tree from {} records", records.len());

    // Map from path prefix → NodeId for parent lookups
    let mut path_map: HashMap<CompactString, NodeId> = HashMap::new();

    for record in records {
        let id = ensure_node(&mut tree, &mut path_map, &record.path);
        tree.get_mut(id).weight += record.weight;
    }

    aggregate::aggregate_weights(&mut tree);
    aggregate::sort_children_by_weight(&mut tree);

    tracing::info!(
        "Tree built: {} total nodes, {} direct children of root, total weight {}",
        tree.len(),
        tree.children(tree.root).count(),
        tree.get(tree.root).weight
    );

    tree
}

/// Ensure a node exists for every prefix of `path`, creating missing ones
/// from the root downward. Returns the node for the full path.
fn ensure_node(
    tree: &mut WeightedTree,
    path_map: &mut HashMap<CompactString, NodeId>,
    path: &str,
) -> NodeId {
    let mut parent = tree.root;
    let mut prefix = CompactString::default();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);

        parent = match path_map.get(&prefix) {
            Some(&id) => id,
            None => {
                let id = tree.add_child(parent, WeightedNode::new(segment, 0.0));
                path_map.insert(prefix.clone(), id);
                id
            }
        };
    }

    parent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_and_skips_comments() {
        let input = "# sizes\n\nsrc/main.rs 120\nsrc/lib.rs\t30.5\nREADME 4\n";
        let records = parse_records(input).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], WeightedRecord::new("src/lib.rs", 30.5));
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(matches!(
            parse_records("a/b"),
            Err(RecordError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_records("ok 1\na/b -3"),
            Err(RecordError::BadWeight { line: 2, .. })
        ));
        assert!(matches!(
            parse_records("a NaN"),
            Err(RecordError::BadWeight { line: 1, .. })
        ));
        assert!(matches!(
            parse_records("// 2"),
            Err(RecordError::EmptyPath { line: 1 })
        ));
    }

    #[test]
    fn builds_nested_tree_with_sums() {
        let records = vec![
            WeightedRecord::new("a/x", 1.0),
            WeightedRecord::new("a/y", 4.0),
            WeightedRecord::new("b", 2.0),
            WeightedRecord::new("a/x", 1.0),
        ];
        let tree = build_tree("root", &records);
        assert_eq!(tree.get(tree.root).weight, 8.0);

        let kids: Vec<_> = tree.children(tree.root).collect();
        assert_eq!(kids.len(), 2);
        assert_eq!(tree.get(kids[0]).name, "a");
        assert_eq!(tree.get(kids[0]).weight, 6.0);

        let a_kids: Vec<_> = tree.children(kids[0]).collect();
        assert_eq!(tree.get(a_kids[0]).name, "y");
        assert_eq!(tree.get(a_kids[1]).weight, 2.0);
    }

    #[test]
    fn empty_records_give_bare_root() {
        let tree = build_tree("(empty)", &[]);
        assert!(tree.is_bare_root());
        assert_eq!(tree.len(), 1);
        assert!(tree.get(tree.root).is_leaf());
    }
}
