use crate::domain::{CategoryNode, CategoryRecord, FlatCategory};

/// Builds the subtree of every record whose `parent_id` matches
/// `parent_id` exactly, recursing into children with `level + 1`. Pure
/// construction: the input list is never aliased into the tree.
pub fn build_tree(
    records: &[CategoryRecord],
    parent_id: Option<&str>,
    level: u32,
) -> Vec<CategoryNode> {
    records
        .iter()
        .filter(|record| record.parent_id.as_deref() == parent_id)
        .map(|record| CategoryNode {
            id: record.id.clone(),
            name: record.name.clone(),
            parent_id: record.parent_id.clone(),
            level,
            children: build_tree(records, Some(&record.id), level + 1),
        })
        .collect()
}

/// The full category tree: roots are the records with no parent.
pub fn build_category_tree(records: &[CategoryRecord]) -> Vec<CategoryNode> {
    build_tree(records, None, 1)
}

/// Depth-first flatten, parent before child. Levels and parent links are
/// derived from the traversal so the output is consistent even for a tree
/// assembled elsewhere.
pub fn flatten_tree(tree: &[CategoryNode]) -> Vec<FlatCategory> {
    let mut result = Vec::new();
    flatten_into(tree, 1, None, &mut result);
    result
}

fn flatten_into(
    nodes: &[CategoryNode],
    level: u32,
    parent_id: Option<&str>,
    result: &mut Vec<FlatCategory>,
) {
    for node in nodes {
        result.push(FlatCategory {
            id: node.id.clone(),
            name: node.name.clone(),
            level,
            parent_id: parent_id.map(|id| id.to_string()),
        });
        flatten_into(&node.children, level + 1, Some(&node.id), result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, parent_id: Option<&str>) -> CategoryRecord {
        CategoryRecord {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(|p| p.to_string()),
        }
    }

    fn sample_records() -> Vec<CategoryRecord> {
        vec![
            record("women", "Women", None),
            record("men", "Men", None),
            record("dresses", "Dresses", Some("women")),
            record("maxi", "Maxi Dresses", Some("dresses")),
            record("shirts", "Shirts", Some("men")),
        ]
    }

    #[test]
    fn test_build_tree_levels_and_children() {
        let tree = build_category_tree(&sample_records());

        assert_eq!(tree.len(), 2);
        let women = &tree[0];
        assert_eq!(women.level, 1);
        assert_eq!(women.children.len(), 1);
        assert_eq!(women.children[0].id, "dresses");
        assert_eq!(women.children[0].level, 2);
        assert_eq!(women.children[0].children[0].id, "maxi");
        assert_eq!(women.children[0].children[0].level, 3);
    }

    #[test]
    fn test_flatten_parent_before_child() {
        let tree = build_category_tree(&sample_records());
        let flat = flatten_tree(&tree);

        let ids: Vec<&str> = flat.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["women", "dresses", "maxi", "men", "shirts"]);

        let maxi = flat.iter().find(|c| c.id == "maxi").unwrap();
        assert_eq!(maxi.level, 3);
        assert_eq!(maxi.parent_id.as_deref(), Some("dresses"));
    }

    #[test]
    fn test_every_id_appears_exactly_once() {
        let records = sample_records();
        let flat = flatten_tree(&build_category_tree(&records));

        assert_eq!(flat.len(), records.len());
        for record in &records {
            assert_eq!(flat.iter().filter(|c| c.id == record.id).count(), 1);
        }
    }

    #[test]
    fn test_flatten_build_round_trip() {
        let flat = flatten_tree(&build_category_tree(&sample_records()));

        // Rebuild from the flattened rows and flatten again
        let records: Vec<CategoryRecord> = flat
            .iter()
            .map(|c| CategoryRecord {
                id: c.id.clone(),
                name: c.name.clone(),
                parent_id: c.parent_id.clone(),
            })
            .collect();
        let round_tripped = flatten_tree(&build_category_tree(&records));

        assert_eq!(round_tripped, flat);
    }

    #[test]
    fn test_orphaned_parent_ids_are_excluded() {
        let mut records = sample_records();
        records.push(record("ghost-child", "Ghost", Some("missing-parent")));

        let flat = flatten_tree(&build_category_tree(&records));
        assert!(flat.iter().all(|c| c.id != "ghost-child"));
    }
}
