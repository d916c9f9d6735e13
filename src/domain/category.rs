use serde::{Deserialize, Serialize};

/// A category row as stored in the catalog: flat, parent-linked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// A node of the assembled category tree. Roots carry `parent_id == None`
/// and `level == 1`; children increase the level by one per depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub level: u32,
    pub children: Vec<CategoryNode>,
}

/// A level-annotated row produced by flattening the tree; also the lookup
/// snapshot the feature extractor resolves category ids against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatCategory {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub parent_id: Option<String>,
}
