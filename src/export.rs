use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::error::Result;

/// Persist a dataset as JSON-lines, one record per line, under a
/// timestamped filename. Returns the written path.
pub fn write_jsonl<T: Serialize>(records: &[T], dataset: &str, output_dir: &str) -> Result<String> {
    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    // Generate filename with timestamp
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("{dataset}_{timestamp}.jsonl");
    let filepath = Path::new(output_dir).join(&filename);

    let mut content = String::new();
    for record in records {
        content.push_str(&serde_json::to_string(record)?);
        content.push('\n');
    }
    fs::write(&filepath, content)?;

    Ok(filepath.to_string_lossy().to_string())
}
