use anyhow::{Result, Context as AnyhowContext};
use std::fs;
use crate::runtime::task::TaskMap;

pub fn load_tasks_from_yaml(file_path: &str) -> Result<TaskMap> {
    let yaml_content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read YAML file from {}", file_path))?;

    let tasks: TaskMap = serde_yaml::from_str(&yaml_content)
        .with_context(|| format!("Failed to deserialize task batch from {}", file_path))?;

    Ok(tasks)
}
