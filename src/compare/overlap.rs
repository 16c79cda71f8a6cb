//! Tasks solved in both languages

use crate::error::Result;
use crate::extract::{parse_document, parse_task_index, TaskDescriptor};
use crate::source::DocumentSource;
use std::collections::{BTreeMap, HashSet};

/// Fetch and parse a language's task index
pub async fn task_index(source: &dyn DocumentSource, language: &str) -> Result<Vec<TaskDescriptor>> {
    let page = language.trim();
    let body = source.fetch(page).await?;
    let tasks = index_tasks(page, &body)?;
    tracing::debug!("{} lists {} tasks", page, tasks.len());
    Ok(tasks)
}

fn index_tasks(page: &str, body: &[u8]) -> Result<Vec<TaskDescriptor>> {
    let doc = parse_document(page, body)?;
    Ok(parse_task_index(&doc))
}

/// Tasks listed on both languages' index pages.
///
/// Either index failing aborts the whole lookup.
pub async fn find_overlap(
    source: &dyn DocumentSource,
    lang1: &str,
    lang2: &str,
) -> Result<Vec<TaskDescriptor>> {
    let first = task_index(source, lang1).await?;
    let second = task_index(source, lang2).await?;
    Ok(common_tasks(&first, &second))
}

/// Tally task names across both lists and keep those present in each.
///
/// Duplicates within one list count once. When both lists carry a name, the
/// descriptor seen last is kept. Results come back ordered by name.
pub fn common_tasks(first: &[TaskDescriptor], second: &[TaskDescriptor]) -> Vec<TaskDescriptor> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut canonical: BTreeMap<&str, &TaskDescriptor> = BTreeMap::new();

    for list in [first, second] {
        let mut seen = HashSet::new();
        for task in list {
            canonical.insert(task.name.as_str(), task);
            if seen.insert(task.name.as_str()) {
                *counts.entry(task.name.as_str()).or_default() += 1;
            }
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .filter_map(|(name, _)| canonical.get(name).map(|task| (*task).clone()))
        .collect()
}
