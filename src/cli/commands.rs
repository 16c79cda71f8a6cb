//! Command implementations

use super::{CacheAction, OutputFormat};
use crate::compare::{Comparer, Fragments};
use crate::config::Config;
use crate::extract::{escape_html, TaskDescriptor};
use crate::source::WikiClient;
use crate::storage::open_cache;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Build the comparison pipeline from configuration
pub fn build_comparer(config: &Config) -> Result<Comparer> {
    let client = WikiClient::new(config.source.clone()).context("Failed to create wiki client")?;
    let cache = open_cache(&config.cache);
    Ok(Comparer::new(Arc::new(client), cache, config.cache.ttl()))
}

/// Show one task's code in two languages
pub async fn extract(
    config: &Config,
    task: &str,
    lang1: &str,
    lang2: &str,
    format: OutputFormat,
) -> Result<()> {
    let comparer = build_comparer(config)?;
    let fragments = comparer.extract(task, lang1, lang2).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fragments)?),
        OutputFormat::Html => print!("{}", fragments.to_html()),
        OutputFormat::Text => print_fragments_text(&fragments),
    }

    Ok(())
}

/// List tasks solved in both languages
pub async fn overlap(config: &Config, lang1: &str, lang2: &str, format: OutputFormat) -> Result<()> {
    let comparer = build_comparer(config)?;
    let tasks = comparer.overlap(lang1, lang2).await?;

    if format == OutputFormat::Text {
        println!("{} tasks solved in both {} and {}\n", tasks.len(), lang1, lang2);
    }
    print_tasks(&tasks, format)
}

/// List tasks solved in one language
pub async fn tasks(config: &Config, language: &str, format: OutputFormat) -> Result<()> {
    let comparer = build_comparer(config)?;
    let tasks = comparer.tasks(language).await?;

    if format == OutputFormat::Text {
        println!("{} tasks solved in {}\n", tasks.len(), language);
    }
    print_tasks(&tasks, format)
}

/// Inspect or empty the fragment cache
pub fn cache(config: &Config, action: CacheAction, format: OutputFormat) -> Result<()> {
    if !config.cache.enabled {
        println!("Fragment cache is disabled.");
        return Ok(());
    }

    let cache = open_cache(&config.cache);

    match action {
        CacheAction::Stats => {
            let stats = cache.stats()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => {
                    println!("Cache: {:?}", config.cache.resolved_path());
                    println!("Live entries:    {}", stats.live);
                    println!("Expired entries: {}", stats.expired);
                    println!("TTL: {}s", config.cache.ttl_secs);
                }
            }
        }
        CacheAction::Clear => {
            let removed = cache.clear()?;
            println!("✓ Removed {} cache entries", removed);
        }
    }

    Ok(())
}

/// Show the effective configuration
pub fn show_config(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        _ => print!("{}", config.to_toml()?),
    }
    Ok(())
}

/// Print fragments in human-readable form
pub fn print_fragments_text(fragments: &Fragments) {
    print!("{}", format_fragments_text(fragments));
}

/// Task header followed by each language's decoded code
pub fn format_fragments_text(fragments: &Fragments) -> String {
    let origin = if fragments.cached { " (cached)" } else { "" };
    let mut out = format!("{}{}\n", fragments.task, origin);
    out.push_str(&"=".repeat(fragments.task.chars().count() + origin.len()));
    out.push_str("\n\n");

    let (first, second) = fragments.to_text();
    for (language, code) in [
        (&fragments.languages.first, first),
        (&fragments.languages.second, second),
    ] {
        out.push_str(&format!("--- {} ---\n{}\n\n", language, code));
    }
    out
}

fn print_tasks(tasks: &[TaskDescriptor], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(tasks)?),
        OutputFormat::Html => {
            println!("<ul>");
            for task in tasks {
                println!(
                    "  <li><a href=\"{}\">{}</a></li>",
                    escape_html(&task.name),
                    escape_html(&task.display_label)
                );
            }
            println!("</ul>");
        }
        OutputFormat::Text => {
            for task in tasks {
                println!("  {:<40} {}", task.name, task.display_label);
            }
        }
    }
    Ok(())
}
