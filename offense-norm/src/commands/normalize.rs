//! `normalize` command: batch normalization of offense descriptions.
//!
//! Records come from the positional arguments, an input file, or stdin (one
//! record per line). Output is one normalized line per record, in input order.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use offense_norm_core::{MemoizedNormalizer, Normalizer, RuleEngine};

use crate::cli::NormalizeCommand;
use crate::commands::resolve_config;

/// Entry point for `offense-norm normalize`.
pub async fn run_normalize(cmd: NormalizeCommand, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path, &cmd.catalog)?;
    let engine = RuleEngine::from_config(&config)?;
    info!(
        "Using catalog '{}' ({} rules).",
        engine.catalog().version(),
        engine.catalog().len()
    );

    let records = read_records(&cmd.text, cmd.input_file.as_deref())?;
    debug!("Read {} records.", records.len());
    let jobs = usize::from(cmd.jobs);

    let outputs = if cmd.no_cache {
        normalize_records(Arc::new(engine), records, jobs).await?
    } else {
        let memo = Arc::new(MemoizedNormalizer::new(engine));
        let outputs = normalize_records(Arc::clone(&memo), records, jobs).await?;
        let stats = memo.stats();
        info!("Memo cache: {} hits, {} misses.", stats.hits, stats.misses);
        outputs
    };

    write_output(&outputs, cmd.output.as_ref())
}

/// Collects the input records: positional text first, then the input file, then stdin.
pub fn read_records(text: &[String], input_file: Option<&Path>) -> Result<Vec<String>> {
    if !text.is_empty() {
        return Ok(text.to_vec());
    }
    let content = match input_file {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?
        }
        None => {
            info!("Reading input from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer
        }
    };
    Ok(content.lines().map(str::to_string).collect())
}

/// Normalizes `records` with `jobs` blocking workers sharing one engine.
///
/// Records are split into contiguous chunks, one per worker, and the chunks are
/// reassembled in order, so output position always matches input position.
pub async fn normalize_records<N>(engine: Arc<N>, records: Vec<String>, jobs: usize) -> Result<Vec<String>>
where
    N: Normalizer + 'static,
{
    if jobs <= 1 || records.len() < 2 {
        return Ok(records.iter().map(|r| engine.normalize(Some(r.as_str()))).collect());
    }

    let total = records.len();
    let chunk_size = total.div_ceil(jobs);
    debug!("Fanning {} records out to {} workers ({} per chunk).", total, jobs, chunk_size);

    let mut handles = Vec::with_capacity(jobs);
    let mut remaining = records.into_iter();
    loop {
        let chunk: Vec<String> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let engine = Arc::clone(&engine);
        handles.push(tokio::task::spawn_blocking(move || {
            chunk
                .iter()
                .map(|r| engine.normalize(Some(r.as_str())))
                .collect::<Vec<String>>()
        }));
    }

    let mut outputs = Vec::with_capacity(total);
    for handle in handles {
        outputs.extend(handle.await.context("Normalization worker failed")?);
    }
    Ok(outputs)
}

fn write_output(outputs: &[String], output_path: Option<&PathBuf>) -> Result<()> {
    let mut rendered = outputs.join("\n");
    if !outputs.is_empty() {
        rendered.push('\n');
    }

    match output_path {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!("Wrote {} normalized records to {}.", outputs.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
