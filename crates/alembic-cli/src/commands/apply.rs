//! Apply command - execute a plan and export the processed dataset.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;

use alembic::{Action, Alembic, MockProvider, OpenRouterProvider, PreprocessingPlan};

use super::plan::default_sibling;

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    plan_path: Option<PathBuf>,
    mock: bool,
    overrides: Vec<String>,
    output: Option<PathBuf>,
    log_path: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let alembic = match (&plan_path, mock) {
        (Some(_), _) => Alembic::new(),
        (None, true) => Alembic::new().with_provider(MockProvider::new()),
        (None, false) => Alembic::new().with_provider(OpenRouterProvider::from_env()?),
    };

    let (table, source) = alembic.load(&file)?;
    let rows_before = table.row_count();
    let cols_before = table.column_count();

    // A plan file wins over a provider call.
    let mut plan: PreprocessingPlan = match &plan_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => {
            println!("{} preprocessing plan...", "Requesting".cyan().bold());
            let summary = alembic.summarize(&table);
            alembic.propose(&summary)?
        }
    };

    for spec in &overrides {
        let (column, token) = parse_override(spec)?;
        plan = plan.with_override(column, Action::from_token(token));
        println!(
            "{} first action for '{}' -> {}",
            "Override".yellow().bold(),
            column,
            token.cyan()
        );
    }

    println!(
        "{} plan to {} ({} planned columns)",
        "Applying".cyan().bold(),
        source.file.white(),
        plan.columns.len().to_string().white().bold()
    );

    let (processed, log) = alembic.execute(table, &plan);

    if verbose {
        println!();
        for (column, record) in &log.columns {
            println!("  {:24} {}", column.yellow(), record.actions.join(" -> "));
        }
        println!();
    }

    println!(
        "{} -> {} rows, {} -> {} columns",
        rows_before,
        processed.row_count().to_string().white().bold(),
        cols_before,
        processed.column_count().to_string().white().bold()
    );

    let out_path = output.unwrap_or_else(|| default_sibling(&file, "processed.csv"));
    let writer = BufWriter::new(File::create(&out_path)?);
    processed.write_delimited(writer)?;
    println!(
        "{} processed data to {}",
        "Wrote".green().bold(),
        out_path.display().to_string().cyan()
    );

    let log_path = log_path.unwrap_or_else(|| default_sibling(&file, "actions.json"));
    std::fs::write(&log_path, serde_json::to_string_pretty(&log)?)?;
    println!(
        "{} action log to {}",
        "Wrote".green().bold(),
        log_path.display().to_string().cyan()
    );

    Ok(())
}

/// Split a `COLUMN=ACTION` override flag.
fn parse_override(spec: &str) -> Result<(&str, &str), String> {
    match spec.split_once('=') {
        Some((column, token)) if !column.is_empty() && !token.is_empty() => Ok((column, token)),
        _ => Err(format!(
            "invalid override '{}': expected COLUMN=ACTION",
            spec
        )),
    }
}
