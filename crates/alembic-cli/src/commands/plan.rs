//! Plan command - request a preprocessing plan from a provider.

use std::path::PathBuf;

use colored::Colorize;

use alembic::{Alembic, MockProvider, OpenRouterProvider, ProviderConfig};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    mock: bool,
    model: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let alembic = if mock {
        Alembic::new().with_provider(MockProvider::new())
    } else {
        let provider = match model {
            Some(model) => OpenRouterProvider::with_config(
                std::env::var("OPENROUTER_API_KEY")
                    .map_err(|_| "OPENROUTER_API_KEY environment variable not set")?,
                ProviderConfig {
                    model,
                    ..ProviderConfig::default()
                },
            )?,
            None => OpenRouterProvider::from_env()?,
        };
        Alembic::new().with_provider(provider)
    };

    println!(
        "{} {}",
        "Planning".cyan().bold(),
        file.display().to_string().white()
    );

    let (table, _) = alembic.load(&file)?;
    let summary = alembic.summarize(&table);
    let plan = alembic.propose(&summary)?;

    println!(
        "Provider proposed directives for {} columns",
        plan.columns.len().to_string().white().bold()
    );

    if verbose {
        println!();
        for (column, directive) in &plan.columns {
            println!("{}", column.yellow().bold());
            for (i, action) in directive.actions.iter().enumerate() {
                println!("  {} - {}", action.token().cyan(), directive.reason(i));
            }
        }
        println!();
    }

    let path = output.unwrap_or_else(|| default_sibling(&file, "plan.json"));
    std::fs::write(&path, serde_json::to_string_pretty(&plan)?)?;
    println!(
        "{} plan to {}",
        "Wrote".green().bold(),
        path.display().to_string().cyan()
    );

    Ok(())
}

/// `<file>.<suffix>` next to the input file.
pub fn default_sibling(file: &PathBuf, suffix: &str) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    file.with_file_name(format!("{}.{}", stem, suffix))
}
