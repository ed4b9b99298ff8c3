//! Analyze command - summarize a data file.

use std::path::PathBuf;

use colored::Colorize;

use alembic::Alembic;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        file.display().to_string().white()
    );

    let alembic = Alembic::new();
    let (table, source) = alembic.load(&file)?;
    let summary = alembic.summarize(&table);

    println!(
        "{} rows, {} columns ({})",
        summary.shape.0.to_string().white().bold(),
        summary.shape.1.to_string().white().bold(),
        source.format
    );

    if verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for (name, dtype) in &summary.dtypes {
            let missing = summary.missing_percent.get(name).copied().unwrap_or(0.0);
            println!("  {:24} {:10} {:>5.1}% missing", name, dtype, missing);
        }
        if !summary.constant_columns.is_empty() {
            println!(
                "{} {}",
                "Constant columns:".yellow(),
                summary.constant_columns.join(", ")
            );
        }
        println!();
    }

    let json = serde_json::to_string_pretty(&summary)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "{} summary to {}",
                "Wrote".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
