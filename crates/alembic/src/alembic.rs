//! Main Alembic struct and public API.

use std::path::Path;
use std::sync::Arc;

use crate::engine::{ActionLog, Engine};
use crate::error::{AlembicError, Result};
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::plan::PreprocessingPlan;
use crate::provider::PlanProvider;
use crate::summary::{DatasetSummary, SummaryBuilder};

/// Configuration for an Alembic pipeline.
#[derive(Debug, Clone, Default)]
pub struct AlembicConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
}

/// Everything a full pipeline run produces.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The summary the provider decided from.
    pub summary: DatasetSummary,
    /// The plan that was executed (after any overrides).
    pub plan: PreprocessingPlan,
    /// The transformed dataset.
    pub table: DataTable,
    /// What was planned per column.
    pub log: ActionLog,
}

/// The preprocessing pipeline: parse, summarize, plan, execute.
///
/// ```no_run
/// use alembic::{Alembic, MockProvider};
///
/// let alembic = Alembic::new().with_provider(MockProvider::new());
/// let report = alembic.run("data.csv").unwrap();
///
/// println!("columns out: {}", report.table.column_count());
/// ```
pub struct Alembic {
    parser: Parser,
    summarizer: SummaryBuilder,
    engine: Engine,
    provider: Option<Arc<dyn PlanProvider>>,
}

impl Alembic {
    /// Create a pipeline with default configuration and no provider.
    pub fn new() -> Self {
        Self::with_config(AlembicConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: AlembicConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            summarizer: SummaryBuilder::new(),
            engine: Engine::new(),
            provider: None,
        }
    }

    /// Attach a plan provider.
    pub fn with_provider(mut self, provider: impl PlanProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Parse a data file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Summarize a table for the plan provider.
    pub fn summarize(&self, table: &DataTable) -> DatasetSummary {
        self.summarizer.build(table)
    }

    /// Ask the configured provider for a plan.
    pub fn propose(&self, summary: &DatasetSummary) -> Result<PreprocessingPlan> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            AlembicError::Config("no plan provider configured".to_string())
        })?;
        provider.propose(summary)
    }

    /// Execute a plan against a table.
    ///
    /// Takes the table by value: the engine owns its working copy. The
    /// returned table has boolean columns normalized to 0/1, ready for
    /// export.
    pub fn execute(&self, table: DataTable, plan: &PreprocessingPlan) -> (DataTable, ActionLog) {
        let (mut table, log) = self.engine.run(table, plan);
        table.normalize_boolean_columns();
        (table, log)
    }

    /// Run the full pipeline on a file: parse, summarize, plan, execute.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<RunReport> {
        let (table, source) = self.load(path)?;
        let summary = self.summarize(&table);
        let plan = self.propose(&summary)?;
        let (table, log) = self.execute(table, &plan);

        Ok(RunReport {
            source,
            summary,
            plan,
            table,
            log,
        })
    }
}

impl Default for Alembic {
    fn default() -> Self {
        Self::new()
    }
}
