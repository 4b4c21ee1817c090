//! Compile command: read each input, transform it, write the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use jsxc_core::{Config, ParseMode, Transformer};
use rayon::prelude::*;
use serde::Deserialize;

use crate::files::{self, SourceFile};

/// Command line settings for one run.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub paths: Vec<PathBuf>,
    pub config: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub element: Option<String>,
    pub component: Option<String>,
    pub text: Option<String>,
    pub strict: bool,
}

/// Configuration file structure (jsxc.toml). The `[jsx]` table is handed
/// to [`Config::from_toml_table`].
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    jsx: toml::Table,
    #[serde(default)]
    output: OutputSettings,
}

/// Loaded settings for one run.
#[derive(Debug, Default)]
struct Settings {
    jsx: Config,
    output: OutputSettings,
}

#[derive(Debug, Deserialize)]
struct OutputSettings {
    dir: Option<String>,
    #[serde(default = "default_extension")]
    extension: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: None,
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    "js".to_string()
}

/// Result of a run.
#[derive(Debug)]
pub struct Summary {
    pub files: usize,
    pub outputs: Vec<PathBuf>,
    pub duration_ms: u64,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<Settings> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let jsx = Config::from_toml_table(file.jsx)
            .with_context(|| format!("Failed to parse [jsx] in {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(Settings {
            jsx,
            output: file.output,
        });
    }
    Ok(Settings::default())
}

/// Command line flags take precedence over the config file.
fn effective_config(mut config: Config, options: &Options) -> Config {
    if let Some(element) = &options.element {
        config = config.with_element(element.clone());
    }
    if let Some(component) = &options.component {
        config = config.with_component(component.clone());
    }
    if let Some(text) = &options.text {
        config = config.with_text(text.clone());
    }
    if options.strict {
        config = config.with_mode(ParseMode::Strict);
    }
    config
}

/// Run the compile command.
pub fn run(options: &Options) -> Result<Summary> {
    let start = Instant::now();
    let file_config = load_config(&options.config)?;

    let transformer = Transformer::new(effective_config(file_config.jsx, options));
    let out_dir = options
        .out_dir
        .clone()
        .or_else(|| file_config.output.dir.map(PathBuf::from));

    let sources = files::collect(&options.paths)?;
    if sources.is_empty() {
        tracing::warn!("No .jsx files found");
    }

    // Compile files in parallel
    let results: Vec<Result<PathBuf>> = sources
        .par_iter()
        .map(|source| {
            let output =
                files::output_path(source, out_dir.as_deref(), &file_config.output.extension);
            compile_file(&transformer, source, &output).map(|()| output)
        })
        .collect();

    let outputs = results.into_iter().collect::<Result<Vec<_>>>()?;

    let summary = Summary {
        files: sources.len(),
        outputs,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        "Compiled {} files in {}ms",
        summary.files,
        summary.duration_ms
    );

    Ok(summary)
}

fn compile_file(transformer: &Transformer, source: &SourceFile, output: &Path) -> Result<()> {
    let start = Instant::now();

    if output == source.path.as_path() {
        anyhow::bail!(
            "Refusing to overwrite input {} with its compiled output",
            source.path.display()
        );
    }

    let input = fs::read_to_string(&source.path)
        .with_context(|| format!("Failed to read {}", source.path.display()))?;
    let compiled = transformer
        .transform(&input)
        .with_context(|| format!("Failed to compile {}", source.path.display()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, compiled).with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Transformed {} -> {} in {}ms",
        source.path.display(),
        output.display(),
        start.elapsed().as_millis()
    );

    Ok(())
}
