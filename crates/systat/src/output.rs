//! Output formatting: YAML, JSON, table.
//!
//! Renders data in the format chosen by `--output` / `--json` or the config
//! file. Tables use `tabled`; structured formats use serde and are
//! highlighted when writing to a color-capable terminal.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use systat_config::Config;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::highlight;

/// Every output decision for one invocation, resolved up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub highlight: bool,
}

impl OutputConfig {
    /// Flags win over the config file; `--json` wins over both.
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let format = if global.json {
            OutputFormat::Json
        } else if let Some(format) = global.output {
            format
        } else {
            parse_setting("defaults.output", &cfg.defaults.output)?
        };

        let color = match global.color {
            Some(color) => color,
            None => parse_setting("defaults.color", &cfg.defaults.color)?,
        };

        let highlight = !global.raw && format != OutputFormat::Table && should_color(color);
        Ok(Self { format, highlight })
    }
}

fn parse_setting<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| {
        CliError::Config(systat_config::ConfigError::Validation {
            field: field.into(),
            reason,
        })
    })
}

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render `data` in the configured format. `table` builds the table
/// view; YAML and JSON serialize `data` itself.
pub fn render<T: Serialize + ?Sized>(
    out: &OutputConfig,
    data: &T,
    table: impl FnOnce(&T) -> String,
) -> Result<String, CliError> {
    let text = match out.format {
        OutputFormat::Table => return Ok(table(data)),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    };

    if !out.highlight {
        return Ok(text);
    }
    Ok(match out.format {
        OutputFormat::Json => highlight::json(&text),
        _ => highlight::yaml(&text),
    })
}

/// Print rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let text = output.strip_suffix('\n').unwrap_or(output);
    let _ = writeln!(stdout, "{text}");
}

// ── Table renderers ──────────────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// A titled table, for reports made of several lists.
pub fn titled_table<R: Tabled>(title: &str, rows: &[R]) -> String {
    format!("{title}\n{}", render_table(rows))
}

/// Two-column field/value table for single-object reports. Nested
/// fields are flattened to dotted paths.
pub fn kv_table<T: Serialize + ?Sized>(data: &T) -> String {
    let mut pairs = Vec::new();
    match serde_json::to_value(data) {
        Ok(value) => flatten("", &value, &mut pairs),
        Err(e) => pairs.push(("error".to_owned(), e.to_string())),
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (field, value) in pairs {
        builder.push_record([field, value]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{prefix}.{key}")
        }
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(&join(key), child, out);
            }
        }
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => {
            let joined = items.iter().map(scalar).collect::<Vec<_>>().join(", ");
            out.push((prefix.to_owned(), joined));
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten(&join(&i.to_string()), child, out);
            }
        }
        other => out.push((prefix.to_owned(), scalar(other))),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_owned(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
