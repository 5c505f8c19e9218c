//! Output formatting: table, JSON, YAML, plain.
//!
//! The format is resolved once into a `Render` value and passed down to
//! each handler. Table uses `tabled`, structured formats use serde, plain
//! emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use unified_api::CommandResponse;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Resolved presentation settings for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Render {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Render {
    /// Print a list in the chosen format.
    pub fn list<T, R>(
        &self,
        data: &[T],
        to_row: impl Fn(&T) -> R,
        id_fn: impl Fn(&T) -> String,
    ) -> Result<(), CliError>
    where
        T: Serialize,
        R: Tabled,
    {
        let out = render_list(self.format, data, to_row, id_fn)?;
        print_output(&out, self.quiet);
        Ok(())
    }

    /// Print a single record in the chosen format.
    pub fn single<T: Serialize>(
        &self,
        data: &T,
        detail_fn: impl Fn(&T) -> String,
        id_fn: impl Fn(&T) -> String,
    ) -> Result<(), CliError> {
        let out = render_single(self.format, data, detail_fn, id_fn)?;
        print_output(&out, self.quiet);
        Ok(())
    }

    /// Print a command result: the full envelope for structured formats,
    /// a one-line status otherwise.
    pub fn command(&self, action: &str, resp: &CommandResponse) -> Result<(), CliError> {
        let out = match self.format {
            OutputFormat::Table | OutputFormat::Plain => {
                format!("{action}: {}", render_status(resp, self.color))
            }
            other => render_single(other, resp, |_| String::new(), |_| String::new())?,
        };
        print_output(&out, self.quiet);
        Ok(())
    }
}

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// `meta.rc` plus message, green when ok and red otherwise.
pub fn render_status(resp: &CommandResponse, color: bool) -> String {
    let rc = if resp.meta.rc.is_empty() { "ok" } else { resp.meta.rc.as_str() };
    let text = match resp.meta.msg {
        Some(ref msg) => format!("{rc} ({msg})"),
        None => rc.to_owned(),
    };
    match (color, rc == "ok") {
        (false, _) => text,
        (true, true) => text.green().to_string(),
        (true, false) => text.red().bold().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are key/value
/// listings rather than `Tabled` rows.
pub fn render_single<T: Serialize>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// `key: value` lines with the keys padded to a common width.
pub fn detail_lines(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Optional field for table cells and detail views.
pub fn or_dash<T: ToString>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".into(), ToString::to_string)
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use unified_api::Meta;

    #[derive(Serialize, Tabled)]
    struct Row {
        id: String,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "a1".into(),
                name: "first".into(),
            },
            Row {
                id: "a2".into(),
                name: "second".into(),
            },
        ]
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(
            OutputFormat::Plain,
            &rows(),
            |r| Row {
                id: r.id.clone(),
                name: r.name.clone(),
            },
            |r| r.id.clone(),
        )
        .unwrap();
        assert_eq!(out, "a1\na2");
    }

    #[test]
    fn json_compact_serializes_original_data() {
        let out = render_list(
            OutputFormat::JsonCompact,
            &rows(),
            |r| Row {
                id: r.id.clone(),
                name: r.name.clone(),
            },
            |r| r.id.clone(),
        )
        .unwrap();
        assert_eq!(
            out,
            r#"[{"id":"a1","name":"first"},{"id":"a2","name":"second"}]"#
        );
    }

    #[test]
    fn table_contains_headers_and_values() {
        let out = render_list(
            OutputFormat::Table,
            &rows(),
            |r| Row {
                id: r.id.clone(),
                name: r.name.clone(),
            },
            |r| r.id.clone(),
        )
        .unwrap();
        assert!(out.contains("id"));
        assert!(out.contains("second"));
    }

    #[test]
    fn status_without_color_is_plain_text() {
        let mut resp = CommandResponse::default();
        assert_eq!(render_status(&resp, false), "ok");

        resp.meta = Meta {
            rc: "error".into(),
            msg: Some("api.err.UnknownDevice".into()),
        };
        assert_eq!(render_status(&resp, false), "error (api.err.UnknownDevice)");
        assert!(render_status(&resp, true).contains("\u{1b}["));
    }

    #[test]
    fn detail_lines_align_keys() {
        let out = detail_lines(&[("id", "a1".into()), ("message", "x".into())]);
        assert_eq!(out, "id       a1\nmessage  x");
    }
}
