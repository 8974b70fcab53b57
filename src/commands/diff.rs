use crate::artifacts::patch::options::DiffOptions;
use crate::artifacts::render::html::render_html;
use crate::artifacts::render::terminal::render_text;
use crate::commands::session::Session;
use crate::domain::node::Node;
use anyhow::Context;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
    Text,
}

impl From<&OutputFormat> for &str {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Text => "text",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let format: &str = self.into();
        write!(f, "{format}")
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "text" => Ok(OutputFormat::Text),
            _ => anyhow::bail!("invalid format: {s} (expected 'json', 'html' or 'text')"),
        }
    }
}

pub fn read_document(path: &Path) -> anyhow::Result<Node> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;

    serde_json::from_str(&raw).with_context(|| format!("invalid document in {}", path.display()))
}

impl Session {
    pub fn diff(
        &self,
        old_path: &Path,
        new_path: &Path,
        options: &DiffOptions,
        format: OutputFormat,
    ) -> anyhow::Result<()> {
        let old = read_document(old_path)?;
        let new = read_document(new_path)?;
        debug!(?options, %format, "diffing documents");

        let merged = crate::diff(&old, &new, options).with_context(|| {
            format!(
                "failed to diff {} against {}",
                old_path.display(),
                new_path.display()
            )
        })?;

        match format {
            OutputFormat::Json => {
                writeln!(self.writer(), "{}", serde_json::to_string_pretty(&merged)?)?
            }
            OutputFormat::Html => writeln!(self.writer(), "{}", render_html(&merged))?,
            OutputFormat::Text => writeln!(self.writer(), "{}", render_text(&merged))?,
        }

        Ok(())
    }
}
