use crate::client::request::JobConfig;
use crate::common::error::error;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Job options stored in a TOML file.
///
/// ```toml
/// command = "metamap -V USAbase -N -E -A+"
/// notes = "Classification of website visitor queries"
/// silent_email = true
/// priority = 2
/// ```
#[derive(Default, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfigDef {
    pub command: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub silent_email: bool,
    #[serde(default)]
    pub silent_on_errors: bool,
    #[serde(default)]
    pub single_line: bool,
    #[serde(default)]
    pub single_line_with_id: bool,
    pub priority: Option<i32>,
    pub env: Option<String>,
}

impl JobConfigDef {
    pub fn parse(text: &str) -> crate::Result<Self> {
        let def: JobConfigDef = toml::from_str(text)?;
        if def.command.as_deref().is_some_and(|cmd| cmd.trim().is_empty()) {
            return error("Job command must not be empty".to_string());
        }
        Ok(def)
    }

    pub fn into_config(self) -> JobConfig {
        let default = JobConfig::default();
        JobConfig {
            command: self.command.unwrap_or(default.command),
            notes: self.notes,
            silent_email: self.silent_email,
            silent_on_errors: self.silent_on_errors,
            single_line: self.single_line,
            single_line_with_id: self.single_line_with_id,
            priority: self.priority.unwrap_or(default.priority),
            batch_env: self.env,
        }
    }
}

pub fn load_job_file(path: &Path) -> anyhow::Result<JobConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read job file {}", path.display()))?;
    let def = JobConfigDef::parse(&text)
        .with_context(|| format!("Invalid job file {}", path.display()))?;
    Ok(def.into_config())
}
