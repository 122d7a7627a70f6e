use std::path::PathBuf;

use clap::Parser;

use crate::client::backend::BackendKind;
use crate::client::backend::lite::LiteOptions;
use crate::client::jobfile::load_job_file;
use crate::client::request::{Credentials, JobConfig};
use crate::client::utils::split_comma_list;
use crate::common::env;
use crate::common::utils::time::ArgDuration;
use crate::watch::process::DEFAULT_TEMP_SUFFIX;

// Common CLI options
#[derive(Parser)]
pub struct CommonOpts {
    /// Enables more detailed log output
    #[arg(
        long,
        env = env::MM_DEBUG,
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub debug: bool,
}

// Credentials have to be present, their content is checked by the remote service.
// An empty environment variable counts as unset, an empty value on the command line is kept.
#[derive(Parser)]
pub struct CredentialsOpts {
    /// Username of the scheduler account
    #[arg(long, env = env::UMLS_USERNAME, hide_env_values = true)]
    pub username: String,

    /// Password of the scheduler account
    #[arg(long, env = env::UMLS_PASSWORD, hide_env_values = true)]
    pub password: String,

    /// Email address associated with submitted jobs
    #[arg(long, env = env::UMLS_EMAIL)]
    pub email: String,
}

impl From<CredentialsOpts> for Credentials {
    fn from(opts: CredentialsOpts) -> Self {
        Credentials {
            username: opts.username,
            password: opts.password,
            email: opts.email,
        }
    }
}

#[derive(Parser)]
pub struct JobConfigOpts {
    /// TOML file with job options. Options passed on the command line take precedence.
    #[arg(long, env = env::MM_JOB_FILE, value_hint = clap::ValueHint::FilePath)]
    pub job_file: Option<PathBuf>,

    /// Command line of the remote tool
    #[arg(long, env = env::MM_BATCH_COMMAND)]
    pub command: Option<String>,

    /// Notes attached to the job
    #[arg(long, env = env::MM_BATCH_NOTES)]
    pub notes: Option<String>,

    /// Environment of the remote tool
    #[arg(long)]
    pub batch_env: Option<String>,

    /// Do not send an email when the job finishes
    #[arg(long)]
    pub silent_email: bool,

    /// Do not send an email when the job fails
    #[arg(long)]
    pub silent_on_errors: bool,

    /// Input is single line delimited
    #[arg(long)]
    pub single_line: bool,

    /// Input is single line delimited with an ID
    #[arg(long)]
    pub single_line_with_id: bool,

    /// Priority of the job, only positive values are sent
    #[arg(long, allow_negative_numbers = true)]
    pub priority: Option<i32>,
}

impl JobConfigOpts {
    pub fn into_config(self) -> anyhow::Result<JobConfig> {
        let mut config = match &self.job_file {
            Some(path) => load_job_file(path)?,
            None => JobConfig::default(),
        };
        if let Some(command) = self.command {
            config.command = command;
        }
        if self.notes.is_some() {
            config.notes = self.notes;
        }
        if self.batch_env.is_some() {
            config.batch_env = self.batch_env;
        }
        config.silent_email |= self.silent_email;
        config.silent_on_errors |= self.silent_on_errors;
        config.single_line |= self.single_line;
        config.single_line_with_id |= self.single_line_with_id;
        if let Some(priority) = self.priority {
            config.priority = priority;
        }
        Ok(config)
    }
}

#[derive(Parser)]
pub struct BackendOpts {
    /// Service that runs the jobs
    #[arg(long, env = env::MM_BACKEND, default_value_t = BackendKind::Batch, value_enum)]
    pub backend: BackendKind,

    /// URL of the service. Defaults to the public endpoint of the selected backend.
    #[arg(long, env = env::MM_ENDPOINT)]
    pub endpoint: Option<String>,

    /// Format of the input document (lite backend)
    #[arg(long, default_value = "sldiwi", help_heading("LITE OPTIONS"))]
    pub docformat: String,

    /// Format of the result (lite backend)
    #[arg(long, default_value = "mmi", help_heading("LITE OPTIONS"))]
    pub resultformat: String,

    /// Comma separated list of UMLS sources to restrict to (lite backend)
    #[arg(long, default_value = "all", help_heading("LITE OPTIONS"))]
    pub sources: String,

    /// Comma separated list of UMLS semantic types to restrict to (lite backend)
    #[arg(long, default_value = "all", help_heading("LITE OPTIONS"))]
    pub semantic_types: String,

    /// Content type of the result (lite backend)
    #[arg(long, default_value = "text/plain", help_heading("LITE OPTIONS"))]
    pub accept: String,
}

impl BackendOpts {
    pub fn lite_options(&self) -> LiteOptions {
        LiteOptions {
            docformat: self.docformat.clone(),
            resultformat: self.resultformat.clone(),
            sources: split_comma_list(&self.sources),
            semantic_types: split_comma_list(&self.semantic_types),
            accept: self.accept.clone(),
        }
    }
}

/// Submits a single file and prints its result
#[derive(Parser)]
#[command(
    name = "mm-submit",
    author,
    version(crate::MM_VERSION),
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct SubmitOpts {
    #[clap(flatten)]
    pub common: CommonOpts,

    #[clap(flatten)]
    pub credentials: CredentialsOpts,

    #[clap(flatten)]
    pub job: JobConfigOpts,

    #[clap(flatten)]
    pub backend: BackendOpts,

    /// File to process
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,
}

/// Watches a directory and submits every new file as a job
#[derive(Parser)]
#[command(
    name = "mm-watch",
    author,
    version(crate::MM_VERSION),
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct WatchOpts {
    #[clap(flatten)]
    pub common: CommonOpts,

    #[clap(flatten)]
    pub credentials: CredentialsOpts,

    #[clap(flatten)]
    pub job: JobConfigOpts,

    #[clap(flatten)]
    pub backend: BackendOpts,

    /// Directory watched for new input files
    #[arg(long, env = env::JOB_INPUT_DIR, value_hint = clap::ValueHint::DirPath)]
    pub input_dir: PathBuf,

    /// Directory where results are written
    #[arg(long, env = env::JOB_OUTPUT_DIR, value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// Files ending with this suffix are not submitted
    #[arg(long, env = env::MM_TEMP_SUFFIX, default_value = DEFAULT_TEMP_SUFFIX)]
    pub temp_suffix: String,

    /// Periodically submit input files that do not have a result yet (e.g. `5m`)
    #[arg(long, env = env::MM_RESCAN_INTERVAL)]
    pub rescan_interval: Option<ArgDuration>,

    /// Submit input files that already exist when the watcher starts
    #[arg(long)]
    pub scan_existing: bool,
}
