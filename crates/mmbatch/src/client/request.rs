use std::fmt;
use std::path::{Path, PathBuf};

/// Field names understood by the remote scheduler. They are passed through verbatim.
pub const FIELD_EMAIL: &str = "Email_Address";
pub const FIELD_COMMAND: &str = "Batch_Command";
pub const FIELD_NOTES: &str = "BatchNotes";
pub const FIELD_ENV: &str = "Batch_Env";
pub const FIELD_SILENT_EMAIL: &str = "SilentEmail";
pub const FIELD_SILENT_ON_ERRORS: &str = "ESilent";
pub const FIELD_SINGLE_LINE: &str = "SingLine";
pub const FIELD_SINGLE_LINE_WITH_ID: &str = "SingLinePMID";
pub const FIELD_PRIORITY: &str = "RPriority";
pub const FIELD_UPLOAD_FILE: &str = "UpLoad_File";

/// `-E` is required by all of the scheduler's tools, so it is always part of the default.
pub const DEFAULT_BATCH_COMMAND: &str = "metamap -V USAbase -N -E -A+";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    /// Contents of the file are uploaded by the submitter.
    File(PathBuf),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::File(path) => write!(f, "@{}", path.display()),
        }
    }
}

/// A single batch submission. Fields keep their insertion order; setting an existing field
/// replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobRequest {
    fields: Vec<(String, FieldValue)>,
}

impl JobRequest {
    pub fn set_field<V: Into<FieldValue>>(&mut self, name: &str, value: V) {
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn set_file_field(&mut self, name: &str, path: &Path) {
        self.set_field(name, FieldValue::File(path.to_path_buf()));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Path of the uploaded input file.
    pub fn input_file(&self) -> Option<&Path> {
        match self.get(FIELD_UPLOAD_FILE) {
            Some(FieldValue::File(path)) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for JobRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.fields() {
            writeln!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .field("email", &self.email)
            .finish()
    }
}

/// Fixed part of every job submitted by one program run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobConfig {
    pub command: String,
    pub notes: Option<String>,
    pub silent_email: bool,
    pub silent_on_errors: bool,
    pub single_line: bool,
    pub single_line_with_id: bool,
    /// Only positive values are sent to the scheduler.
    pub priority: i32,
    pub batch_env: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_BATCH_COMMAND.to_string(),
            notes: None,
            silent_email: false,
            silent_on_errors: false,
            single_line: false,
            single_line_with_id: false,
            priority: -1,
            batch_env: None,
        }
    }
}

pub struct RequestBuilder {
    credentials: Credentials,
    config: JobConfig,
}

impl RequestBuilder {
    pub fn new(credentials: Credentials, config: JobConfig) -> Self {
        Self {
            credentials,
            config,
        }
    }

    pub fn build(&self, input: &Path) -> JobRequest {
        let config = &self.config;
        let mut request = JobRequest::default();
        request.set_field(FIELD_EMAIL, self.credentials.email.as_str());
        request.set_field(FIELD_COMMAND, config.command.as_str());
        if let Some(notes) = &config.notes {
            request.set_field(FIELD_NOTES, notes.as_str());
        }
        if let Some(env) = &config.batch_env {
            request.set_field(FIELD_ENV, env.as_str());
        }
        request.set_field(FIELD_SILENT_EMAIL, config.silent_email);
        if config.silent_on_errors {
            request.set_field(FIELD_SILENT_ON_ERRORS, true);
        }
        if config.single_line {
            request.set_field(FIELD_SINGLE_LINE, true);
        }
        if config.single_line_with_id {
            request.set_field(FIELD_SINGLE_LINE_WITH_ID, true);
        }
        if config.priority > 0 {
            request.set_field(FIELD_PRIORITY, config.priority.to_string());
        }
        request.set_file_field(FIELD_UPLOAD_FILE, input);
        request
    }
}
