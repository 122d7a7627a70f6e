macro_rules! create_mm_env {
    ($name: literal) => {
        concat!("MM_", $name)
    };
}

/// Credentials of the scheduler account. The names are shared with the other
/// UMLS tooling, so they do not carry the `MM_` prefix.
pub const UMLS_USERNAME: &str = "UMLS_USERNAME";
pub const UMLS_PASSWORD: &str = "UMLS_PASSWORD";
pub const UMLS_EMAIL: &str = "UMLS_EMAIL";

/// Folder watcher directories
pub const JOB_INPUT_DIR: &str = "JOB_INPUT_DIR";
pub const JOB_OUTPUT_DIR: &str = "JOB_OUTPUT_DIR";

/// Known environment variables
pub const MM_DEBUG: &str = create_mm_env!("DEBUG");
pub const MM_BACKEND: &str = create_mm_env!("BACKEND");
pub const MM_ENDPOINT: &str = create_mm_env!("ENDPOINT");
pub const MM_BATCH_COMMAND: &str = create_mm_env!("BATCH_COMMAND");
pub const MM_BATCH_NOTES: &str = create_mm_env!("BATCH_NOTES");
pub const MM_JOB_FILE: &str = create_mm_env!("JOB_FILE");
pub const MM_TEMP_SUFFIX: &str = create_mm_env!("TEMP_SUFFIX");
pub const MM_RESCAN_INTERVAL: &str = create_mm_env!("RESCAN_INTERVAL");
