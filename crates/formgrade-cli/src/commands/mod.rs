pub mod grade;
pub mod import;
pub mod init;
pub mod stats;
pub mod validate;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
