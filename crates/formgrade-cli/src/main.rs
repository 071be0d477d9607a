//! formgrade CLI — grade quiz form submissions from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "formgrade", version, about = "Quiz form answer grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one submission or a directory of submissions
    Grade {
        /// Form definition (.json or .toml)
        #[arg(long)]
        form: PathBuf,

        /// Submission .json file or directory
        #[arg(long)]
        submission: PathBuf,

        /// Directory to write response records to (default: configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print results without saving response records
        #[arg(long, conflicts_with = "output")]
        no_save: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Reject items filed under categories the question does not define
        #[arg(long)]
        strict_categories: bool,

        /// Max submissions graded concurrently
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a form definition
    Validate {
        /// Form definition (.json or .toml)
        #[arg(long)]
        form: PathBuf,
    },

    /// Summarize graded responses to a form
    Stats {
        /// Form definition (.json or .toml)
        #[arg(long)]
        form: PathBuf,

        /// Directory of response records (default: configured output_dir)
        #[arg(long)]
        responses: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert a form saved by the authoring UI into a gradable form
    Import {
        /// Authoring form document (.json)
        #[arg(long)]
        authoring: PathBuf,

        /// Where to write the converted form
        #[arg(long)]
        output: PathBuf,
    },

    /// Create starter config and an example form
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("formgrade=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            form,
            submission,
            output,
            no_save,
            format,
            strict_categories,
            parallelism,
            config,
        } => {
            commands::grade::execute(
                form,
                submission,
                output,
                no_save,
                format,
                strict_categories,
                parallelism,
                config,
            )
            .await
        }
        Commands::Validate { form } => commands::validate::execute(form),
        Commands::Stats {
            form,
            responses,
            format,
            config,
        } => commands::stats::execute(form, responses, format, config),
        Commands::Import { authoring, output } => commands::import::execute(authoring, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
