// cli submodules
mod check;

use std::path::{Path, PathBuf};

use cyclecell::log::{LogSink, Severity, TracingSink};
use cyclecell::records::RecordSource;
use cyclecell::render::Rendered;
use cyclecell::{CircularCell, RecordError};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Load delimited records into a circular cell and print its enumeration
#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Files to load
    pub files: Vec<PathBuf>,

    /// Expected header line of every file
    #[arg(long, global = true, default_value = "value")]
    pub header: String,

    /// Field of each record held by its cell
    #[arg(long, default_value_t = 0)]
    pub column: usize,

    /// Print at most this many values
    #[arg(long)]
    pub limit: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    Check(check::Args),
}

impl Cli {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }

    fn check(&self, args: &check::Args, sink: &dyn LogSink) {
        for fname in &args.files {
            match RecordSource::open(fname, &self.header) {
                Ok(source) => println!("ok: {}", display_name(source.path())),
                Err(err) => fail(&err, sink),
            }
        }
    }

    fn load(&self, fname: &Path, sink: &dyn LogSink) -> Result<(), RecordError> {
        let source = RecordSource::open(fname, &self.header)?;

        let mut cell: Option<CircularCell<Option<String>>> = None;
        for (line, record) in source.records().enumerate() {
            let Some(field) = record.field(self.column) else {
                sink.log(
                    Severity::Warning,
                    &format!(
                        "{}: record {} has no field {}, skipping",
                        display_name(fname),
                        line + 1,
                        self.column
                    ),
                );
                continue;
            };
            let value = (!field.is_empty()).then(|| field.to_string());

            match cell.as_mut() {
                None => cell = Some(CircularCell::new(value)),
                Some(cell) => {
                    if let Err(err) = cell.insert(value) {
                        sink.log(
                            Severity::Warning,
                            &format!("{}: record {}: {}", display_name(fname), line + 1, err),
                        );
                    }
                }
            }
        }

        let Some(cell) = cell else {
            sink.log(
                Severity::Warning,
                &format!("{}: no records", display_name(fname)),
            );
            return Ok(());
        };

        let limit = self.limit.unwrap_or(usize::MAX);
        for value in cell.iter_bounded(limit) {
            println!("{}", Rendered(value));
        }

        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn fail(err: &RecordError, sink: &dyn LogSink) -> ! {
    sink.log(Severity::Error, &err.to_string());
    eprintln!("error: {err}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    let fmt_layer = tracing_tree::HierarchicalLayer::default()
        .with_writer(std::io::stderr)
        .with_indent_lines(true)
        .with_targets(true)
        .with_indent_amount(2);
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let sink = TracingSink::new("cyclecell");

    match &cli.command {
        Some(command) => match command {
            Command::Check(args) => cli.check(args, &sink),
        },
        None => {
            for fname in &cli.files {
                if let Err(err) = cli.load(fname, &sink) {
                    fail(&err, &sink);
                }
            }
        }
    }
}
