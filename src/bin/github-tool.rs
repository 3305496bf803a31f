extern crate chrono;
extern crate env_logger;
extern crate failure;
extern crate github_tool;
#[macro_use]
extern crate log;
#[macro_use]
extern crate structopt;

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use chrono::Local;
use env_logger::Builder;
use failure::{Error, ResultExt};
use github_tool::errors::{self, ToolError};
use github_tool::{Config, Driver, GetRequest};
use log::LevelFilter;
use structopt::clap::ErrorKind;
use structopt::StructOpt;

fn main() {
    let args = match Args::from_iter_safe(env::args_os()) {
        Ok(args) => args,
        Err(ref e) if e.kind == ErrorKind::HelpDisplayed || e.kind == ErrorKind::VersionDisplayed => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{}", e.message);
            process::exit(errors::EXIT_USAGE);
        }
    };

    if args.example_config {
        generate_example();
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);

        for cause in e.iter_chain().skip(1) {
            eprintln!("\tCaused By: {}", cause);
        }

        process::exit(errors::exit_code_for(&e));
    }
}

fn generate_example() {
    let example = Config::example();

    println!("{}", example.as_json());
}

fn run(args: &Args) -> Result<(), Error> {
    initialize_logging(args)?;

    let request = match args.cmd {
        Some(Command::Get(ref get)) => get.request(),
        None => {
            return Err(ToolError::Usage(String::from(
                "No command given (try `github-tool get <owner> <repo>`)",
            )).into())
        }
    };

    let cfg = Config::load(args.config_file.as_ref().map(|p| p.as_path()))
        .context("Couldn't load the config")?;

    if log_enabled!(log::Level::Debug) {
        for line in format!("{:#?}", cfg).lines() {
            debug!("{}", line);
        }
    }

    let mut driver = Driver::with_config(cfg)?;
    let path = driver.get(&request)?;

    println!("Saved {}", path.display());

    Ok(())
}

#[derive(Debug, Clone, PartialEq, StructOpt)]
#[structopt(about = "Download source archives of GitHub repositories.")]
struct Args {
    #[structopt(short = "c", long = "config", parse(from_os_str),
                help = "An extra config file to apply after the default locations.")]
    config_file: Option<PathBuf>,
    #[structopt(short = "v", long = "verbose", parse(from_occurrences),
                help = "Verbose output (repeat for more verbosity)")]
    verbosity: u64,
    #[structopt(long = "example-config",
                help = "Generate an example config and immediately exit.")]
    example_config: bool,
    #[structopt(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, StructOpt)]
enum Command {
    #[structopt(name = "get", about = "Save an archive of a repository.")]
    Get(Get),
}

#[derive(Debug, Clone, PartialEq, StructOpt)]
struct Get {
    #[structopt(help = "The owner of the repository.")]
    owner: String,
    #[structopt(help = "The repository's name.")]
    repo: String,
    #[structopt(long = "archive-type", help = "One of \"tarball\" or \"zipball\".")]
    archive_type: Option<String>,
    #[structopt(long = "save-dir", parse(from_os_str),
                help = "The directory to save the archive in.")]
    save_dir: Option<PathBuf>,
    #[structopt(long = "filename", help = "The name to give the saved archive.")]
    filename: Option<String>,
    #[structopt(long = "ref", help = "The git ref to save (defaults to the default branch).")]
    reference: Option<String>,
}

impl Get {
    fn request(&self) -> GetRequest {
        GetRequest {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            archive_type: self.archive_type.clone(),
            save_dir: self.save_dir.clone(),
            filename: self.filename.clone(),
            reference: self.reference.clone(),
        }
    }
}

fn initialize_logging(args: &Args) -> Result<(), Error> {
    let mut builder = Builder::new();

    let level = match args.verbosity {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };

    if let Some(lvl) = level {
        builder.filter(Some("github_tool"), lvl);
    }

    if let Ok(filter) = env::var("RUST_LOG") {
        builder.parse(&filter);
    }

    builder.format(|out, record| match record.line() {
        Some(line) => writeln!(
            out,
            "{} [{:5}] ({}#{}): {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            line,
            record.args()
        ),
        None => writeln!(
            out,
            "{} [{:5}] ({}): {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        ),
    });

    builder.try_init()?;

    Ok(())
}
