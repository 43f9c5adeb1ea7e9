use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use incremental::cli::{self, UpdateArgs, UpdateOutcome};
use incremental::config;
use incremental::logging;
use incremental::planner::BumpFlags;
use incremental::ui;

#[derive(clap::Parser)]
#[command(
    name = "incremental-update",
    version,
    about = "Update a package's version and every reference to it"
)]
struct Args {
    #[arg(help = "Package to update")]
    package: String,

    #[arg(long, help = "Path to the package directory")]
    path: Option<PathBuf>,

    #[arg(long, value_name = "VERSION", help = "Set an explicit version, e.g. 1.2.3.rc1")]
    newversion: Option<String>,

    #[arg(long, help = "Bump the micro version")]
    patch: bool,

    #[arg(long, help = "Issue the next release candidate")]
    rc: bool,

    #[arg(long, help = "Issue the next dev release")]
    dev: bool,

    #[arg(long, help = "Start a calendar version for a new package")]
    create: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(
        long,
        help = "Print the recorded version and exit",
        conflicts_with_all = ["newversion", "patch", "rc", "dev", "create", "dry_run"]
    )]
    show: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Show debug logging")]
    verbose: bool,
}

impl Args {
    fn flags(&self) -> BumpFlags {
        BumpFlags {
            newversion: self.newversion.clone(),
            patch: self.patch,
            rc: self.rc,
            dev: self.dev,
            create: self.create,
        }
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;

    if args.show {
        let public = cli::show_version(&args.package, args.path.as_deref(), &cwd, &config)?;
        println!("{}", public);
        return Ok(());
    }

    let update = UpdateArgs {
        package: args.package.clone(),
        path: args.path.clone(),
        flags: args.flags(),
        dry_run: args.dry_run,
        cwd,
        today: chrono::Local::now().date_naive(),
    };

    let outcome = cli::run_update(&update, &config)?;
    report(&args, &outcome);
    Ok(())
}

fn report(args: &Args, outcome: &UpdateOutcome) {
    for warning in &outcome.warnings {
        ui::display_boundary_warning(warning);
    }

    let previous = outcome.previous.as_ref().map(|v| v.public());
    ui::display_version_change(previous.as_deref(), &outcome.next.public());
    println!();
    ui::display_updated_files(
        &outcome.root,
        &outcome.report.rewritten,
        outcome.report.scanned,
        args.dry_run,
    );

    match &outcome.artifact_path {
        Some(path) => ui::display_success(&format!(
            "Updated {} to {}",
            ui::format_file_list(&outcome.root, std::slice::from_ref(path)).join(""),
            outcome.next.public()
        )),
        None => ui::display_status("Dry run: no files were written"),
    }
}
