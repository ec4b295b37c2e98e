use anyhow::{bail, Context, Result};
use autoversion::prelude::*;
use autoversion::ProjectItem;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::{path::PathBuf, process::Command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The global settings file. Defaults to `Settings.fdb` in the `autoversion` directory of the
    /// user's configuration directory.
    #[arg(long, global = true, value_name = "PATH")]
    global_settings: Option<PathBuf>,

    /// Log more. Repeat for even more (`-vv`). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// The FlashDevelop project file (`.as2proj`, `.as3proj` or `.hxproj`)
    #[arg(short, long, value_name = "FILE")]
    project: PathBuf,

    /// Treat the build as a test run rather than a production build
    #[arg(long)]
    testing: bool,

    /// The build has trace output enabled (debug configuration)
    #[arg(long)]
    trace: bool,
}

impl BuildArgs {
    fn action(&self) -> BuildAction {
        if self.testing {
            BuildAction::Testing
        } else {
            BuildAction::Building
        }
    }
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help(true))]
enum Commands {
    /// Prints the current version of a project
    Show {
        /// The FlashDevelop project file
        #[arg(short, long, value_name = "FILE")]
        project: PathBuf,
    },

    /// Runs a successful build cycle without building anything.
    ///
    /// The version is incremented exactly as if a build had started and completed.
    Bump(BuildArgs),

    /// Runs a build command, incrementing the version around it.
    ///
    /// If the command fails and the project is set to revert on error, the version from before
    /// the build is restored. Exits with the command's exit code.
    Run {
        #[command(flatten)]
        build: BuildArgs,

        /// The build command and its arguments
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },

    /// Lists the available incrementors and post-processors
    Strategies,

    /// Prints or sets the versioning style of a project
    Style {
        /// The FlashDevelop project file
        #[arg(short, long, value_name = "FILE")]
        project: PathBuf,

        /// The new style, e.g. `None.None.YearDayOfYear.Increment`
        style: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match do_work(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn do_work(cli: Cli) -> Result<i32> {
    let global_path = match cli.global_settings {
        Some(path) => path,
        None => XmlSettingsStore::default_global_path()
            .context("No configuration directory found, pass --global-settings")?,
    };
    let store = XmlSettingsStore::new(global_path);
    let strategies = Strategies::default();

    match cli.command {
        Commands::Show { project } => {
            let project = FlashDevelopProject::open(project)?;
            let global = store.load_global(&strategies)?;
            let mut settings = store.load_project(project.project_path(), &global, &strategies)?;
            settings.resolve(&global);

            let item = ProjectItem::load(&project, settings)?;
            println!("{}", item.version);
            log::info!("Version file: {}", item.version_file().display());
            Ok(0)
        }
        Commands::Bump(build) => {
            let action = build.action();
            let mut incrementor = incrementor(store, strategies, &build)?;
            println!("{}", incrementor.on_building(action)?);
            println!("{}", incrementor.on_build_complete()?);
            Ok(0)
        }
        Commands::Run { build, command } => {
            let Some((program, args)) = command.split_first() else {
                bail!("No build command given");
            };
            let action = build.action();
            let mut incrementor = incrementor(store, strategies, &build)?;
            println!("{}", incrementor.on_building(action)?);

            let status = Command::new(program)
                .args(args)
                .status()
                .with_context(|| format!("Could not run `{program}`"))?;

            if status.success() {
                println!("{}", incrementor.on_build_complete()?);
                Ok(0)
            } else {
                log::warn!("`{program}` failed with {status}");
                println!("{}", incrementor.on_build_failed()?);
                Ok(status.code().unwrap_or(1))
            }
        }
        Commands::Strategies => {
            println!("Incrementors:");
            for incrementor in strategies.incrementors.iter() {
                println!("  {:<24} {}", incrementor.name(), incrementor.description());
            }
            println!("Post-processors:");
            for processor in strategies.post_processors.iter() {
                println!("  {:<24} {}", processor.name(), processor.description());
            }
            Ok(0)
        }
        Commands::Style { project, style } => {
            let global = store.load_global(&strategies)?;
            let mut settings = store.load_project(&project, &global, &strategies)?;
            if let Some(style) = style {
                settings.increment.versioning_style = VersioningStyle::parse(&style, &strategies)?;
                store.save_project(&project, &settings)?;
                log::info!(
                    "Saved {}",
                    XmlSettingsStore::project_path(&project).display()
                );
            }
            println!("{}", settings.increment.versioning_style);
            Ok(0)
        }
    }
}

fn incrementor(
    store: XmlSettingsStore,
    strategies: Strategies,
    build: &BuildArgs,
) -> Result<BuildVersionIncrementor<FlashDevelopProject, XmlSettingsStore>> {
    let project = FlashDevelopProject::open(&build.project)?.with_trace(build.trace);
    Ok(BuildVersionIncrementor::new(
        store,
        strategies,
        Some(project),
    )?)
}
