//! CLI parsing and command dispatch.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind};

use crate::{
    commands,
    config::Config,
    error::{Error, Result},
    paths::Layout,
};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(name = "skillsync", about = "Sync AI skills to Cursor, Claude, Codex and more")]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Enable verbose output.
    #[arg(long, global = true)]
    verbose: bool,
    /// Print the version and exit.
    #[arg(short = 'v', long)]
    version: bool,
    /// Command to execute (prints help when omitted).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Show the resolved configuration.
    Config,
    /// Fetch skills from Git into the store.
    Fetch {
        /// Fetch only this source (omit for all enabled sources).
        source: Option<String>,
    },
    /// Write the default config if none exists.
    Init,
    /// List skills in the store, grouped by source.
    #[command(alias = "ls")]
    List {
        /// Only show sources whose name contains this text.
        filter: Option<String>,
    },
    /// Copy stored skills to every enabled target.
    Push,
    /// Manage skill sources.
    Source {
        /// Source action to run.
        #[command(subcommand)]
        action: SourceAction,
    },
    /// Show source and target status.
    Status,
    /// Copy stored skills to targets (deprecated: use `push`).
    #[command(hide = true)]
    Sync,
    /// Manage push targets.
    Target {
        /// Target action to run.
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Print the version.
    Version,
}

// Actions are ordered alphabetically - maintain this order.
/// Source management actions.
#[derive(Debug, Subcommand)]
enum SourceAction {
    /// Add a source (owner/repo, or local/name for a hand-maintained source).
    Add {
        /// Source name.
        name: String,
        /// Repository URL (defaults to GitHub for owner/repo).
        url: Option<String>,
        /// Keep only this subdirectory of the repository.
        #[arg(long)]
        subdir: Option<String>,
    },
    /// List sources.
    List,
    /// Disable a source.
    Off {
        /// Source name.
        name: String,
    },
    /// Enable a source.
    On {
        /// Source name.
        name: String,
    },
    /// Remove a source.
    #[command(alias = "rm")]
    Remove {
        /// Source name.
        name: String,
    },
}

// Actions are ordered alphabetically - maintain this order.
/// Target management actions.
#[derive(Debug, Subcommand)]
enum TargetAction {
    /// Add a target (known tools need no path).
    Add {
        /// Target name.
        name: String,
        /// Skills directory (defaults to the tool's conventional location).
        path: Option<String>,
    },
    /// List targets.
    List,
    /// Disable a target.
    Off {
        /// Target name.
        name: String,
    },
    /// Enable a target.
    On {
        /// Target name.
        name: String,
    },
    /// Remove a target.
    #[command(alias = "rm")]
    Remove {
        /// Target name.
        name: String,
    },
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return parse_failure(&error),
    };
    if cli.version {
        print_version();
        return Ok(());
    }
    let Some(command) = cli.command else {
        print!("{}", Cli::command().render_help());
        return Ok(());
    };

    let layout = Layout::resolve()?;
    dispatch(command, cli.color.into_choice(), cli.verbose, &layout).await
}

/// Run one parsed command against a config home.
async fn dispatch(
    command: Command,
    color: commands::ColorChoice,
    verbose: bool,
    layout: &Layout,
) -> Result<()> {
    // Match arms are ordered alphabetically - maintain this order.
    match command {
        Command::Config => {
            let config = Config::load(layout)?;
            commands::config::run(color, layout, &config).await
        }
        Command::Fetch { source } => {
            let config = Config::load(layout)?;
            commands::fetch::run(color, verbose, &config, source.as_deref()).await
        }
        Command::Init => commands::init::run(color, layout).await,
        Command::List { filter } => {
            let config = Config::load(layout)?;
            commands::list::run(color, verbose, &config, filter.as_deref()).await
        }
        Command::Push => {
            let config = Config::load(layout)?;
            commands::push::run(color, verbose, &config, false).await
        }
        Command::Source { action } => {
            let mut config = Config::load(layout)?;
            run_source(color, layout, &mut config, action).await
        }
        Command::Status => {
            let config = Config::load(layout)?;
            commands::status::run(color, verbose, &config).await
        }
        Command::Sync => {
            let config = Config::load(layout)?;
            commands::push::run(color, verbose, &config, true).await
        }
        Command::Target { action } => {
            let mut config = Config::load(layout)?;
            run_target(color, layout, &mut config, action).await
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Dispatch a source action.
async fn run_source(
    color: commands::ColorChoice,
    layout: &Layout,
    config: &mut Config,
    action: SourceAction,
) -> Result<()> {
    match action {
        SourceAction::Add { name, url, subdir } => {
            commands::source::add(layout, config, &name, url.as_deref(), subdir.as_deref()).await
        }
        SourceAction::List => commands::source::list(color, config).await,
        SourceAction::Off { name } => commands::source::set_enabled(layout, config, &name, false).await,
        SourceAction::On { name } => commands::source::set_enabled(layout, config, &name, true).await,
        SourceAction::Remove { name } => commands::source::remove(layout, config, &name).await,
    }
}

/// Dispatch a target action.
async fn run_target(
    color: commands::ColorChoice,
    layout: &Layout,
    config: &mut Config,
    action: TargetAction,
) -> Result<()> {
    match action {
        TargetAction::Add { name, path } => commands::target::add(layout, config, &name, path.as_deref()).await,
        TargetAction::List => commands::target::list(color, config).await,
        TargetAction::Off { name } => commands::target::set_enabled(layout, config, &name, false).await,
        TargetAction::On { name } => commands::target::set_enabled(layout, config, &name, true).await,
        TargetAction::Remove { name } => commands::target::remove(layout, config, &name).await,
    }
}

/// Print help and version output, or turn other parse errors into usage errors.
fn parse_failure(error: &clap::Error) -> Result<()> {
    match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            print!("{}", error.render());
            Ok(())
        }
        _ => Err(Error::Usage {
            message: error.render().to_string(),
        }),
    }
}

/// Print the package version.
fn print_version() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}
