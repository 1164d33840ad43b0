//! rootpm - package installation for root filesystem images.
//!
//! Drives a yum/rpm backend for both build phases:
//! - bootstrap: yum on the host with `--installroot`
//! - image: yum inside `chroot <root>`

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{InstallPhase, InstallRequest};
use rootpm::{create_package_manager, RuntimeConfig};

#[derive(Parser)]
#[command(name = "rootpm")]
#[command(about = "Package installation for root filesystem images")]
#[command(
    after_help = "QUICK START:\n  rootpm bootstrap --root DIR -p filesystem -p bash\n  rootpm install --root DIR -c \"Minimal Install\"\n  rootpm delete --root DIR -p kernel\n  rootpm update --root DIR"
)]
struct Cli {
    /// JSON runtime configuration (yum_args, command_env)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Package manager backend
    #[arg(long, global = true, default_value = "yum")]
    package_manager: String,

    /// Extra argument passed to every yum call (repeatable)
    #[arg(long = "yum-arg", global = true, allow_hyphen_values = true)]
    custom_args: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RootArg {
    /// Root directory of the image being built
    #[arg(long)]
    root: PathBuf,
}

#[derive(Args)]
struct InstallArgs {
    #[command(flatten)]
    root: RootArg,

    /// Package to install (repeatable)
    #[arg(short, long = "package")]
    packages: Vec<String>,

    /// Package group to install (repeatable)
    #[arg(short, long = "collection")]
    collections: Vec<String>,

    /// Only pull in hard requirements, skip weak dependencies
    #[arg(long)]
    only_required: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install into a new root from the host (no chroot)
    Bootstrap(InstallArgs),

    /// Install inside a chroot of an existing root
    Install {
        #[command(flatten)]
        install: InstallArgs,

        /// Package to keep out of the transaction (repeatable)
        #[arg(short, long = "exclude")]
        excludes: Vec<String>,
    },

    /// Remove installed packages, ignoring dependencies and scripts
    Delete {
        #[command(flatten)]
        root: RootArg,

        /// Package to remove (repeatable)
        #[arg(short, long = "package", required = true)]
        packages: Vec<String>,
    },

    /// Upgrade all packages in the root
    Update(RootArg),

    /// Check that the rpm database in the root is usable
    CheckDb(RootArg),

    /// Show the effective runtime configuration
    ShowConfig,
}

fn install_request(args: InstallArgs, excludes: Vec<String>) -> (PathBuf, InstallRequest) {
    (
        args.root.root,
        InstallRequest {
            packages: args.packages,
            collections: args.collections,
            excludes,
            only_required: args.only_required,
        },
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    if let Err(e) = rootpm::logging::init() {
        eprintln!("warning: logging unavailable: {}", e);
    }
    let config = RuntimeConfig::load(cli.config.as_deref())?;
    let pm_name = cli.package_manager;
    let custom_args = cli.custom_args;

    match cli.command {
        Commands::Bootstrap(args) => {
            let (root, request) = install_request(args, Vec::new());
            let mut pm = create_package_manager(&pm_name, root, config, custom_args)?;
            commands::cmd_install(pm.as_mut(), InstallPhase::Bootstrap, request)?;
        }

        Commands::Install { install, excludes } => {
            let (root, request) = install_request(install, excludes);
            let mut pm = create_package_manager(&pm_name, root, config, custom_args)?;
            commands::cmd_install(pm.as_mut(), InstallPhase::Image, request)?;
        }

        Commands::Delete { root, packages } => {
            let mut pm = create_package_manager(&pm_name, root.root, config, custom_args)?;
            commands::cmd_delete(pm.as_mut(), &packages)?;
        }

        Commands::Update(root) => {
            let mut pm = create_package_manager(&pm_name, root.root, config, custom_args)?;
            commands::cmd_update(pm.as_mut())?;
        }

        Commands::CheckDb(root) => {
            let pm = create_package_manager(&pm_name, root.root, config, custom_args)?;
            commands::cmd_check_db(pm.as_ref())?;
        }

        Commands::ShowConfig => {
            commands::cmd_show_config(&config);
        }
    }

    Ok(())
}
