use anyhow::Result;
use clap::Parser;

use aero_release::command::SystemRunner;
use aero_release::config;
use aero_release::git::Git2Repository;
use aero_release::manifest;
use aero_release::release::{self, ReleaseOptions};
use aero_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "aero-release",
    about = "Release and deploy the aero-data web app"
)]
struct Args {
    #[arg(long, help = "Run only the deploy step, skipping everything else")]
    deploy_only: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Skip the deploy step")]
    no_deploy: bool,

    #[arg(long, help = "Skip pushing the release commit and tag")]
    no_push: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("aero-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.deploy_only && args.no_deploy {
        ui::display_error("--deploy-only and --no-deploy contradict each other");
        std::process::exit(1);
    }

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize git operations
    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let runner = SystemRunner;

    let opts = ReleaseOptions {
        deploy_only: args.deploy_only,
        dry_run: args.dry_run,
        no_deploy: args.no_deploy,
        no_push: args.no_push,
    };

    // Prompt for the new version only on a full interactive release. Dry runs
    // and deploy-only runs use the suggested bump or no version at all.
    let requested = if !opts.deploy_only && !opts.dry_run {
        let current = match manifest::read_version(&config.paths.manifest) {
            Ok(version) => version,
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        };
        ui::prompt_version(&current, &current.next_patch())?
    } else {
        None
    };

    let outcome = match release::run_release(&opts, &config, &repo, &runner, requested.as_deref())
    {
        Ok(outcome) => outcome,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if opts.dry_run {
        println!("\n\x1b[32m✓\x1b[0m Dry run finished - nothing was changed\n");
    } else if let Some(tag) = &outcome.tag {
        if outcome.pushed {
            println!("\n\x1b[32m✓\x1b[0m Released {}\n", tag);
        } else {
            println!("\n\x1b[32m✓\x1b[0m Released {} (not pushed)\n", tag);
        }
    } else if outcome.deployed {
        println!("\n\x1b[32m✓\x1b[0m Deploy finished\n");
    }

    Ok(())
}
