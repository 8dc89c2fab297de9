use std::path::PathBuf;

use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Workspace task runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full CI suite: format check, clippy, tests.
    Ci,
    /// Format the whole workspace.
    Fmt,
}

fn main() -> xshell::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    let _dir = sh.push_dir(workspace_root());

    match cli.command {
        Commands::Ci => {
            cmd!(sh, "cargo fmt --all -- --check").run()?;
            cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Commands::Fmt => {
            cmd!(sh, "cargo fmt --all").run()?;
        }
    }

    Ok(())
}

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("xtask should live in a workspace subdirectory")
        .to_path_buf()
}
