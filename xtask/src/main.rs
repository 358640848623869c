use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

const WASM_TARGET: &str = "wasm32-unknown-unknown";

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for sceneforge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Build the browser bindings for wasm32
    Wasm {
        /// Build without optimizations
        #[arg(long)]
        dev: bool,
    },
    /// Run the headless editing scenario with both backends
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo("cargo build", &["build", "--workspace"])?,
        Commands::Wasm { dev } => run_wasm(dev)?,
        Commands::Demo => {
            for backend in ["ortho", "perspective"] {
                cargo(
                    &format!("sceneforge-cli demo ({backend})"),
                    &["run", "-p", "sceneforge-cli", "--", "demo", "--backend", backend],
                )?;
            }
        }
    }

    Ok(())
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("cargo fmt --check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "cargo clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )
}

fn run_tests() -> Result<()> {
    cargo("cargo test", &["test", "--workspace"])
}

fn run_doc() -> Result<()> {
    cargo("cargo doc", &["doc", "--workspace", "--no-deps"])
}

fn run_wasm(dev: bool) -> Result<()> {
    let mut args = vec!["build", "-p", "sceneforge-web", "--target", WASM_TARGET];
    if !dev {
        args.push("--release");
    }
    cargo("cargo build (wasm)", &args)
}
