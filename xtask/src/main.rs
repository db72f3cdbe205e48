use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install jdfix binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run jdfix with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(
                    clap::Arg::new("args")
                        .help("Arguments to pass to jdfix")
                        .action(clap::ArgAction::Append)
                        .num_args(0..),
                ),
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for jdfix-core"))
                .subcommand(Command::new("bin").about("Run tests for jdfix-bin")),
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", args)) => handle_install_command(args),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn handle_install_command(_args: &ArgMatches) -> Result<()> {
    println!("Installing jdfix...");
    let status = process::Command::new("cargo")
        .args(["install", "--path", "crates/jdfix-bin"])
        .status()?;

    if status.success() {
        println!("✓ jdfix installed successfully");
    } else {
        anyhow::bail!("Failed to install jdfix");
    }

    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    println!("Building and running jdfix...");

    let run_args: Vec<String> = args
        .get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let mut command = process::Command::new("cargo");
    command.args(["run", "--bin", "jdfix", "--"]);

    if !run_args.is_empty() {
        command.args(&run_args);
    }

    let status = command.status()?;

    if !status.success() {
        anyhow::bail!("Failed to run jdfix");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => test_package("jdfix-core"),
        Some(("bin", _args)) => test_package("jdfix-bin"),
        _ => {
            println!("Available test commands:");
            println!("  all   - Run all tests for the entire project");
            println!("  core  - Run tests for jdfix-core");
            println!("  bin   - Run tests for jdfix-bin");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    println!("Running all tests for the jdfix project...");
    let status = process::Command::new("cargo")
        .args(["test", "--workspace"])
        .status()?;

    if !status.success() {
        anyhow::bail!("Test suite failed");
    }
    println!("✓ All tests passed");
    Ok(())
}

fn test_package(package: &str) -> Result<()> {
    println!("Running {package} tests...");
    let status = process::Command::new("cargo")
        .args(["test", "--package", package])
        .status()?;

    if !status.success() {
        anyhow::bail!("{package} tests failed");
    }
    Ok(())
}
