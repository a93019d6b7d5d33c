use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use loam_cli::{ChainReport, TypeReport, Workspace};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loam", version, about = "Loam CLI (Groovy type resolution)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a fully-qualified type name and print its members
    Resolve(ResolveArgs),
    /// Print the type solver chain built from the workspace config
    Chain(ChainArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// Canonical type name, e.g. `java.util.Map.Entry`
    name: String,
    /// Workspace root (defaults to current directory)
    #[arg(long, default_value = ".")]
    path: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ChainArgs {
    /// Workspace root (defaults to current directory)
    #[arg(long, default_value = ".")]
    path: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Unsolved {
    name: String,
    solved: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Resolve(args) => {
            let ws = Workspace::open(&args.path)?;
            match ws.resolve(&args.name) {
                Some(report) => {
                    print_output(&report, args.json)?;
                    Ok(0)
                }
                None => {
                    if args.json {
                        print_output(
                            &Unsolved {
                                name: args.name.clone(),
                                solved: false,
                            },
                            true,
                        )?;
                    } else {
                        eprintln!("unresolved type: {}", args.name);
                    }
                    Ok(1)
                }
            }
        }
        Command::Chain(args) => {
            let ws = Workspace::open(&args.path)?;
            print_output(&ws.chain(), args.json)?;
            Ok(0)
        }
    }
}

fn print_output<T: Serialize + 'static>(value: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
        return Ok(());
    }

    let any = value as &dyn std::any::Any;
    if let Some(report) = any.downcast_ref::<TypeReport>() {
        println!("{} {} ({})", report.kind, report.name, report.origin);
        if !report.type_parameters.is_empty() {
            println!("  type parameters: <{}>", report.type_parameters.join(", "));
        }
        for ancestor in &report.ancestors {
            println!("  extends {ancestor}");
        }
        for field in &report.fields {
            println!("  field {field}");
        }
        for constructor in &report.constructors {
            println!("  constructor {constructor}");
        }
        for method in &report.methods {
            println!("  method {method}");
        }
    } else if let Some(report) = any.downcast_ref::<ChainReport>() {
        match &report.config {
            Some(path) => println!("config: {}", path.display()),
            None => println!("config: <defaults>"),
        }
        println!("static_compilation: {}", report.static_compilation);
        for (index, solver) in report.solvers.iter().enumerate() {
            println!("  {}. {solver}", index + 1);
        }
    } else {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
    }
    Ok(())
}
