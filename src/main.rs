//! Symflow CLI - resolution queries against a real project tree

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use symflow::config;
use symflow::project;
use symflow::resolve::resolver::{FsOracle, DECLARATION_EXTENSIONS, SOURCE_EXTENSIONS};
use symflow::{ImportPath, ModuleInfo, ModulePath, Resolver};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "symflow")]
#[command(version = "0.0.1")]
#[command(about = "Abstract interpretation core for cross-language static analysis")]
#[command(long_about = r#"
Symflow resolves module imports the way its analysis core does, against the
real filesystem, so you can see exactly which file an import attributes
symbols to - and the full candidate trail when it cannot.

Example usage:
  symflow resolve --path . --from src/a.ts --import ./b
  symflow resolve --path . --from src/a.ts --import lodash --source
  symflow packages --path .
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an import specifier from a module in a project tree
    Resolve {
        /// Project root to discover package descriptors under
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// The importing module's path
        #[arg(short, long)]
        from: PathBuf,

        /// The import specifier as written (without quotes)
        #[arg(short, long)]
        import: String,

        /// Search the plain-source extension set (dynamic require semantics)
        #[arg(short, long)]
        source: bool,

        /// Path to a symflow.toml config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the package descriptors discovered under a project tree
    Packages {
        /// Project root to walk
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Resolve {
            path,
            from,
            import,
            source,
            config,
        } => {
            let config = config::load_config(config.as_deref())?.unwrap_or_default();
            let packages = project::discover_packages(&path)?;
            let mut resolver = Resolver::new(FsOracle, packages);
            if let Some(ecosystem) = config.ecosystem {
                resolver = resolver.with_ecosystem(ecosystem);
            }

            let import = ImportPath::new(import);
            let current = ModuleInfo {
                path: ModulePath::new(&from),
            };
            let extensions = if source {
                SOURCE_EXTENSIONS
            } else {
                DECLARATION_EXTENSIONS
            };

            match resolver.resolve(&import, &current, extensions) {
                Ok(found) => {
                    println!("{} {}", "✓".green(), found);
                }
                Err(failure) => {
                    eprintln!("{} {}", "✗".red(), failure);
                    for candidate in &failure.candidates {
                        eprintln!("  tried {}", candidate.display().dimmed());
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Packages { path } => {
            let packages = project::discover_packages(&path)?;
            if packages.is_empty() {
                println!("no package descriptors found under {}", path.display());
            } else {
                for (descriptor, entry) in packages.iter() {
                    println!(
                        "{} {} {}",
                        descriptor.display(),
                        "→".dimmed(),
                        entry.display()
                    );
                }
            }
        }
    }

    Ok(())
}
