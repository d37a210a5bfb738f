//! dpgen CLI - compile device-protocol descriptors to Rust
//!
//! Commands:
//! - `dpgen generate` - Load all descriptors and write the generated tree
//! - `dpgen check` - Load and compile everything, write nothing
//! - `dpgen layout FILE...` - Print the wire layout of protocol descriptors
//!
//! Logging goes to stderr; `RUST_LOG` overrides the level, `-v` raises the
//! default from `info` to `debug`.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dpgen::compiler::compile_protocol;
use dpgen::layout::render_layout;
use dpgen::{Generator, GeneratorConfig, ProtocolSpec};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dpgen")]
#[command(version, about = "Compile device-protocol descriptors to Rust", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GeneratorArgs {
    /// Path to a dpgen.toml; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding protocols/ and devices/
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the generated protocols/ and devices/ go to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Module path generated code imports the runtime from
    #[arg(long)]
    runtime_path: Option<String>,

    /// Module path of the generated protocols, as seen from the devices
    #[arg(long)]
    protocols_module: Option<String>,

    /// Do not write protocols/mod.rs and devices/mod.rs
    #[arg(long)]
    no_mod_files: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate protocol and device modules
    Generate(GeneratorArgs),

    /// Validate every descriptor without writing output
    Check(GeneratorArgs),

    /// Print request/response offsets of protocol descriptors
    Layout {
        /// Protocol descriptor files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl GeneratorArgs {
    fn into_config(self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(input) = self.input {
            config.input_dir = input;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(runtime_path) = self.runtime_path {
            config.runtime_path = runtime_path;
        }
        if let Some(protocols_module) = self.protocols_module {
            config.protocols_module = protocols_module;
        }
        if self.no_mod_files {
            config.emit_mod_files = false;
        }
        let origin = self.config.as_deref().unwrap_or(Path::new("<command line>"));
        config.validate(origin)?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn layout(files: &[PathBuf]) -> anyhow::Result<()> {
    for (i, path) in files.iter().enumerate() {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let spec = ProtocolSpec::from_yaml(path, &text)?;
        let compiled = compile_protocol(&spec)?;
        if i > 0 {
            println!();
        }
        print!("{}", render_layout(&compiled));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate(args) => {
            let generator = Generator::new(args.into_config()?);
            let (protocols, devices) = generator.load().context("invalid descriptors, nothing was written")?;
            let files = generator
                .render(&protocols, &devices)
                .context("invalid descriptors, nothing was written")?;
            let output = &generator.config().output_dir;
            generator
                .write(&files)
                .with_context(|| format!("writing generated files to {}", output.display()))?;
            info!(
                output = %output.display(),
                protocols = protocols.specs.len(),
                devices = devices.len(),
                files = files.len(),
                "generation done"
            );
            for file in &files {
                println!("{}", generator.config().output_dir.join(&file.path).display());
            }
        }
        Commands::Check(args) => {
            let generator = Generator::new(args.into_config()?);
            let (protocols, devices) = generator.load()?;
            let files = generator.render(&protocols, &devices)?;
            info!(
                protocols = protocols.specs.len(),
                devices = devices.len(),
                files = files.len(),
                "all descriptors valid"
            );
        }
        Commands::Layout { files } => layout(&files)?,
    }
    Ok(())
}
