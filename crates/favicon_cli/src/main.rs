use anyhow::{anyhow, bail, Context, Result};
use favicon_tools::convert::read_ico_directory;
use favicon_tools::{FaviconGenerator, ManifestOptions};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

mod config;

fn usage() {
    eprintln!("favicon <generate|inspect> [options] <path>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate [options] <source>   Generate the favicon set from an image or SVG");
    eprintln!("  inspect <file.ico>            Print the directory of an ICO file");
    eprintln!();
    eprintln!("Generate options:");
    eprintln!("  --config <path>               Config file (default: favicon.toml if present)");
    eprintln!("  --force                       Overwrite files in a non-empty output directory");
    eprintln!("  --name <name>                 Manifest name");
    eprintln!("  --short-name <name>           Manifest short_name");
    eprintln!("  --theme-color <color>         Manifest theme_color");
    eprintln!("  --background-color <color>    Manifest background_color");
    eprintln!();
    eprintln!("Set FAVICON_LOG (e.g. FAVICON_LOG=debug) to change log verbosity.");
}

struct GenerateArgs {
    source: PathBuf,
    config: Option<PathBuf>,
    force: bool,
    manifest: ManifestOptions,
}

fn parse_generate_args(args: &[String]) -> Result<GenerateArgs> {
    let mut source = None;
    let mut config = None;
    let mut force = false;
    let mut manifest = ManifestOptions::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--force" | "-f" => {
                force = true;
                i += 1;
            }
            "--config" | "-c" | "--name" | "--short-name" | "--theme-color"
            | "--background-color" => {
                let value = args
                    .get(i + 1)
                    .cloned()
                    .ok_or_else(|| anyhow!("{} requires a value", flag))?;
                match flag {
                    "--config" | "-c" => config = Some(PathBuf::from(value)),
                    "--name" => manifest.name = Some(value),
                    "--short-name" => manifest.short_name = Some(value),
                    "--theme-color" => manifest.theme_color = Some(value),
                    _ => manifest.background_color = Some(value),
                }
                i += 2;
            }
            _ if !flag.starts_with('-') => {
                if source.is_some() {
                    bail!("Unexpected argument: {}", flag);
                }
                source = Some(PathBuf::from(flag));
                i += 1;
            }
            _ => return Err(anyhow!("Unknown flag: {}", flag)),
        }
    }

    let source = source.ok_or_else(|| {
        anyhow!("Usage: favicon generate [--config <path>] [--force] [options] <source>")
    })?;

    Ok(GenerateArgs {
        source,
        config,
        force,
        manifest,
    })
}

/// True when `dir` exists and holds at least one entry
fn has_entries(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    let mut entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    Ok(entries.next().is_some())
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let config = config::load_config(
        args.config.as_deref(),
        Path::new(config::DEFAULT_CONFIG_FILE),
    )?;
    let output_dir = config.output_dir();

    if !args.force && has_entries(&output_dir)? {
        bail!(
            "Output directory {} is not empty; pass --force to overwrite",
            output_dir.display()
        );
    }

    debug!(source = %args.source.display(), output = %output_dir.display(), "generate");
    let generator = FaviconGenerator::new(&config)?;
    let result = generator
        .generate(&args.source, &args.manifest)
        .with_context(|| format!("Failed to generate favicons from {}", args.source.display()))?;

    println!("Generated {} files in {}", result.files.len(), output_dir.display());
    for path in result.files.iter() {
        println!("  - {}", path.display());
    }

    let fallbacks = result.report.fallback_count();
    if fallbacks > 0 {
        println!("\n{} file(s) used the baseline renderer", fallbacks);
    }

    let skipped: Vec<_> = result.report.skipped().collect();
    if !skipped.is_empty() {
        println!("\nSkipped:");
        for outcome in skipped {
            println!("  - {} ({})", outcome.path.display(), outcome.kind);
        }
    }

    Ok(())
}

fn cmd_inspect(path: &Path) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let entries = read_ico_directory(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    println!("{}: {} image(s), {} bytes", path.display(), entries.len(), data.len());
    println!("  #  size       bpp  bytes     offset");
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "  {:<2} {:<10} {:<4} {:<9} {}",
            index,
            format!("{}x{}", entry.pixel_width(), entry.pixel_height()),
            entry.bits_per_pixel,
            entry.size,
            entry.offset
        );
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("FAVICON_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        usage();
        return Ok(());
    }

    init_tracing();
    let cmd = args.remove(0);

    match cmd.as_str() {
        "generate" => cmd_generate(parse_generate_args(&args)?)?,
        "inspect" => {
            let path = args
                .first()
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("Usage: favicon inspect <file.ico>"))?;
            cmd_inspect(&path)?;
        }
        "help" | "--help" | "-h" => usage(),
        _ => {
            usage();
            bail!("Unknown command: {}", cmd);
        }
    }

    Ok(())
}
