use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use nanoutils_modularize::collect_sources;
use nanoutils_modularize::transform;
use nanoutils_modularize::transform_files;
use nanoutils_modularize::ModuleFormat;
use nanoutils_modularize::ModuleResolver;
use nanoutils_modularize::TransformOptions;
use std::env;
use std::fs;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
  name = "nanoutils-modularize",
  about = "Rewrites nanoutils imports into per-function default imports"
)]
struct Cli {
  /// File or directory to transform; omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output file, or output directory for a directory input; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Build of nanoutils that rewritten imports point at. Overrides the config file.
  #[arg(long, value_enum, value_name = "cjs|esm")]
  module_format: Option<ModuleFormatArg>,

  /// JSON options file, e.g. `{"moduleFormat": "esm"}`. The babel plugin's `{"cjs": false}` also
  /// works.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Installed nanoutils package; by default the nearest `node_modules/nanoutils` from the working
  /// directory.
  #[arg(long)]
  library: Option<PathBuf>,

  /// Worker threads for directory inputs.
  #[arg(long)]
  jobs: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModuleFormatArg {
  Cjs,
  Esm,
}

impl From<ModuleFormatArg> for ModuleFormat {
  fn from(arg: ModuleFormatArg) -> Self {
    match arg {
      ModuleFormatArg::Cjs => ModuleFormat::Cjs,
      ModuleFormatArg::Esm => ModuleFormat::Esm,
    }
  }
}

// Silent unless asked for, so stdout only ever carries code.
fn init_logging() {
  let Ok(filter) =
    EnvFilter::try_from_env("NANOUTILS_LOG").or_else(|_| EnvFilter::try_from_default_env())
  else {
    return;
  };
  fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn load_options(args: &Cli) -> Result<TransformOptions> {
  let mut options = match &args.config {
    Some(path) => {
      let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
      serde_json::from_str::<TransformOptions>(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?
    }
    None => TransformOptions::new(),
  };
  if let Some(format) = args.module_format {
    options = options.with_module_format(format.into());
  };
  Ok(options)
}

fn load_resolver(args: &Cli, options: TransformOptions) -> Result<ModuleResolver> {
  match &args.library {
    Some(root) => Ok(ModuleResolver::new(root, options)),
    None => {
      let cwd = env::current_dir().context("failed to get working directory")?;
      Ok(ModuleResolver::discover(&cwd, options)?)
    }
  }
}

fn run_single(args: &Cli, resolver: &ModuleResolver) -> Result<()> {
  let source = match &args.input {
    Some(path) => fs::read(path).with_context(|| format!("failed to read {}", path.display()))?,
    None => {
      let mut source = Vec::new();
      stdin()
        .read_to_end(&mut source)
        .context("failed to read stdin")?;
      source
    }
  };
  let name = args
    .input
    .as_ref()
    .map(|p| p.display().to_string())
    .unwrap_or_else(|| "<stdin>".to_string());
  let output = transform(resolver, &source).with_context(|| format!("failed to transform {name}"))?;
  match &args.output {
    Some(path) => fs::write(path, output)
      .with_context(|| format!("failed to write {}", path.display()))?,
    None => stdout()
      .write_all(output.as_bytes())
      .context("failed to write to stdout")?,
  };
  Ok(())
}

fn run_directory(input: &Path, args: &Cli, resolver: &ModuleResolver) -> Result<()> {
  let Some(output_dir) = &args.output else {
    bail!("--output is required when --input is a directory");
  };
  if let Some(jobs) = args.jobs {
    rayon::ThreadPoolBuilder::new()
      .num_threads(jobs)
      .build_global()
      .context("failed to start worker threads")?;
  };
  let files = collect_sources(input)?;
  debug!(count = files.len(), "transforming directory");
  let mut failed = 0;
  for outcome in transform_files(resolver, &files) {
    let code = match outcome.result {
      Ok(code) => code,
      Err(err) => {
        failed += 1;
        let err = anyhow::Error::new(err);
        eprintln!("{}: {err:#}", outcome.path.display());
        continue;
      }
    };
    let relative = outcome.path.strip_prefix(input).unwrap_or(outcome.path.as_path());
    let dest = output_dir.join(relative);
    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    };
    fs::write(&dest, code).with_context(|| format!("failed to write {}", dest.display()))?;
  }
  if failed > 0 {
    bail!("{failed} of {} files failed", files.len());
  };
  Ok(())
}

fn run(args: Cli) -> Result<()> {
  let options = load_options(&args)?;
  let resolver = load_resolver(&args, options)?;
  match &args.input {
    Some(input) if input.is_dir() => run_directory(input, &args, &resolver),
    _ => run_single(&args, &resolver),
  }
}

fn main() {
  init_logging();
  if let Err(err) = run(Cli::parse()) {
    eprintln!("error: {err:#}");
    process::exit(1);
  };
}
