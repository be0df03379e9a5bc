use clap::Parser;
use mockable_js::config::RewriteOptions;
use mockable_js::registry::HELPER_SOURCE;
use mockable_js::rewrite::RewriteOutcome;
use mockable_js::transform;
use std::fs;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
  name = "mockable-js",
  about = "Rewrites a JavaScript module so that its imports can be mocked"
)]
struct Cli {
  /// File to rewrite; omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Path of the module, for excluded directory checks; defaults to the input path.
  #[arg(long)]
  filename: Option<PathBuf>,

  /// JSON file with rewrite options (`excludeDirs`, `excludeImportsFromModules`).
  #[arg(long)]
  config: Option<PathBuf>,

  /// Additional directory name whose modules are left alone.
  #[arg(long = "exclude-dir", value_name = "DIR")]
  exclude_dirs: Vec<String>,

  /// Additional module specifier whose imports are left alone.
  #[arg(long = "exclude-import", value_name = "MODULE")]
  exclude_imports: Vec<String>,

  /// Write the mockable bindings as JSON to this file.
  #[arg(long)]
  bindings: Option<PathBuf>,

  /// Write the runtime module that rewritten code imports `ImportMap` from to this file, then
  /// exit without rewriting anything.
  #[arg(long, value_name = "PATH")]
  write_helper: Option<PathBuf>,

  /// Log what the rewriter does to stderr.
  #[arg(short, long)]
  verbose: bool,
}

fn exit_with_error(message: impl AsRef<str>) -> ! {
  eprintln!("error: {}", message.as_ref());
  process::exit(1);
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn load_options(args: &Cli) -> RewriteOptions {
  let mut options = match args.config.as_ref() {
    Some(p) => {
      let json = fs::read_to_string(p)
        .unwrap_or_else(|err| exit_with_error(format!("failed to read {}: {err}", p.display())));
      RewriteOptions::from_json(&json)
        .unwrap_or_else(|err| exit_with_error(format!("invalid config {}: {err}", p.display())))
    }
    None => RewriteOptions::default(),
  };
  for dir in args.exclude_dirs.iter() {
    options = options.with_exclude_dir(dir.as_str());
  }
  for module in args.exclude_imports.iter() {
    options = options.with_excluded_import(module.as_str());
  }
  options
}

fn main() {
  let args = Cli::parse();
  init_tracing(args.verbose);

  if let Some(p) = args.write_helper.as_ref() {
    if let Err(err) = fs::write(p, HELPER_SOURCE) {
      exit_with_error(format!("failed to write {}: {err}", p.display()));
    };
    info!(path = %p.display(), "wrote helper module");
    return;
  };

  let options = load_options(&args);

  let input_name = args
    .input
    .as_ref()
    .map(|p| p.to_string_lossy().into_owned())
    .unwrap_or_else(|| "<stdin>".to_string());
  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input.as_ref() {
    Some(p) => match File::open(p) {
      Ok(f) => Box::new(f),
      Err(err) => exit_with_error(format!("failed to open {}: {err}", p.display())),
    },
    None => Box::new(stdin()),
  };
  if let Err(err) = input_file.read_to_end(&mut input) {
    exit_with_error(format!("failed to read {input_name}: {err}"));
  };
  let source = match std::str::from_utf8(&input) {
    Ok(source) => source,
    Err(err) => exit_with_error(format!("{input_name} is not valid UTF-8: {err}")),
  };

  let file = args.filename.as_ref().or(args.input.as_ref());
  let out = match transform(source, file.map(|p| p.as_path()), &options) {
    Ok(out) => out,
    Err(err) => exit_with_error(format!("{input_name}: {err}")),
  };
  match &out.outcome {
    RewriteOutcome::Rewritten(bindings) => info!(bindings = bindings.len(), "rewrote module"),
    other => info!(outcome = ?other, "left module unchanged"),
  };

  if let Some(p) = args.bindings.as_ref() {
    let json = match serde_json::to_string_pretty(out.outcome.bindings()) {
      Ok(json) => json,
      Err(err) => exit_with_error(format!("failed to serialize bindings: {err}")),
    };
    if let Err(err) = fs::write(p, json) {
      exit_with_error(format!("failed to write {}: {err}", p.display()));
    };
  };

  let write_result = match args.output.as_ref() {
    Some(p) => File::create(p)
      .and_then(|mut file| file.write_all(out.code.as_bytes()))
      .map_err(|err| (p.display().to_string(), err)),
    None => stdout()
      .write_all(out.code.as_bytes())
      .map_err(|err| ("<stdout>".to_string(), err)),
  };
  if let Err((dest, err)) = write_result {
    exit_with_error(format!("failed to write {dest}: {err}"));
  };
}
