use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use jblastor::classifier::collect;
use jblastor::config::{
    load_config, parse_keys, DispatchMode, LoadedConfig, RandomizeOptions, TargetConfig,
    TargetConfigBuilder, TargetOverrides,
};
use jblastor::dispatcher::dispatch;
use jblastor::reporter::{OutputFormat, Reporter, Show};
use jblastor::request::build_client;
use log::{debug, warn};

#[derive(Parser, Debug)]
#[command(
    name = "jblastor",
    version,
    about = "POST JSON files to a REST endpoint",
    after_help = "Example: jblastor --files /usr/local/myfile.json --endpoint 'http://localhost:8088/save'"
)]
struct Cli {
    /// Path to file or directory of file(s) to parse and POST
    #[arg(short, long, value_name = "PATH")]
    files: PathBuf,

    /// REST API endpoint to send requests to
    #[arg(short, long, value_name = "URL")]
    endpoint: String,

    /// API user account permitted to do POST requests
    #[arg(short = 'u', long = "apiuser", env = "JBLASTOR_APIUSER")]
    api_user: Option<String>,

    /// API password for the user account
    #[arg(
        short = 'p',
        long = "apipass",
        env = "JBLASTOR_APIPASS",
        hide_env_values = true
    )]
    api_pass: Option<String>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Timeout for each POST request (e.g. 15s, 500ms, 1m30s)
    #[arg(short, long)]
    timeout: Option<String>,

    /// Enable randomization of data in JSON files (not implemented)
    #[arg(short, long)]
    randomize: bool,

    /// Keys whose values would be randomized
    #[arg(long, value_name = "HOSTNAME", default_value = "name")]
    keys: String,

    /// Number of random POST requests per file
    #[arg(short = 'c', long = "randCount", default_value_t = 1)]
    rand_count: u32,

    /// Send files one at a time or through a bounded pool
    #[arg(short, long, value_enum)]
    mode: Option<DispatchMode>,

    /// Maximum requests in flight in concurrent mode
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Which parts of each response to print
    #[arg(long, value_enum, default_value_t = Show::All)]
    show: Show,

    /// Print only the first N bytes of each response body
    #[arg(long, value_name = "BYTES")]
    preview: Option<usize>,

    /// Config file, or directory containing jblastor.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> TargetOverrides {
        TargetOverrides {
            api_user: self.api_user.clone(),
            api_pass: self.api_pass.clone(),
            timeout: self.timeout.clone(),
            mode: self.mode,
            concurrency: self.concurrency,
            debug: self.debug,
            randomize: RandomizeOptions {
                enabled: self.randomize,
                keys: parse_keys(&self.keys),
                count: self.rand_count,
            },
        }
    }

    fn reporter(&self) -> Reporter {
        Reporter {
            format: self.format,
            show: self.show,
            preview: self.preview,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.debug);

    match dotenv {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("ignoring .env: {}", err),
    }

    let (config, config_path) = build_config(&cli)?;
    log_config(&cli, &config);

    if !cli.files.exists() {
        bail!("path '{}' does not exist", cli.files.display());
    }

    let mut files = collect(&cli.files)?;
    if let Some(config_path) = &config_path {
        drop_config_file(&mut files, config_path);
    }
    debug!("following files will be processed: {:?}", files);
    if files.is_empty() {
        warn!("no valid JSON files found in {}", cli.files.display());
    }

    let client = build_client(&config)?;
    let reporter = cli.reporter();
    let summary = dispatch(&client, &files, &config, |report| reporter.report(report)).await;

    if !files.is_empty() {
        reporter.summary(&summary);
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_config(cli: &Cli) -> Result<(TargetConfig, Option<PathBuf>)> {
    let config_target = match &cli.config {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    let loaded = load_config(&config_target).context("loading configuration")?;
    if cli.config.is_some() && loaded.is_none() {
        bail!("config file {} not found", config_target.display());
    }
    if let Some(loaded) = &loaded {
        debug!("using config {}", loaded.path.display());
    }

    let (file, path) = match loaded {
        Some(LoadedConfig { config, path }) => (Some(config), Some(path)),
        None => (None, None),
    };
    let config = TargetConfigBuilder::new(cli.endpoint.clone(), cli.overrides())
        .with_file(file)
        .build()?;
    Ok((config, path))
}

/// Keeps the loaded config file out of the payloads, it may hold credentials.
fn drop_config_file(files: &mut Vec<PathBuf>, config_path: &Path) {
    let Ok(config_path) = config_path.canonicalize() else {
        return;
    };
    files.retain(|file| {
        let same = file
            .canonicalize()
            .map_or(false, |resolved| resolved == config_path);
        if same {
            debug!("not sending config file {}", file.display());
        }
        !same
    });
}

fn log_config(cli: &Cli, config: &TargetConfig) {
    debug!("will parse file(s): {}", cli.files.display());
    debug!(
        "will POST to {} with a timeout of {:?}",
        config.endpoint, config.timeout
    );
    debug!(
        "mode: {:?}, concurrency: {}",
        config.mode, config.concurrency
    );
    debug!(
        "randomize: {}, count: {}, keys: {:?}",
        config.randomize.enabled, config.randomize.count, config.randomize.keys
    );

    if config.randomize.enabled {
        warn!(
            "randomizing keys {:?} is not supported yet; files are sent unchanged",
            config.randomize.keys
        );
    }
}
