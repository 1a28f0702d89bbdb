use std::{collections::BTreeMap, time::Duration};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use url::Url;

use super::{duration::parse_duration, loader::JblastorConfig};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DispatchMode {
    /// One request in flight, in file order
    #[default]
    Sequential,
    /// Bounded pool of in-flight requests
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomizeOptions {
    pub enabled: bool,
    pub keys: Vec<String>,
    pub count: u32,
}

impl Default for RandomizeOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            keys: vec!["name".to_string()],
            count: 1,
        }
    }
}

/// Everything a run needs to know about where and how to POST.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub endpoint: Url,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
    pub debug: bool,
    pub mode: DispatchMode,
    pub concurrency: usize,
    pub extra_headers: BTreeMap<String, String>,
    pub randomize: RandomizeOptions,
}

impl TargetConfig {
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
            mode: DispatchMode::default(),
            concurrency: DEFAULT_CONCURRENCY,
            extra_headers: BTreeMap::new(),
            randomize: RandomizeOptions::default(),
        })
    }
}

/// Command line values that may fall back to the config file.
#[derive(Debug, Default)]
pub struct TargetOverrides {
    pub api_user: Option<String>,
    pub api_pass: Option<String>,
    pub timeout: Option<String>,
    pub mode: Option<DispatchMode>,
    pub concurrency: Option<usize>,
    pub debug: bool,
    pub randomize: RandomizeOptions,
}

pub struct TargetConfigBuilder {
    endpoint: String,
    overrides: TargetOverrides,
    file: Option<JblastorConfig>,
}

impl TargetConfigBuilder {
    pub fn new(endpoint: impl Into<String>, overrides: TargetOverrides) -> Self {
        Self {
            endpoint: endpoint.into(),
            overrides,
            file: None,
        }
    }

    pub fn with_file(mut self, file: Option<JblastorConfig>) -> Self {
        self.file = file;
        self
    }

    pub fn build(self) -> Result<TargetConfig> {
        let mut config = TargetConfig::new(&self.endpoint)?;
        let file = self.file.unwrap_or_default();
        let overrides = self.overrides;

        let user = overrides.api_user.or(file.api_user);
        let password = overrides.api_pass.or(file.api_pass);
        config.credentials = resolve_credentials(user, password);

        if let Some(raw) = overrides.timeout.or(file.timeout) {
            config.timeout =
                parse_duration(&raw).with_context(|| format!("parsing timeout {raw:?}"))?;
        }

        config.mode = match (overrides.mode, file.mode) {
            (Some(mode), _) => mode,
            (None, Some(raw)) => DispatchMode::from_str(&raw, true)
                .map_err(|err| anyhow::anyhow!("invalid mode {raw:?} in config: {err}"))?,
            (None, None) => DispatchMode::default(),
        };

        let concurrency = overrides
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }
        config.concurrency = concurrency;

        config.extra_headers = file.headers.into_iter().collect();
        config.debug = overrides.debug;
        config.randomize = overrides.randomize;

        Ok(config)
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid endpoint URL {raw:?}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported endpoint scheme {other:?} in {raw}"),
    }
}

fn resolve_credentials(user: Option<String>, password: Option<String>) -> Option<Credentials> {
    let user = user.filter(|u| !u.is_empty())?;
    Some(Credentials {
        user,
        password: password.unwrap_or_default(),
    })
}
