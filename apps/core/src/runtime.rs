use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::core_service::{CoreService, ServiceError};
use crate::logging;
use crate::storage::StorageKind;
use crate::transport::handle_json;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub storage: Option<StorageKind>,
    pub logging: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions {
        logging: true,
        ..RuntimeOptions::default()
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--data-dir" => {
                let value = iter.next().ok_or("--data-dir requires a path")?;
                options.data_dir = Some(PathBuf::from(value));
            }
            "--storage" => {
                let value = iter.next().ok_or("--storage requires a value")?;
                let kind = StorageKind::parse(value)
                    .ok_or_else(|| format!("unknown storage backend: {value}"))?;
                options.storage = Some(kind);
            }
            "--no-log" => options.logging = false,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(options)
}

/// Serves line-delimited JSON requests from stdin until EOF.
pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    let mut cfg = config::load(options.config_path.as_deref())?;
    if let Some(data_dir) = options.data_dir {
        cfg.data_dir = data_dir;
    }
    if let Some(storage) = options.storage {
        cfg.storage = storage;
    }
    if !cfg.config_path.exists() {
        config::save(&cfg)?;
    }

    if options.logging {
        logging::init(&logging::logs_dir(&cfg.data_dir))?;
    }
    tracing::info!(
        config_path = %cfg.config_path.display(),
        data_dir = %cfg.data_dir.display(),
        "starting bridge"
    );

    let mut service = CoreService::new(cfg)?;
    service.mount();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_json(&mut service, &line);
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }

    service.unmount();
    tracing::info!("bridge input closed");
    Ok(())
}
