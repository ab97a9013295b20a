//! # Chat Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//!
//! ## Overview
//!
//! Resolves the effective server settings. Precedence, highest first:
//!
//! 1. Command-line flags (`--host`, `--port`, `--no-cors`, global `--data`)
//! 2. The `[server]` / `[dataset]` sections of the merged `evtype` configuration
//! 3. Built-in defaults (`127.0.0.1:8501`, CORS on)
//!
//! Flags are `Option`s so "not given" is distinguishable from "given the default value".
//!
use crate::core::config::Config;
use crate::core::error::{EvError, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
pub struct SrvArgs {
    /// Port to listen on. The next free port is used if it is taken.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Interface to bind, e.g. `0.0.0.0` to accept connections from the network.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Disable permissive CORS headers.
    #[arg(long)]
    pub no_cors: bool,
}

/// Effective settings for one server run.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
    pub title: String,
    pub dataset_path: PathBuf,
}

impl ServerConfig {
    pub fn resolve(args: &SrvArgs, cfg: &Config, data: Option<&Path>) -> Result<Self> {
        let host = match args.host {
            Some(host) => host,
            None => cfg.server.host.parse().map_err(|_| {
                EvError::Config(format!("Invalid server host '{}'.", cfg.server.host))
            })?,
        };

        let resolved = Self {
            host,
            port: args.port.unwrap_or(cfg.server.port),
            enable_cors: cfg.server.enable_cors && !args.no_cors,
            title: cfg.server.title.clone(),
            dataset_path: cfg.dataset_path(data),
        };
        debug!("Resolved server config: {:?}", resolved);
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn no_flags() -> SrvArgs {
        SrvArgs {
            port: None,
            host: None,
            no_cors: false,
        }
    }

    #[test]
    fn test_defaults_come_from_config() -> Result<()> {
        let resolved = ServerConfig::resolve(&no_flags(), &Config::default(), None)?;
        assert_eq!(resolved.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(resolved.port, 8501);
        assert!(resolved.enable_cors);
        assert_eq!(
            resolved.dataset_path,
            PathBuf::from("Electric_Vehicle_Population_Data.csv")
        );
        Ok(())
    }

    #[test]
    fn test_flags_override_config() -> Result<()> {
        let args = SrvArgs {
            port: Some(9000),
            host: Some("0.0.0.0".parse()?),
            no_cors: true,
        };
        let resolved =
            ServerConfig::resolve(&args, &Config::default(), Some(Path::new("/tmp/ev.csv")))?;
        assert_eq!(resolved.port, 9000);
        assert_eq!(resolved.host, "0.0.0.0".parse::<IpAddr>()?);
        assert!(!resolved.enable_cors);
        assert_eq!(resolved.dataset_path, PathBuf::from("/tmp/ev.csv"));
        Ok(())
    }

    #[test]
    fn test_cors_disabled_in_config_stays_disabled() -> Result<()> {
        let mut cfg = Config::default();
        cfg.server.enable_cors = false;
        let resolved = ServerConfig::resolve(&no_flags(), &cfg, None)?;
        assert!(!resolved.enable_cors);
        Ok(())
    }

    #[test]
    fn test_invalid_host_in_config() {
        let mut cfg = Config::default();
        cfg.server.host = "not-an-ip".to_string();
        let err = ServerConfig::resolve(&no_flags(), &cfg, None).unwrap_err();
        assert!(err.to_string().contains("not-an-ip"));
    }
}
