#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Argument parsing and command execution for the `schema-cache` binary.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use client::RegistryClient;
use codec::SerdeFormat;
use config::{Config, SerdeConfig};
use serde_json::{json, Value};
use types::{SchemaId, VersionSelector};

/// Command-line interface for schema-cache.
#[derive(Parser, Debug)]
#[command(name = "schema-cache", about = "Query a schema registry through schema-cache", version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub cmd: Commands,
    /// Config file (defaults to the user config directory when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Registry URL, overriding the config file
    #[arg(long, global = true)]
    pub url: Option<String>,
    /// Log level or filter directive, overriding the config file
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List every subject
    Subjects,
    /// List the versions registered under a subject
    Versions {
        /// Subject name
        subject: String,
    },
    /// Fetch a schema by id
    Id {
        /// Schema id
        id: SchemaId,
    },
    /// Fetch a schema by subject and version (a number or `latest`)
    Get {
        /// Subject name
        subject: String,
        /// Version number or `latest`
        version: VersionSelector,
    },
    /// Fetch the latest schema of a subject
    Latest {
        /// Subject name
        subject: String,
    },
    /// List ids of schemas referencing a subject version
    ReferencedBy {
        /// Subject name
        subject: String,
        /// Version number or `latest`
        #[arg(default_value = "latest")]
        version: VersionSelector,
    },
    /// List the schema formats the registry supports
    Types,
    /// Delete a subject and every version registered under it
    DeleteSubject {
        /// Subject name
        subject: String,
        /// Hard delete instead of the registry's soft delete
        #[arg(long)]
        permanent: bool,
    },
    /// Encode a JSON value as a framed message for a subject's schema
    Encode {
        /// Subject name
        subject: String,
        /// Value to encode, as JSON
        value: String,
        /// Version number or `latest`
        #[arg(long, default_value = "latest")]
        version: VersionSelector,
        /// Use the configured key format instead of the value format
        #[arg(long)]
        key: bool,
        /// Write the framed bytes here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Decode a framed message using the schema its header names
    Decode {
        /// Read the framed bytes from here instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Use the configured key format instead of the value format
        #[arg(long)]
        key: bool,
    },
    /// Write the effective configuration to the config path
    InitConfig,
}

/// Loads the effective configuration.
///
/// An explicit `--config` must exist unless the command is `init-config`;
/// otherwise the default path is used when it exists and built-in defaults
/// when it does not. `--url` and `--log-level` are applied last.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) if cli.cmd == Commands::InitConfig && !path.exists() => Config::default(),
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) if path.exists() => Config::from_file(&path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            _ => Config::default(),
        },
    };
    if let Some(url) = &cli.url {
        config.registry.url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Result of a command.
#[derive(Debug, PartialEq)]
pub enum Output {
    /// Printed as pretty JSON
    Json(Value),
    /// Raw framed message bytes
    Framed(Vec<u8>),
}

/// Runs one registry command.
///
/// `serde` selects the payload codec for `encode` and `decode`.
pub async fn execute(
    cmd: &Commands,
    client: &RegistryClient,
    serde: &SerdeConfig,
) -> anyhow::Result<Output> {
    let value = match cmd {
        Commands::Subjects => json!(client.list_subjects().await?),
        Commands::Versions { subject } => json!(client.list_versions(subject).await?),
        Commands::Id { id } => serde_json::to_value(&*client.get_by_id(*id).await?)?,
        Commands::Get { subject, version } => {
            serde_json::to_value(&*client.get_by_selector(subject, *version).await?)?
        }
        Commands::Latest { subject } => serde_json::to_value(&*client.get_latest(subject).await?)?,
        Commands::ReferencedBy { subject, version } => {
            json!(client.get_referenced_by(subject, *version).await?)
        }
        Commands::Types => json!(client.list_schema_types().await?),
        Commands::DeleteSubject { subject, permanent } => {
            json!(client.delete_subject(subject, *permanent).await?)
        }
        Commands::Encode { subject, value, version, key, .. } => {
            let value: Value = serde_json::from_str(value).context("parsing value as JSON")?;
            let format = payload_format(serde, *key);
            let framed = encode(client, subject, *version, &value, format).await?;
            return Ok(Output::Framed(framed));
        }
        Commands::Decode { input, key } => {
            let data = read_input(input.as_deref())?;
            decode(client, &data, payload_format(serde, *key)).await?
        }
        Commands::InitConfig => anyhow::bail!("init-config does not query the registry"),
    };
    Ok(Output::Json(value))
}

/// The configured codec for message keys or values.
pub fn payload_format(serde: &SerdeConfig, key: bool) -> SerdeFormat {
    if key {
        serde.key_format
    } else {
        serde.value_format
    }
}

/// Encodes `value` with the subject's schema and frames it with the schema id.
pub async fn encode(
    client: &RegistryClient,
    subject: &str,
    version: VersionSelector,
    value: &Value,
    format: SerdeFormat,
) -> anyhow::Result<Vec<u8>> {
    let schema = client.get_by_selector(subject, version).await?;
    let serde = codec::build(format, Some(&schema.schema))
        .with_context(|| format!("building {} codec for schema {}", format, schema.id))?;
    let payload = serde.encode(value)?;
    Ok(codec::frame(schema.id, &payload).to_vec())
}

/// Strips the frame header, resolves the schema id and decodes the payload.
pub async fn decode(
    client: &RegistryClient,
    data: &[u8],
    format: SerdeFormat,
) -> anyhow::Result<Value> {
    let (id, payload) = codec::unframe(data)?;
    let schema = client.get_by_id(id).await?;
    let serde = codec::build(format, Some(&schema.schema))
        .with_context(|| format!("building {} codec for schema {}", format, id))?;
    Ok(json!({ "schema_id": id, "subject": schema.subject, "value": serde.decode(payload)? }))
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut data = Vec::new();
            std::io::stdin().read_to_end(&mut data).context("reading stdin")?;
            Ok(data)
        }
    }
}

/// Writes `config` to `path`, creating parent directories.
pub fn init_config(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    config.save(path).with_context(|| format!("writing config to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["schema-cache", "get", "orders", "latest"]).expect("parses");
        assert_eq!(
            cli.cmd,
            Commands::Get { subject: "orders".to_string(), version: VersionSelector::Latest }
        );

        let cli = Cli::try_parse_from(["schema-cache", "referenced-by", "orders", "--url", "x"])
            .expect("parses");
        assert_eq!(
            cli.cmd,
            Commands::ReferencedBy {
                subject: "orders".to_string(),
                version: VersionSelector::Latest
            }
        );
        assert_eq!(cli.url.as_deref(), Some("x"));

        assert!(Cli::try_parse_from(["schema-cache", "get", "orders", "0"]).is_err());
        assert!(Cli::try_parse_from(["schema-cache", "id", "forty-two"]).is_err());

        let cli = Cli::try_parse_from(["schema-cache", "encode", "orders", "7", "--key"])
            .expect("parses");
        assert_eq!(
            cli.cmd,
            Commands::Encode {
                subject: "orders".to_string(),
                value: "7".to_string(),
                version: VersionSelector::Latest,
                key: true,
                output: None,
            }
        );

        let cli = Cli::try_parse_from(["schema-cache", "delete-subject", "orders", "--permanent"])
            .expect("parses");
        assert_eq!(
            cli.cmd,
            Commands::DeleteSubject { subject: "orders".to_string(), permanent: true }
        );
    }

    #[test]
    fn test_payload_format_follows_config() {
        let serde = SerdeConfig { key_format: SerdeFormat::Int, value_format: SerdeFormat::Json };
        assert_eq!(payload_format(&serde, true), SerdeFormat::Int);
        assert_eq!(payload_format(&serde, false), SerdeFormat::Json);
        assert_eq!(payload_format(&SerdeConfig::default(), false), SerdeFormat::Avro);
    }

    #[test]
    fn test_load_config_overrides() {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[registry]\nurl = \"http://file:8081\"\n").expect("write");

        let cli = Cli::try_parse_from([
            "schema-cache",
            "subjects",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--url",
            "http://flag:8081",
            "--log-level",
            "debug",
        ])
        .expect("parses");
        let config = load_config(&cli).expect("loads");
        assert_eq!(config.registry.url, "http://flag:8081");
        assert_eq!(config.logging.level, "debug");

        let cli = Cli::try_parse_from(["schema-cache", "types", "--url", ""]).expect("parses");
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_init_config_creates_directories() {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("nested").join("config.toml");

        init_config(&Config::default(), &path).expect("written");
        assert_eq!(Config::from_file(&path).expect("reload"), Config::default());
    }
}
