use crate::error::Result;
use crate::error::SeedError;
use clap::crate_version;
use clap::Arg;
use clap::ArgMatches;
use clap::Command;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum::Display;
use strum::EnumString;

pub const DEFAULT_BROKERS: &str = "0.0.0.0:9092";
pub const DEFAULT_CONNECT_TIMEOUT_MS: &str = "3000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_KEY_FIELD: &str = "id";
pub const LOG_ENV: &str = "KAFSEED_LOG";
/// Range librdkafka accepts for `socket.connection.setup.timeout.ms`.
pub const CONNECT_TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 1000..=2147483647;

pub fn brokers() -> Arg<'static> {
    Arg::new("brokers")
        .short('b')
        .long("brokers")
        .help("Broker list in kafka format")
        .takes_value(true)
        .default_value(DEFAULT_BROKERS)
}
pub fn connect_timeout() -> Arg<'static> {
    Arg::new("connect-timeout")
        .long("connect-timeout")
        .help("Broker connection setup timeout in milliseconds")
        .takes_value(true)
        .default_value(DEFAULT_CONNECT_TIMEOUT_MS)
}
pub fn data_dir() -> Arg<'static> {
    Arg::new("data-dir")
        .short('d')
        .long("data-dir")
        .help("Directory holding the fixture files")
        .takes_value(true)
        .default_value(DEFAULT_DATA_DIR)
}
pub fn jobs() -> Arg<'static> {
    Arg::new("jobs")
        .short('j')
        .long("jobs")
        .help("YAML file listing producer jobs, replaces the built-in customers/products/orders jobs")
        .takes_value(true)
}
pub fn producer() -> Arg<'static> {
    Arg::new("producer")
        .short('P')
        .long("producer")
        .help("Producer backend: rdkafka | dry-run")
        .takes_value(true)
        .default_value("rdkafka")
}
pub fn dry_run() -> Arg<'static> { Arg::new("dry-run").long("dry-run").help("Print the batches without contacting a broker") }
pub fn lenient() -> Arg<'static> { Arg::new("lenient").long("lenient").help("Exit successfully even if some publishes failed") }
pub fn log() -> Arg<'static> {
    Arg::new("log")
        .long("log")
        .help("Configure the logging format: Off, Error, Warn, Info, Debug, Trace")
        .takes_value(true)
}

pub fn get_arg_matches() -> Command<'static> {
    Command::new("kafseed")
        .version(crate_version!())
        .about("seed kafka topics with json fixtures")
        .args(vec![brokers(), connect_timeout(), data_dir(), jobs(), producer(), dry_run(), lenient(), log()])
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ProducerKind {
    Rdkafka,
    DryRun,
}

/// Which fixture goes to which topic, keyed by which field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicAssignment {
    pub file:      PathBuf,
    pub topic:     String,
    pub key_field: String,
}

impl TopicAssignment {
    pub fn new(file: impl Into<PathBuf>, topic: impl Into<String>, key_field: impl Into<String>) -> Self {
        TopicAssignment {
            file:      file.into(),
            topic:     topic.into(),
            key_field: key_field.into(),
        }
    }

    pub fn defaults() -> Vec<TopicAssignment> {
        vec![
            TopicAssignment::new("customers.json", "customers", DEFAULT_KEY_FIELD),
            TopicAssignment::new("products.json", "products", DEFAULT_KEY_FIELD),
            TopicAssignment::new("orders.json", "orders", DEFAULT_KEY_FIELD),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct KafkaProducerConfig {
    pub brokers:         String,
    pub connect_timeout: Duration,
    pub message_timeout: Duration,
    pub queue_size:      usize,
}

impl Default for KafkaProducerConfig {
    fn default() -> Self {
        KafkaProducerConfig {
            brokers:         DEFAULT_BROKERS.to_owned(),
            connect_timeout: Duration::from_millis(3000),
            message_timeout: Duration::from_millis(5000),
            queue_size:      100000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub kafka:     KafkaProducerConfig,
    pub producer:  ProducerKind,
    pub data_dir:  PathBuf,
    pub jobs_file: Option<PathBuf>,
    pub lenient:   bool,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_args(args: Vec<&str>) -> Result<Self> {
        let matches = get_arg_matches().get_matches_from(args);
        let log_env = std::env::var(LOG_ENV).ok();
        Self::from_matches(&matches, log_env.as_deref())
    }

    pub fn from_matches(matches: &ArgMatches, log_env: Option<&str>) -> Result<Self> {
        let log_level = match matches.value_of("log").or(log_env) {
            Some(level) => LevelFilter::from_str(level).map_err(|_| SeedError::Config(format!("Cannot parse log level {}", level)))?,
            None => LevelFilter::Info,
        };

        let brokers = matches.value_of("brokers").unwrap_or(DEFAULT_BROKERS).to_owned();
        let timeout = matches.value_of("connect-timeout").unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);
        let connect_timeout = timeout
            .parse::<u64>()
            .ok()
            .filter(|ms| CONNECT_TIMEOUT_RANGE_MS.contains(ms))
            .map(Duration::from_millis)
            .ok_or_else(|| {
                SeedError::Config(format!(
                    "Connect timeout must be between {} and {} ms, got {}",
                    CONNECT_TIMEOUT_RANGE_MS.start(),
                    CONNECT_TIMEOUT_RANGE_MS.end(),
                    timeout
                ))
            })?;

        let producer = if matches.is_present("dry-run") {
            ProducerKind::DryRun
        } else {
            let kind = matches.value_of("producer").unwrap_or("rdkafka");
            ProducerKind::from_str(kind).map_err(|_| SeedError::Config(format!("Unknown producer {}", kind)))?
        };

        let data_dir = expand_path(matches.value_of("data-dir").unwrap_or(DEFAULT_DATA_DIR))?;
        let jobs_file = matches.value_of("jobs").map(expand_path).transpose()?;

        Ok(AppConfig {
            kafka: KafkaProducerConfig {
                brokers,
                connect_timeout,
                ..KafkaProducerConfig::default()
            },
            producer,
            data_dir,
            jobs_file,
            lenient: matches.is_present("lenient"),
            log_level,
        })
    }
}

fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).map_err(|e| SeedError::Config(format!("Cannot expand path {}: {}", path, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
