use std::env;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use log::{info, warn};

use crate::model::MAX_MARGIN;
use crate::optimizer::EstimatorConfig;

/// Loads `.env` into the process environment.
///
/// Called before the logger exists so that `RUST_LOG` from `.env` takes effect;
/// the caller logs a returned error once logging is up. A missing file is not an error.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    ignore_missing_dotenv(dotenvy::dotenv().map(|_| ()))
}

fn ignore_missing_dotenv(result: Result<(), dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Err(dotenvy::Error::Io(ref err)) if err.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub estimator: EstimatorSettings,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            estimator: EstimatorSettings::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "PALLET_FIT_API_HOST";
    const PORT_VAR: &'static str = "PALLET_FIT_API_PORT";

    fn from_env() -> Self {
        let host_value =
            env_string(Self::HOST_VAR).unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = parse_host(&host_value);
        let port = parse_port(env_string(Self::PORT_VAR).as_deref());

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    /// Checks whether the hostname matches the default value.
    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

fn parse_host(host_value: &str) -> (IpAddr, String) {
    match host_value.parse::<IpAddr>() {
        Ok(ip) => (ip, host_value.to_string()),
        Err(err) => {
            warn!(
                "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                ApiConfig::HOST_VAR,
                host_value,
                err,
                ApiConfig::DEFAULT_HOST
            );
            (
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                ApiConfig::DEFAULT_HOST.to_string(),
            )
        }
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw else {
        return ApiConfig::DEFAULT_PORT;
    };
    match raw.parse::<u16>() {
        Ok(value) if value != 0 => value,
        Ok(_) => {
            warn!(
                "⚠️ {} must not be 0. Using {}.",
                ApiConfig::PORT_VAR,
                ApiConfig::DEFAULT_PORT
            );
            ApiConfig::DEFAULT_PORT
        }
        Err(err) => {
            warn!(
                "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                ApiConfig::PORT_VAR,
                raw,
                err,
                ApiConfig::DEFAULT_PORT
            );
            ApiConfig::DEFAULT_PORT
        }
    }
}

/// Default estimation options.
#[derive(Clone, Debug)]
pub struct EstimatorSettings {
    estimator: EstimatorConfig,
}

impl EstimatorSettings {
    const ALLOW_ROTATION_VAR: &'static str = "PALLET_FIT_ALLOW_ROTATIONS";
    const MARGIN_VAR: &'static str = "PALLET_FIT_DEFAULT_MARGIN";

    fn from_env() -> Self {
        let allow_rotation = env_string(Self::ALLOW_ROTATION_VAR)
            .and_then(|raw| parse_bool(&raw, Self::ALLOW_ROTATION_VAR))
            .unwrap_or(EstimatorConfig::DEFAULT_ALLOW_ROTATION);

        let default_margin = load_f64_with_warning(
            Self::MARGIN_VAR,
            EstimatorConfig::DEFAULT_MARGIN,
            |value| (0.0..=MAX_MARGIN).contains(&value),
            "must be between 0 and 20",
            "Note: Adjusted default margin changes every estimate without an explicit margin",
        );

        let estimator = EstimatorConfig::builder()
            .allow_rotation(allow_rotation)
            .default_margin(default_margin)
            .build();

        Self { estimator }
    }

    /// Returns the configured EstimatorConfig.
    pub fn estimator_config(&self) -> EstimatorConfig {
        self.estimator
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            warn!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    note: &str,
) -> f64 {
    match env_string(var_name) {
        Some(raw) => {
            parse_f64_with_warning(&raw, var_name, default, validator, invalid_hint, note)
        }
        None => default,
    }
}

fn parse_f64_with_warning(
    raw: &str,
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    note: &str,
) -> f64 {
    match raw.parse::<f64>() {
        Ok(value) if !validator(value) => {
            warn!(
                "⚠️ {} contains invalid value '{}': {}. Using {}.",
                var_name, raw, invalid_hint, default
            );
            default
        }
        Ok(value) => {
            let tolerance = (default.abs().max(1.0)) * 1e-9;
            if (value - default).abs() > tolerance {
                info!("ℹ️ {} ({} = {}).", note, var_name, value);
            }
            value
        }
        Err(err) => {
            warn!(
                "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                var_name, raw, err, default
            );
            default
        }
    }
}
