//! Configuration validation module
//!
//! This module provides validation functions for service configuration
//! to ensure all required settings are properly configured.

use super::{DatabaseBackend, Settings, TicketingMode};
use crate::utils::errors::{CampBarError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_ticketing_config(&settings.ticketing)?;
    validate_sos_config(&settings.sos)?;
    validate_messaging_config(&settings.messaging)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(CampBarError::Config("Server host is required".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.backend == DatabaseBackend::Memory {
        return Ok(());
    }

    if config.url.is_empty() {
        return Err(CampBarError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(CampBarError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CampBarError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 16 {
        return Err(CampBarError::Config(
            "JWT secret is required and must be at least 16 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate ticketing collaborator configuration
fn validate_ticketing_config(config: &super::TicketingConfig) -> Result<()> {
    if config.mode == TicketingMode::Local {
        return Ok(());
    }

    let api_url = config.api_url.as_deref().unwrap_or_default();
    if api_url.is_empty() {
        return Err(CampBarError::Config(
            "Ticketing API URL is required in http mode".to_string(),
        ));
    }

    let parsed = url::Url::parse(api_url)
        .map_err(|e| CampBarError::Config(format!("Invalid ticketing API URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CampBarError::Config(
            "Ticketing API URL must use http or https".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(CampBarError::Config(
            "Ticketing timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_sos_config(config: &super::SosConfig) -> Result<()> {
    if config.poll_interval_seconds == 0 || config.poll_interval_seconds > 60 {
        return Err(CampBarError::Config(
            "SOS poll interval must be between 1 and 60 seconds".to_string(),
        ));
    }

    Ok(())
}

fn validate_messaging_config(config: &super::MessagingConfig) -> Result<()> {
    if config.max_message_length == 0 {
        return Err(CampBarError::Config(
            "Max message length must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampBarError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampBarError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    if config.directory.is_empty() {
        return Err(CampBarError::Config("Log directory is required".to_string()));
    }

    Ok(())
}
