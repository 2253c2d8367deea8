//! Logger module
//!
//! Provides logging utilities for the document service including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled error, warning, info and debug logging
//! - File-based logging support
//!
//! Submitter names, emails and phone numbers never reach a log line.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use writer::Level;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        &config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= Level::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

/// Print the startup banner.
///
/// # Arguments
///
/// * `addr` - The bound listen address
/// * `config` - Loaded configuration; optional settings are printed only when set
pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Document intake service started");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if config.http.health_enabled() {
        log_info(&format!("Health probe: {}", config.http.health_path));
    }
    log_info(&format!(
        "Database URL read per request from ${}",
        config.database.url_env
    ));
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

/// Log formatted access log entry
///
/// # Arguments
///
/// * `entry` - Request line, status and timing for one request
/// * `format` - `combined`, `common`, `json`, or a custom `$variable` pattern
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

/// Only the id and document type are logged, never the submitter's details.
pub fn log_document_stored(document_id: i64, document_type: &str) {
    log_info(&format!(
        "[Documents] Stored document #{document_id} (type: {document_type})"
    ));
}

pub fn log_documents_listed(count: usize, filtered_by_email: bool) {
    let scope = if filtered_by_email { "by email" } else { "recent" };
    log_info(&format!("[Documents] Listed {count} document(s) ({scope})"));
}

pub fn log_schema_ready() {
    log_info("[Storage] documents table is ready");
}

pub fn log_shutdown_requested(signal: &str) {
    log_info(&format!("[Signal] {signal} received, no longer accepting connections"));
}
