use tracing::{debug, error, info, warn};

/// Logs the start of a dialogue turn with consistent format
pub fn log_action_start(action: &str, actor: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("ACTION_START: {} by {} - {}", action, actor, d),
        None => info!("ACTION_START: {} by {}", action, actor),
    }
}

/// Logs a completed mutation with consistent format
pub fn log_action_success(action: &str, actor: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("ACTION_SUCCESS: {} by {} - {}", action, actor, d),
        None => info!("ACTION_SUCCESS: {} by {}", action, actor),
    }
}

/// Logs failed actions with consistent format
pub fn log_action_error(action: &str, actor: &str, error: &str) {
    error!("ACTION_ERROR: {} by {} - {}", action, actor, error);
}

/// Logs validation errors with consistent format
pub fn log_validation_error(action: &str, value: &str, error: &str, actor: &str) {
    warn!(
        "VALIDATION_ERROR: {} - input '{}' invalid: {} - actor {}",
        action, value, error, actor
    );
}

/// Logs authorization denials with consistent format
pub fn log_permission_denied(action: &str, actor: &str, target: &str) {
    warn!("PERMISSION_DENIED: {} by {} on {}", action, actor, target);
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("DB_ERROR: {} on {} failed: {} - {}", operation, table, error, d),
        None => error!("DB_ERROR: {} on {} failed: {}", operation, table, error),
    }
}

/// Logs timeout events with consistent format
pub fn log_timeout(operation: &str, duration_secs: u64, details: Option<&str>) {
    match details {
        Some(d) => warn!("TIMEOUT: {} after {}s - {}", operation, duration_secs, d),
        None => warn!("TIMEOUT: {} after {}s", operation, duration_secs),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
