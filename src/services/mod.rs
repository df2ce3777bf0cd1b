/// HTTP health, readiness and liveness endpoints
pub mod health;
