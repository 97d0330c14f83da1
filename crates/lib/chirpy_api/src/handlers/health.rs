//! Readiness probe.

/// `GET /api/healthz` — always `OK` once the server is accepting requests.
pub async fn readiness() -> &'static str {
    "OK"
}
