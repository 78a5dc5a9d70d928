//! HTTP route handlers for the prediction server.

pub mod features;
pub mod predict;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(health().await, "OK");
    }
}
