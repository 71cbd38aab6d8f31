//! Service-specific tests
//!
//! Each service has its own test file; the HTTP tests serve canned
//! responses from an in-process axum router.

#[cfg(test)]
mod log_store;

#[cfg(test)]
pub mod common {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    /// Serve a fixed `/spans_received` response on an ephemeral port
    pub async fn serve_canned(status: StatusCode, body: &'static str) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let app = Router::new().route("/spans_received", get(move || async move { (status, body) }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        port
    }

    /// A port nothing listens on
    pub async fn closed_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }
}
