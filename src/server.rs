use crate::account::controller::AccountController;
use crate::constants::{
    ACCEPT_BACKOFF_MAX, ACCEPT_BACKOFF_MIN, ACCOUNTS_PATH, BAD_REQUEST, NOT_FOUND, READ_TIMEOUT,
    REQUEST_TIMEOUT,
};
use crate::req::Method::{DELETE, GET, POST, PUT};
use crate::req::Request;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot::Receiver;
use tracing::{debug, error, info, warn};

const ROUTE_NOT_FOUND: &str = r#"{"error":"404 Not Found"}"#;

pub struct Server {
    controller: Arc<AccountController>,
    bind_addr: String,
}

impl Server {
    pub fn new(controller: Arc<AccountController>, bind_addr: impl Into<String>) -> Self {
        Self {
            controller,
            bind_addr: bind_addr.into(),
        }
    }

    pub async fn start(&self, mut shutdown_rx: Receiver<()>) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", self.bind_addr))?;
        info!("Server running on http://{}", self.bind_addr);

        let mut backoff = ACCEPT_BACKOFF_MIN;
        loop {
            tokio::select! {
                conn = listener.accept() => {
                    let (mut stream, peer) = match conn {
                        Ok(conn) => {
                            backoff = ACCEPT_BACKOFF_MIN;
                            conn
                        }
                        Err(e) => {
                            warn!(retry_in = ?backoff, "accept failed: {}", e);
                            tokio::time::sleep(backoff).await;
                            backoff = next_backoff(backoff);
                            continue;
                        }
                    };

                    let controller = Arc::clone(&self.controller);

                    tokio::spawn(async move {
                        let (reader, writer) = stream.split();
                        if let Err(e) = Self::handle_client(reader, writer, &controller).await {
                            error!(%peer, "Connection error: {:#}", e);
                        }
                    });
                }
                _ = &mut shutdown_rx => {
                    info!("Shutting down server...");
                    break;
                }
            }
        }
        Ok(())
    }

    pub async fn handle_client<Reader, Writer>(
        reader: Reader,
        writer: Writer,
        controller: &Arc<AccountController>,
    ) -> Result<()>
    where
        Reader: AsyncRead + Unpin,
        Writer: AsyncWrite + Unpin,
    {
        Self::handle_client_within(reader, writer, controller, READ_TIMEOUT).await
    }

    /// Like `handle_client`, answering 408 when the request has not fully
    /// arrived within `read_timeout`.
    pub async fn handle_client_within<Reader, Writer>(
        reader: Reader,
        mut writer: Writer,
        controller: &Arc<AccountController>,
        read_timeout: Duration,
    ) -> Result<()>
    where
        Reader: AsyncRead + Unpin,
        Writer: AsyncWrite + Unpin,
    {
        let read = tokio::time::timeout(read_timeout, Request::read_from(reader)).await;
        let (status_line, content) = match read {
            Ok(Ok(request)) => Self::route(&request, controller).await,
            Err(_) => {
                warn!("Request not received within {:?}", read_timeout);
                let body = serde_json::json!({ "error": "request timed out" }).to_string();
                (REQUEST_TIMEOUT.to_string(), body)
            }
            Ok(Err(e)) => {
                warn!("Failed to read request: {:#}", e);
                let body = serde_json::json!({ "error": format!("{:#}", e) }).to_string();
                (BAD_REQUEST.to_string(), body)
            }
        };

        writer
            .write_all(format!("{}{}", status_line, content).as_bytes())
            .await
            .context("Failed to write")?;
        writer.shutdown().await.context("Failed to close")
    }

    async fn route(request: &Request, controller: &AccountController) -> (String, String) {
        debug!(method = ?request.method, path = %request.path, "routing request");
        let path = request.path.as_str();
        match (request.method, path, account_id(path)) {
            (GET, ACCOUNTS_PATH, _) => controller.get_accounts(request).await,
            (POST, ACCOUNTS_PATH, _) => controller.add_account(request).await,
            (PUT, _, Some(id)) => controller.update_account(id, request).await,
            (DELETE, _, Some(id)) => controller.delete_account(id).await,
            _ => (NOT_FOUND.to_string(), ROUTE_NOT_FOUND.to_string()),
        }
    }
}

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(ACCEPT_BACKOFF_MAX)
}

/// `/api/accounts/{id}` with a single non-empty segment.
fn account_id(path: &str) -> Option<&str> {
    path.strip_prefix(ACCOUNTS_PATH)?
        .strip_prefix('/')
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{
        model::{Account, AccountType},
        service::MockAccountService,
    };
    use crate::constants::{CREATED, OK_RESPONSE};
    use mockall::predicate::eq;
    use tokio::io::AsyncReadExt;

    fn controller(service: MockAccountService) -> Arc<AccountController> {
        Arc::new(AccountController::new(Arc::new(service)))
    }

    #[test]
    fn extracts_account_id() {
        assert_eq!(account_id("/api/accounts/123"), Some("123"));
        assert_eq!(account_id("/api/accounts/"), None);
        assert_eq!(account_id("/api/accounts"), None);
        assert_eq!(account_id("/api/accounts/1/2"), None);
        assert_eq!(account_id("/api/accountsx/1"), None);
    }

    #[test]
    fn accept_backoff_doubles_up_to_cap() {
        let mut delay = ACCEPT_BACKOFF_MIN;
        let mut seen = vec![delay];
        for _ in 0..12 {
            delay = next_backoff(delay);
            seen.push(delay);
        }
        assert_eq!(seen[1], ACCEPT_BACKOFF_MIN * 2);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), ACCEPT_BACKOFF_MAX);
    }

    #[tokio::test]
    async fn silent_client_times_out() {
        // The client half stays open but never writes.
        let (_client, idle) = tokio::io::duplex(4096);
        let (mut observer, sink) = tokio::io::duplex(4096);

        Server::handle_client_within(
            idle,
            sink,
            &controller(MockAccountService::new()),
            Duration::from_millis(50),
        )
        .await
        .unwrap();

        let mut response = String::new();
        observer.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with(REQUEST_TIMEOUT));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let reader = tokio_test::io::Builder::new()
            .read(b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .build();
        let writer = tokio_test::io::Builder::new()
            .write(format!("{}{}", NOT_FOUND, ROUTE_NOT_FOUND).as_bytes())
            .build();

        Server::handle_client(reader, writer, &controller(MockAccountService::new()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unsupported_method_is_bad_request() {
        let (mut client, server) = tokio::io::duplex(4096);
        client
            .write_all(b"PATCH /api/accounts HTTP/1.1\r\n\r\n")
            .await
            .unwrap();

        let (reader, writer) = tokio::io::split(server);
        Server::handle_client(reader, writer, &controller(MockAccountService::new()))
            .await
            .unwrap();

        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with(BAD_REQUEST));
    }

    #[tokio::test]
    async fn invalid_account_number_over_the_wire() {
        let mut service = MockAccountService::new();
        service.expect_get_accounts().never();

        let (mut client, server) = tokio::io::duplex(4096);
        client
            .write_all(b"GET /api/accounts?account-number=%24%23%29%40 HTTP/1.1\r\n\r\n")
            .await
            .unwrap();

        let (reader, writer) = tokio::io::split(server);
        Server::handle_client(reader, writer, &controller(service))
            .await
            .unwrap();

        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with(BAD_REQUEST));
    }

    #[tokio::test]
    async fn post_routes_to_add_account() {
        let account = Account::new(None, "12", "abc", AccountType::Cash, true);
        let mut service = MockAccountService::new();
        service
            .expect_add_account()
            .with(eq(account.clone()))
            .times(1)
            .returning(|account| Ok(account.with_id("123")));

        let body = serde_json::to_string(&account).unwrap();
        let raw = format!(
            "POST /api/accounts HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let (mut client, server) = tokio::io::duplex(4096);
        client.write_all(raw.as_bytes()).await.unwrap();

        let (reader, writer) = tokio::io::split(server);
        Server::handle_client(reader, writer, &controller(service))
            .await
            .unwrap();

        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        let payload = response.strip_prefix(CREATED).expect("201 response");
        let created: Account = serde_json::from_str(payload).unwrap();
        assert_eq!(created, account.with_id("123"));
    }

    #[tokio::test]
    async fn delete_routes_with_path_id() {
        let mut service = MockAccountService::new();
        service
            .expect_delete_account()
            .with(eq("123".to_string()))
            .times(1)
            .returning(|_| Ok(()));

        let reader = tokio_test::io::Builder::new()
            .read(b"DELETE /api/accounts/123 HTTP/1.1\r\nContent-Type: application/json\r\n\r\n")
            .build();
        let writer = tokio_test::io::Builder::new()
            .write(OK_RESPONSE.as_bytes())
            .build();

        Server::handle_client(reader, writer, &controller(service))
            .await
            .unwrap();
    }
}
