use std::time::Duration;

pub const OK_RESPONSE: &str =
    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n";
pub const CREATED: &str =
    "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n";
pub const BAD_REQUEST: &str =
    "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n";
pub const NOT_FOUND: &str =
    "HTTP/1.1 404 NOT FOUND\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n";
pub const REQUEST_TIMEOUT: &str =
    "HTTP/1.1 408 Request Timeout\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n";
pub const INTERNAL_ERROR: &str = "HTTP/1.1 500 INTERNAL ERROR\r\nConnection: close\r\n\r\n";

pub const ACCOUNTS_PATH: &str = "/api/accounts";
pub const ACCOUNT_NUMBER_PARAM: &str = "account-number";
pub const NAME_PARAM: &str = "name";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7879";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const MAX_HEAD_BYTES: usize = 8 * 1024;
pub const MAX_BODY_BYTES: usize = 64 * 1024;
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);
pub const ACCEPT_BACKOFF_MIN: Duration = Duration::from_millis(10);
pub const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);
