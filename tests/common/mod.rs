//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use waltid_router::config::{RouterConfig, ServiceRole};
use waltid_router::{HttpServer, RouteTable, Shutdown};

/// Header the echo backend reports back, to check headers survive forwarding.
pub const ECHO_HEADER: &str = "x-trace";

/// Start a backend that answers every request with
/// `"<name> <method> <request-target> host=<Host>"`, followed by
/// `" x-trace=<value>"` and `" body=<body>"` when those are present.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (reader, mut writer) = socket.into_split();
                let mut reader = BufReader::new(reader);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.is_err() {
                    return;
                }

                let mut host = String::new();
                let mut trace = None;
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line).await {
                        Ok(0) | Err(_) => return,
                        Ok(_) => {}
                    }
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((k, v)) = line.split_once(':') {
                        let v = v.trim();
                        if k.eq_ignore_ascii_case("host") {
                            host = v.to_string();
                        } else if k.eq_ignore_ascii_case(ECHO_HEADER) {
                            trace = Some(v.to_string());
                        } else if k.eq_ignore_ascii_case("content-length") {
                            content_length = v.parse().unwrap_or(0);
                        }
                    }
                }

                let mut request_body = vec![0u8; content_length];
                if reader.read_exact(&mut request_body).await.is_err() {
                    return;
                }

                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or("");
                let target = parts.next().unwrap_or("");
                let mut body = format!("{} {} {} host={}", name, method, target, host);
                if let Some(trace) = trace {
                    body.push_str(&format!(" {}={}", ECHO_HEADER, trace));
                }
                if !request_body.is_empty() {
                    body.push_str(" body=");
                    body.push_str(&String::from_utf8_lossy(&request_body));
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = writer.write_all(response.as_bytes()).await;
                let _ = writer.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Default configuration with every role's backend on localhost.
pub fn local_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    for role in ServiceRole::ALL {
        config.routing.hosts.set(role, "127.0.0.1".into());
    }
    config
}

/// Build the table for `config` and serve it on an ephemeral port.
pub async fn start_router(config: RouterConfig) -> (SocketAddr, Shutdown) {
    let table = RouteTable::build(&config.routing.policy_specs()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, Arc::new(table)).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that talks to the router directly.
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Client that uses the router as its HTTP proxy (absolute-form requests).
pub fn proxied_client(router: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .proxy(reqwest::Proxy::http(format!("http://{}", router)).unwrap())
        .build()
        .unwrap()
}
