use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HOST};
use http::{HeaderName, HeaderValue, Method, Request};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use pinproxy_application::ports::{HostLookup, UpstreamForwarder};
use pinproxy_domain::{
    ForwardError, HttpMethod, RequestDescriptor, UpstreamResponse, UpstreamTarget,
};
use rustls::pki_types::ServerName;
use rustls::ClientConfig;
use serde_json::Value;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);

/// Headers the forwarder owns; descriptor-supplied values for these are dropped.
const RESERVED_HEADERS: [HeaderName; 4] = [HOST, AUTHORIZATION, ACCEPT, CONTENT_TYPE];

/// Sends one request to an upstream over a fresh TLS connection.
///
/// The socket is opened to the address the [`HostLookup`] returns, while SNI,
/// certificate verification and the `Host` header all use
/// `target.hostname`.
pub struct SecureForwarder {
    lookup: Arc<dyn HostLookup>,
    connector: TlsConnector,
    connect_timeout: Duration,
    response_timeout: Duration,
}

impl SecureForwarder {
    pub fn new(lookup: Arc<dyn HostLookup>, tls_config: Arc<ClientConfig>) -> Self {
        Self {
            lookup,
            connector: TlsConnector::from(tls_config),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// `connect` bounds TCP connect plus both handshakes; `response` bounds
    /// sending the request and reading the whole body.
    pub fn with_timeouts(mut self, connect: Duration, response: Duration) -> Self {
        self.connect_timeout = connect;
        self.response_timeout = response;
        self
    }

    async fn connect(
        &self,
        ip: IpAddr,
        target: &UpstreamTarget,
    ) -> Result<TlsStream<TcpStream>, ForwardError> {
        let server_name = ServerName::try_from(target.hostname.clone()).map_err(|e| {
            ForwardError::transport(format!(
                "invalid TLS hostname '{}': {}",
                target.hostname, e
            ))
        })?;
        let addr = SocketAddr::new(ip, target.port);

        let tcp_stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ForwardError::transport(format!("connect to {} failed: {}", addr, e)))?;

        let tls_stream = self
            .connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| {
                ForwardError::transport(format!(
                    "TLS handshake with {} as '{}' failed: {}",
                    addr, target.hostname, e
                ))
            })?;

        debug!(server = %addr, hostname = %target.hostname, "TLS connection established");
        Ok(tls_stream)
    }

    async fn exchange(
        &self,
        stream: TlsStream<TcpStream>,
        request: Request<Full<Bytes>>,
    ) -> Result<(u16, Bytes), ForwardError> {
        let (mut sender, connection) =
            tokio::time::timeout(self.connect_timeout, hyper::client::conn::http1::handshake(TokioIo::new(stream)))
                .await
                .map_err(|_| ForwardError::transport("HTTP handshake timed out"))?
                .map_err(|e| ForwardError::transport(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!(error = %e, "Upstream connection closed with error");
            }
        });

        let read_response = async {
            let response = sender
                .send_request(request)
                .await
                .map_err(|e| ForwardError::transport(format!("request failed: {}", e)))?;
            let status = response.status().as_u16();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ForwardError::transport(format!("reading body failed: {}", e)))?
                .to_bytes();
            Ok::<_, ForwardError>((status, body))
        };

        tokio::time::timeout(self.response_timeout, read_response)
            .await
            .map_err(|_| {
                ForwardError::transport(format!(
                    "no complete response within {:?}",
                    self.response_timeout
                ))
            })?
    }
}

#[async_trait]
impl UpstreamForwarder for SecureForwarder {
    async fn forward(
        &self,
        target: &UpstreamTarget,
        descriptor: RequestDescriptor,
    ) -> Result<UpstreamResponse, ForwardError> {
        let ip = self.lookup.lookup(&target.hostname).await?;
        let request = build_request(target, &descriptor)?;

        let stream = tokio::time::timeout(self.connect_timeout, self.connect(ip, target))
            .await
            .map_err(|_| {
                ForwardError::transport(format!(
                    "connecting to {} timed out after {:?}",
                    target.hostname, self.connect_timeout
                ))
            })??;

        let (status, body) = self.exchange(stream, request).await?;

        debug!(
            upstream = %target.name,
            hostname = %target.hostname,
            ip = %ip,
            status = status,
            bytes = body.len(),
            "Upstream responded"
        );

        let body: Value = serde_json::from_slice(&body).map_err(|e| {
            ForwardError::malformed_response(format!(
                "{} answered {} with a non-JSON body: {}",
                target.hostname, status, e
            ))
        })?;

        Ok(UpstreamResponse::new(status, body))
    }
}

fn build_request(
    target: &UpstreamTarget,
    descriptor: &RequestDescriptor,
) -> Result<Request<Full<Bytes>>, ForwardError> {
    let method = match descriptor.method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
    };

    let mut builder = Request::builder()
        .method(method)
        .uri(target.request_path(descriptor))
        .header(HOST, target.hostname.as_str())
        .header(AUTHORIZATION, target.authorization())
        .header(ACCEPT, "application/json");

    let body = match &descriptor.body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            let bytes = serde_json::to_vec(value).map_err(|e| {
                ForwardError::transport(format!("failed to encode request body: {}", e))
            })?;
            Full::new(Bytes::from(bytes))
        }
        None => Full::new(Bytes::new()),
    };

    for (name, value) in &descriptor.headers {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) else {
            debug!(header = %name, "Skipping invalid descriptor header");
            continue;
        };
        if RESERVED_HEADERS.contains(&name) {
            continue;
        }
        builder = builder.header(name, value);
    }

    builder
        .body(body)
        .map_err(|e| ForwardError::transport(format!("failed to build request: {}", e)))
}
