#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use pinproxy_api::{create_api_routes, handlers, AppState};
use pinproxy_application::ports::{HostLookup, UpstreamForwarder};
use pinproxy_application::use_cases::{ProxyChatCompletionUseCase, ProxyMovieMetadataUseCase};
use pinproxy_domain::{ResolutionError, UpstreamTarget, DEFAULT_CHAT_MODEL};
use pinproxy_infrastructure::forwarder::{tls, SecureForwarder};
use rcgen::{BasicConstraints, CertificateParams, IsCa, KeyPair, SanType};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

pub struct LoopbackLookup;

#[async_trait]
impl HostLookup for LoopbackLookup {
    async fn lookup(&self, _hostname: &str) -> Result<IpAddr, ResolutionError> {
        Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

pub struct FailingLookup;

#[async_trait]
impl HostLookup for FailingLookup {
    async fn lookup(&self, hostname: &str) -> Result<IpAddr, ResolutionError> {
        Err(ResolutionError::AllServersFailed {
            hostname: hostname.to_string(),
        })
    }
}

/// HTTPS upstream on loopback presenting a certificate for `hostname`,
/// answering every request with `status` and `body`.
pub struct Upstream {
    pub port: u16,
    pub ca: CertificateDer<'static>,
    targets: Arc<Mutex<Vec<String>>>,
}

impl Upstream {
    /// Request targets (path and query) in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

pub async fn start_upstream(hostname: &str, status: u16, body: &'static str) -> Upstream {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let leaf_key = KeyPair::generate().unwrap();
    let mut leaf_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    leaf_params.subject_alt_names = vec![SanType::DnsName(hostname.try_into().unwrap())];
    let leaf_cert = leaf_params
        .signed_by(&leaf_key, &ca_cert, &ca_key)
        .unwrap();

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(
            vec![leaf_cert.der().clone()],
            PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
        )
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let targets = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&targets);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let recorded = Arc::clone(&recorded);
            tokio::spawn(async move {
                let Ok(tls) = acceptor.accept(stream).await else {
                    return;
                };
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    recorded.lock().unwrap().push(req.uri().to_string());
                    async move {
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("content-type", "application/json")
                                .body(Full::new(Bytes::from_static(body.as_bytes())))
                                .unwrap(),
                        )
                    }
                });
                let _ = hyper::server::conn::http1::Builder::new()
                    .serve_connection(TokioIo::new(tls), service)
                    .await;
            });
        }
    });

    Upstream {
        port,
        ca: ca_cert.der().clone(),
        targets,
    }
}

/// Full router wired the way the binary wires it, with both targets pointed
/// at `port` and the given resolver in front of the forwarder.
pub fn create_app(lookup: Arc<dyn HostLookup>, ca: Vec<CertificateDer<'static>>, port: u16) -> Router {
    let forwarder: Arc<dyn UpstreamForwarder> =
        Arc::new(SecureForwarder::new(lookup, tls::client_config(ca).unwrap()));

    let state = AppState {
        movie_metadata: Arc::new(ProxyMovieMetadataUseCase::new(
            Arc::clone(&forwarder),
            UpstreamTarget::movie_metadata("tmdb-key").with_port(port),
        )),
        chat_completion: Arc::new(ProxyChatCompletionUseCase::new(
            forwarder,
            UpstreamTarget::chat_completion("openai-key").with_port(port),
            DEFAULT_CHAT_MODEL,
        )),
    };

    Router::new()
        .nest("/api", create_api_routes(state))
        .route("/", axum::routing::get(handlers::liveness))
}
