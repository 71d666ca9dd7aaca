use pinproxy_api::AppState;
use pinproxy_application::ports::{HostLookup, UpstreamForwarder};
use pinproxy_application::use_cases::{ProxyChatCompletionUseCase, ProxyMovieMetadataUseCase};
use pinproxy_domain::config::UpstreamConfig;
use pinproxy_domain::{Config, UpstreamTarget};
use pinproxy_infrastructure::dns::{PinnedDnsLookup, ResolverCache};
use pinproxy_infrastructure::forwarder::{tls, SecureForwarder};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ProxyServices {
    pub movie_metadata: Arc<ProxyMovieMetadataUseCase>,
    pub chat_completion: Arc<ProxyChatCompletionUseCase>,
}

impl ProxyServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let resolver_cache = Self::build_resolver_cache(config)?;
        let forwarder = Self::build_forwarder(config, resolver_cache)?;

        let movie_metadata = Arc::new(ProxyMovieMetadataUseCase::new(
            forwarder.clone(),
            Self::build_target("movie_metadata", &config.upstreams.movie_metadata),
        ));
        let chat_completion = Arc::new(ProxyChatCompletionUseCase::new(
            forwarder,
            Self::build_target("chat_completion", &config.upstreams.chat_completion),
            config.upstreams.chat_model.as_str(),
        ));

        Ok(Self {
            movie_metadata,
            chat_completion,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            movie_metadata: self.movie_metadata.clone(),
            chat_completion: self.chat_completion.clone(),
        }
    }

    fn build_resolver_cache(config: &Config) -> anyhow::Result<Arc<dyn HostLookup>> {
        let servers = config.resolver.socket_addrs()?;
        info!(
            servers = ?servers,
            timeout_ms = config.resolver.query_timeout_ms,
            deduplicate = config.resolver.deduplicate_inflight,
            "Pinned resolvers configured"
        );

        let lookup: Arc<dyn HostLookup> =
            Arc::new(PinnedDnsLookup::new(servers, config.resolver.query_timeout()));

        Ok(Arc::new(
            ResolverCache::new(lookup).with_deduplication(config.resolver.deduplicate_inflight),
        ))
    }

    fn build_forwarder(
        config: &Config,
        lookup: Arc<dyn HostLookup>,
    ) -> anyhow::Result<Arc<dyn UpstreamForwarder>> {
        let extra_roots = match &config.forwarder.extra_ca_file {
            Some(path) => {
                let certs = tls::load_ca_file(Path::new(path))?;
                info!(path = %path, certificates = certs.len(), "Loaded extra trust anchors");
                certs
            }
            None => Vec::new(),
        };

        let forwarder = SecureForwarder::new(lookup, tls::client_config(extra_roots)?)
            .with_timeouts(
                config.forwarder.connect_timeout(),
                config.forwarder.response_timeout(),
            );

        Ok(Arc::new(forwarder))
    }

    /// A missing credential only warns; the upstream's 401 is relayed as-is.
    fn build_target(name: &str, upstream: &UpstreamConfig) -> UpstreamTarget {
        let credential = std::env::var(&upstream.credential_env).unwrap_or_default();
        if credential.is_empty() {
            warn!(
                upstream = %name,
                env = %upstream.credential_env,
                "Credential not set"
            );
        }

        let target = upstream.into_target(name, credential);
        info!(upstream = ?target, "Upstream configured");
        target
    }
}
