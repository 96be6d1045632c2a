// Forward DNS lookups (domain -> addresses) via the system resolver

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("lookup of {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: std::io::Error,
    },
    #[error("lookup of {domain} timed out after {timeout:?}")]
    Timeout { domain: String, timeout: Duration },
    #[error("{domain} resolved to no addresses")]
    NoAddresses { domain: String },
}

/// Maps a domain name to its current addresses.
pub trait Resolver: Send + Sync {
    fn resolve(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<IpAddr>, ResolveError>> + Send;
}

impl<T: Resolver> Resolver for std::sync::Arc<T> {
    fn resolve(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<IpAddr>, ResolveError>> + Send {
        (**self).resolve(domain)
    }
}

/// System resolver (`getaddrinfo` through tokio's blocking pool) with a per-lookup timeout.
#[derive(Debug, Clone)]
pub struct DnsResolver {
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Resolver for DnsResolver {
    async fn resolve(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let lookup = tokio::net::lookup_host((domain, 0));
        let addrs = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(addrs)) => addrs,
            Ok(Err(source)) => {
                return Err(ResolveError::Lookup {
                    domain: domain.to_string(),
                    source,
                });
            }
            Err(_) => {
                return Err(ResolveError::Timeout {
                    domain: domain.to_string(),
                    timeout: self.timeout,
                });
            }
        };
        let mut ips: Vec<IpAddr> = addrs.map(|sa| sa.ip()).collect();
        ips.sort();
        ips.dedup();
        if ips.is_empty() {
            return Err(ResolveError::NoAddresses {
                domain: domain.to_string(),
            });
        }
        Ok(ips)
    }
}
