// Target and local address sets. Both are swapped wholesale, never edited in place.

mod dns;
mod local;

pub use dns::{DnsResolver, ResolveError, Resolver};
pub use local::{LocalAddressProvider, SysinfoLocalAddresses, discover_local};

use crate::models::AddressSet;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Current target (monitored application) and local (this host) address snapshots.
/// Readers get an `Arc` of whichever set was current when they loaded it.
pub struct AddressSets {
    targets: ArcSwap<AddressSet>,
    local: ArcSwap<AddressSet>,
}

impl AddressSets {
    pub fn new(targets: AddressSet, local: AddressSet) -> Self {
        Self {
            targets: ArcSwap::from_pointee(targets),
            local: ArcSwap::from_pointee(local),
        }
    }

    pub fn targets(&self) -> Arc<AddressSet> {
        self.targets.load_full()
    }

    pub fn local(&self) -> Arc<AddressSet> {
        self.local.load_full()
    }

    pub fn replace_targets(&self, targets: AddressSet) {
        self.targets.store(Arc::new(targets));
    }

    pub fn replace_local(&self, local: AddressSet) {
        self.local.store(Arc::new(local));
    }
}

/// Outcome of one resolution pass over all domains.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub addresses: AddressSet,
    pub resolved: Vec<String>,
    /// Domains that failed this pass (their last known answer, if any, is still included).
    pub failed: Vec<String>,
}

/// Resolves the configured domains and remembers each domain's last good answer,
/// so a failed lookup never shrinks the set below what was already known.
pub struct TargetResolver<R> {
    resolver: R,
    domains: Vec<String>,
    known: HashMap<String, AddressSet>,
}

impl<R: Resolver> TargetResolver<R> {
    pub fn new(resolver: R, domains: Vec<String>) -> Self {
        Self {
            resolver,
            domains,
            known: HashMap::new(),
        }
    }

    /// Queries every domain concurrently; failures are logged and skipped.
    #[instrument(skip(self), fields(operation = "resolve_targets", domains = self.domains.len()))]
    pub async fn resolve_targets(&mut self) -> Resolution {
        let lookups = self.domains.iter().map(|d| self.resolver.resolve(d));
        let answers = futures_util::future::join_all(lookups).await;

        let mut resolution = Resolution::default();
        for (domain, answer) in self.domains.iter().zip(answers) {
            match answer {
                Ok(addrs) => {
                    info!(
                        domain = %domain,
                        addresses = ?addrs,
                        "resolved domain"
                    );
                    let set: AddressSet = addrs.into_iter().collect();
                    self.known.insert(domain.clone(), set);
                    resolution.resolved.push(domain.clone());
                }
                Err(e) => {
                    warn!(error = %e, domain = %domain, "failed to resolve domain");
                    resolution.failed.push(domain.clone());
                }
            }
        }
        for domain in &self.domains {
            if let Some(set) = self.known.get(domain) {
                resolution.addresses.extend(set.iter().copied());
            }
        }
        resolution
    }
}
