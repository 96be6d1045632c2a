// Addresses bound to this host's interfaces (sysinfo)

use crate::models::AddressSet;
use sysinfo::Networks;

/// Source of the host's own addresses.
pub trait LocalAddressProvider: Send + Sync {
    fn local_addresses(&self) -> anyhow::Result<AddressSet>;
}

/// Every IPv4/IPv6 address on every interface sysinfo reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoLocalAddresses;

impl LocalAddressProvider for SysinfoLocalAddresses {
    fn local_addresses(&self) -> anyhow::Result<AddressSet> {
        let networks = Networks::new_with_refreshed_list();
        let addrs: AddressSet = networks
            .list()
            .values()
            .flat_map(|data| data.ip_networks().iter().map(|n| n.addr))
            .collect();
        Ok(addrs)
    }
}

/// Runs a provider on the blocking pool; an error or an empty answer yields an empty set
/// (every packet then classifies as Unknown).
pub async fn discover_local<P>(provider: std::sync::Arc<P>) -> AddressSet
where
    P: LocalAddressProvider + 'static,
{
    let joined = tokio::task::spawn_blocking(move || provider.local_addresses()).await;
    match joined {
        Ok(Ok(set)) => {
            if set.is_empty() {
                tracing::warn!(
                    operation = "discover_local",
                    "no local addresses found; all packets will classify as Unknown"
                );
            }
            set
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, operation = "discover_local", "local address discovery failed");
            AddressSet::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "discover_local", "local address task join failed");
            AddressSet::new()
        }
    }
}
