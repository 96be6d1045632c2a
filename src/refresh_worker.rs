// Background worker: re-resolve target domains every ip_update_interval_secs and swap
// the target set. Optionally re-discovers the local set with the same snapshot swap.

use std::sync::Arc;
use std::time::Duration;

use crate::address_repo::{AddressSets, LocalAddressProvider, Resolver, TargetResolver, discover_local};
use tracing::{info, instrument, warn};

/// Config for the refresh worker.
#[derive(Debug, Clone)]
pub struct RefreshWorkerConfig {
    pub ip_update_interval_secs: u64,
    pub refresh_local_addresses: bool,
}

/// Spawns the refresh worker. The first refresh happens one interval after start;
/// startup resolution is the caller's job. Returns a join handle.
pub fn spawn<R, P>(
    targets: TargetResolver<R>,
    local_provider: Arc<P>,
    addresses: Arc<AddressSets>,
    config: RefreshWorkerConfig,
) -> tokio::task::JoinHandle<()>
where
    R: Resolver + 'static,
    P: LocalAddressProvider + 'static,
{
    tokio::spawn(async move {
        run(targets, local_provider, addresses, config).await;
    })
}

#[instrument(skip_all, fields(interval_secs = config.ip_update_interval_secs))]
async fn run<R, P>(
    mut targets: TargetResolver<R>,
    local_provider: Arc<P>,
    addresses: Arc<AddressSets>,
    config: RefreshWorkerConfig,
) where
    R: Resolver + 'static,
    P: LocalAddressProvider + 'static,
{
    let mut refresh_interval =
        tokio::time::interval(Duration::from_secs(config.ip_update_interval_secs));
    refresh_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // first tick completes immediately
    refresh_interval.tick().await;

    loop {
        refresh_interval.tick().await;
        run_one_refresh(&mut targets, &local_provider, &addresses, &config).await;
    }
}

/// One refresh pass: resolve, swap targets, optionally re-discover local addresses.
pub async fn run_one_refresh<R, P>(
    targets: &mut TargetResolver<R>,
    local_provider: &Arc<P>,
    addresses: &AddressSets,
    config: &RefreshWorkerConfig,
) where
    R: Resolver + 'static,
    P: LocalAddressProvider + 'static,
{
    let resolution = targets.resolve_targets().await;
    if resolution.addresses.is_empty() {
        warn!(
            failed_domains = resolution.failed.len(),
            "refresh resolved no target addresses; keeping previous set"
        );
    } else {
        let count = resolution.addresses.len();
        addresses.replace_targets(resolution.addresses);
        info!(
            target_addresses = count,
            resolved_domains = resolution.resolved.len(),
            failed_domains = resolution.failed.len(),
            "target addresses refreshed"
        );
    }

    if config.refresh_local_addresses {
        let local = discover_local(local_provider.clone()).await;
        if local.is_empty() {
            warn!("local address refresh found nothing; keeping previous set");
        } else {
            info!(local_addresses = local.len(), "local addresses refreshed");
            addresses.replace_local(local);
        }
    }
}
