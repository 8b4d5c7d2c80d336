//! Data bridge: connects the [`Console`] query cache to TUI actions.
//!
//! Runs as a background task: subscribes to the cached reads the screens
//! show, forwards every state change as an [`Action`], and refetches a read
//! whenever a mutation invalidates its key.

use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use outreach_core::{Console, QueryKey};

use crate::action::Action;

/// Forward query state to the TUI until `cancel` fires.
pub async fn spawn_data_bridge(
    console: Console,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let limit = console.config().latest_limit;
    let latest_key = QueryKey::latest_results(limit);

    let mut campaigns = console.watch_campaigns();
    let mut latest = console.watch_latest(limit);
    let mut invalidations = console.subscribe_invalidations();

    // Push initial snapshots so screens render their pending state at once
    let _ = action_tx.send(Action::CampaignsUpdated(campaigns.current().clone()));
    let _ = action_tx.send(Action::LatestResultsUpdated(latest.current().clone()));

    refetch_campaigns(&console);
    refetch_latest(&console, limit);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(state) = campaigns.changed() => {
                debug!("dispatching CampaignsUpdated");
                let _ = action_tx.send(Action::CampaignsUpdated(state));
            }
            Some(state) = latest.changed() => {
                debug!("dispatching LatestResultsUpdated");
                let _ = action_tx.send(Action::LatestResultsUpdated(state));
            }
            received = invalidations.recv() => match received {
                Ok(key) if key == QueryKey::campaigns() => refetch_campaigns(&console),
                Ok(key) if key == latest_key => refetch_latest(&console, limit),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "invalidation stream lagged, refetching everything");
                    refetch_campaigns(&console);
                    refetch_latest(&console, limit);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    debug!("data bridge shut down");
}

// Failures land in the query state, so the spawned reads only log them.

fn refetch_campaigns(console: &Console) {
    let console = console.clone();
    tokio::spawn(async move {
        if let Err(e) = console.campaigns().await {
            warn!(error = %e, "campaign list fetch failed");
        }
    });
}

fn refetch_latest(console: &Console, limit: u32) {
    let console = console.clone();
    tokio::spawn(async move {
        if let Err(e) = console.latest_results(limit).await {
            warn!(error = %e, "latest results fetch failed");
        }
    });
}
