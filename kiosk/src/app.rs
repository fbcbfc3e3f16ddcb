//! Store wiring for the kiosk

use crate::action::KioskAction;
use crate::environment::KioskEnvironment;
use crate::reducer::KioskReducer;
use crate::state::KioskState;
use crate::types::Notice;
use pickup_runtime::error::StoreError;
use pickup_runtime::store::Store;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};

/// The kiosk's store
pub type KioskStore = Store<KioskState, KioskAction, KioskEnvironment, KioskReducer>;

/// Build a store whose initial state is restored from local storage
#[must_use]
pub fn build_store(env: KioskEnvironment) -> KioskStore {
    let state = KioskState::restore(&env.local);
    Store::new(state, KioskReducer::new(), env)
}

/// Startup sequence: reconcile any restored reservation, refresh the
/// catalog, load recent orders
///
/// Each step's effects are awaited (bounded by `timeout`) before the next
/// one starts, so a restored reservation is settled before the catalog
/// arrives.
///
/// # Errors
///
/// Returns [`StoreError`] if the store is shutting down or a step does not
/// settle within `timeout`.
pub async fn bootstrap(store: &KioskStore, timeout: Duration) -> Result<(), StoreError> {
    for action in [
        KioskAction::Reconcile,
        KioskAction::RefreshCatalog,
        KioskAction::LoadRecentOrders,
    ] {
        let mut handle = store.send(action).await?;
        handle.wait_with_timeout(timeout).await?;
    }
    tracing::info!("Kiosk ready");
    Ok(())
}

/// Wait until a countdown tick leaves notices behind, such as the
/// expiry notice
///
/// Returns the notices pending right after that tick, or `None` once the
/// action channel closes.
pub async fn next_tick_notices(
    store: &KioskStore,
    actions: &mut broadcast::Receiver<KioskAction>,
) -> Option<Vec<Notice>> {
    loop {
        match actions.recv().await {
            Ok(KioskAction::Tick) => {
                let notices = store.state(|state| state.notices.clone()).await;
                if !notices.is_empty() {
                    return Some(notices);
                }
            },
            Ok(_) => {},
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Notice watcher lagged");
            },
            Err(RecvError::Closed) => return None,
        }
    }
}
