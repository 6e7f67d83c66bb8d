//! One feed per topic, each a [`LiveFeed`](crate::LiveFeed) with the query
//! keys, toast text and extra counters that topic needs.

mod contacts;
mod dashboard;
mod demandes;
mod emails;
mod leads;
mod notifications;
mod paiements;
mod performance;

pub use contacts::{CONTACTS_UNREAD_KEY, ContactsFeed};
pub use dashboard::DashboardFeed;
pub use demandes::DemandesFeed;
pub use emails::EmailsFeed;
pub use leads::LeadsFeed;
pub use notifications::NotificationsFeed;
pub use paiements::PaiementsFeed;
pub use performance::PerformanceFeed;

use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Spawns a one-shot seed on the current runtime. Outside a runtime the seed
/// is skipped and the counter starts at zero.
fn spawn_seed<F>(what: &'static str, fut: F) -> Option<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => Some(handle.spawn(fut)),
        Err(_) => {
            tracing::debug!(what, "no async runtime; unread seed skipped");
            None
        }
    }
}

macro_rules! deref_to_live_feed {
    ($feed:ty) => {
        impl std::ops::Deref for $feed {
            type Target = $crate::feed::LiveFeed;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    };
}
pub(crate) use deref_to_live_feed;
