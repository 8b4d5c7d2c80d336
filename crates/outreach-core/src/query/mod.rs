// ── Query layer ──
//
// Request cache between the backend client and the views: keyed reads,
// in-flight de-duplication, staleness and invalidation.

mod cache;
mod key;
mod stream;

pub use cache::QueryCache;
pub use key::{QueryKey, QueryKind};
pub use stream::{QueryState, QueryStream, QueryWatchStream};
