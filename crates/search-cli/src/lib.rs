//! Ambient collaborators around [`search_index::Index`]: a sliding-window
//! request tracker, a page-chunking helper for printing result lists, and
//! duplicate-document elimination — plus the `search-cli` binary that
//! wires them to a real engine over stdin.

pub mod dedupe;
pub mod paginator;
pub mod request_queue;

pub use dedupe::remove_duplicates;
pub use paginator::{paginate, Paginator};
pub use request_queue::RequestTracker;

pub mod prelude {
    pub use crate::{paginate, remove_duplicates, Paginator, RequestTracker};
    pub use search_index::{Hit, Index, IndexError, Query, Status};
}
