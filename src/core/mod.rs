//! Client-side orchestration: one state machine per result stream

pub mod debounce;
pub mod explain;
pub mod filters;
pub mod search;
pub mod stats;
pub mod status;
pub mod timer;
pub mod upload;

pub use filters::FilterState;
pub use search::{SearchEffect, SearchEvent, SearchOrchestrator};
pub use stats::{spawn_poller, StatsPoller};
pub use status::RequestStatus;
pub use upload::{UploadCoordinator, UploadReport, UploadRequest};
