//! Domain types exchanged with the counter-service backend
//!
//! Everything here is a projection of server-owned state; the client never
//! computes queue positions itself.

mod admin;
mod builders;
mod counter;
mod queue;

pub use admin::{
    Admin, AdminId, CreateAdminRequest, LoginRequest, LoginResponse, ToggleAdminStatusResponse,
    UpdateAdminRequest,
};
pub use builders::CounterBuilder;
pub use counter::{Counter, CounterId, CreateCounterRequest, UpdateCounterRequest};
pub use queue::{
    Ack, CalledQueue, ClaimedTicket, CounterQueueRequest, CurrentQueue, QueueMetrics, QueueRecord,
    QueueStatus, ReleaseQueueRequest, ResetQueuesRequest, ResetQueuesResponse,
};
