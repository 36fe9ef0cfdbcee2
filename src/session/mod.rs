//! Session context
//!
//! A [`Session`] owns everything one user of the client accumulates: the
//! query cache, the ticket state machine and the link to the persisted
//! token and held ticket. It is the only place that decides what to cache,
//! what to invalidate and what to tell the user. Every mutation emits
//! exactly one [`Notification`], success or failure.

mod notify;
mod ticket;

pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use ticket::{NOTHING_TO_RELEASE, TicketMachine, TicketState};

use crate::cache::{QueryCache, QueryKey};
use crate::core::{
    Admin, AdminId, CalledQueue, ClaimedTicket, Counter, CounterId, CreateAdminRequest,
    CreateCounterRequest, CurrentQueue, LoginRequest, QueueMetrics, QueueRecord, ResetQueuesResponse,
    ToggleAdminStatusResponse, UpdateAdminRequest, UpdateCounterRequest,
};
use crate::envelope::{ApiFailure, ApiOutcome};
use crate::error::{QueueDeskError, Result};
use crate::services::{admin, counter, queue};
use crate::storage::SessionRepository;
use crate::transport::Transport;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One user's view of the backend
pub struct Session {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionRepository>,
    notifier: Arc<dyn Notifier>,
    cache: QueryCache,
    tickets: TicketMachine,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cache", &self.cache)
            .field("tickets", &self.tickets)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open a session, resuming any ticket held by an earlier run
    pub fn open(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionRepository>,
        notifier: Arc<dyn Notifier>,
        stale_after: Duration,
    ) -> Result<Self> {
        let tickets = TicketMachine::restore(store.load_held()?);
        Ok(Self {
            transport,
            store,
            notifier,
            cache: QueryCache::new(stale_after),
            tickets,
        })
    }

    #[must_use]
    pub const fn ticket_state(&self) -> &TicketState {
        self.tickets.state()
    }

    #[must_use]
    pub const fn held_ticket(&self) -> Option<&ClaimedTicket> {
        self.tickets.held()
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Shared transport, for work that runs outside the session (the board poller)
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Whether a bearer token is stored
    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.store.load_token()?.is_some_and(|t| !t.is_empty()))
    }

    // Authentication

    /// Log in and store the returned token
    ///
    /// Any previous token is forgotten first, so a failed login leaves the
    /// session logged out.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.store.clear_token()?;
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let outcome = admin::login(self.transport.as_ref(), &request).await;

        let result = match outcome {
            Ok(reply) if reply.data.token.is_empty() => Err(ApiFailure::server(admin::LOGIN_FAILED, None).into()),
            Ok(reply) => self.store.save_token(&reply.data.token),
            Err(failure) => Err(failure.into()),
        };
        if result.is_ok() {
            self.cache.clear();
        }
        self.settle(result, |_| "Login successful".to_string())
    }

    /// Forget the stored token and every cached result
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear_token()?;
        self.cache.clear();
        debug!("logged out");
        Ok(())
    }

    // Counters

    pub async fn counters(&mut self) -> Result<Vec<Counter>> {
        let key = QueryKey::counters();
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let outcome = counter::list(self.transport.as_ref()).await;
        self.settle_query(key, outcome)
    }

    pub async fn counter(&mut self, id: CounterId) -> Result<Counter> {
        let key = QueryKey::counter(id);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let outcome = counter::get(self.transport.as_ref(), id).await;
        self.settle_query(key, outcome)
    }

    pub async fn create_counter(&mut self, request: &CreateCounterRequest) -> Result<Counter> {
        let outcome = counter::create(self.transport.as_ref(), request).await;
        self.settle_mutation(outcome, &[QueryKey::counters()], |c| format!("Counter '{}' created", c.name))
    }

    pub async fn update_counter(&mut self, id: CounterId, request: &UpdateCounterRequest) -> Result<Counter> {
        if request.is_empty() {
            return self.settle(
                Err(ApiFailure::validation("Nothing to update").into()),
                |c: &Counter| c.name.clone(),
            );
        }
        let outcome = counter::update(self.transport.as_ref(), id, request).await;
        self.settle_mutation(
            outcome,
            &[QueryKey::counters(), QueryKey::counter(id)],
            |c| format!("Counter '{}' updated", c.name),
        )
    }

    pub async fn delete_counter(&mut self, id: CounterId) -> Result<()> {
        let outcome = counter::delete(self.transport.as_ref(), id).await;
        let outcome = outcome.and_then(|reply| {
            if reply.data.success {
                Ok(reply)
            } else {
                Err(ApiFailure::server(reply.message.unwrap_or_else(|| counter::DELETE_FAILED.to_string()), None))
            }
        });
        self.settle_mutation(outcome, &[QueryKey::counters()], |_| format!("Counter {id} deleted"))
            .map(drop)
    }

    // Admins

    pub async fn admins(&mut self) -> Result<Vec<Admin>> {
        let key = QueryKey::admins();
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let outcome = admin::list(self.transport.as_ref()).await;
        self.settle_query(key, outcome)
    }

    pub async fn admin(&mut self, id: AdminId) -> Result<Admin> {
        let key = QueryKey::admin(id);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let outcome = admin::get(self.transport.as_ref(), id).await;
        self.settle_query(key, outcome)
    }

    pub async fn create_admin(&mut self, request: &CreateAdminRequest) -> Result<Admin> {
        let outcome = admin::create(self.transport.as_ref(), request).await;
        self.settle_mutation(outcome, &[QueryKey::admins()], |_| "Admin created successfully".to_string())
    }

    pub async fn update_admin(&mut self, id: AdminId, request: &UpdateAdminRequest) -> Result<Admin> {
        if request.is_empty() {
            return self.settle(
                Err(ApiFailure::validation("Nothing to update").into()),
                |a: &Admin| a.username.clone(),
            );
        }
        let outcome = admin::update(self.transport.as_ref(), id, request).await;
        self.settle_mutation(outcome, &[QueryKey::admins()], |_| "Admin updated successfully".to_string())
    }

    pub async fn delete_admin(&mut self, id: AdminId) -> Result<()> {
        let outcome = admin::delete(self.transport.as_ref(), id).await;
        let outcome = outcome.and_then(|reply| {
            if reply.data.success {
                Ok(reply)
            } else {
                Err(ApiFailure::server(reply.message.unwrap_or_else(|| admin::DELETE_FAILED.to_string()), None))
            }
        });
        self.settle_mutation(outcome, &[QueryKey::admins()], |_| "Admin deleted successfully".to_string())
            .map(drop)
    }

    pub async fn toggle_admin(&mut self, id: AdminId) -> Result<ToggleAdminStatusResponse> {
        let outcome = admin::toggle_status(self.transport.as_ref(), id).await;
        self.settle_mutation(outcome, &[QueryKey::admins()], |r| {
            let status = if r.new_status { "activated" } else { "deactivated" };
            format!("Admin {status} successfully")
        })
    }

    // Queues

    /// Claim a ticket and persist it for later commands
    pub async fn claim(&mut self) -> Result<ClaimedTicket> {
        let result = self.tickets.claim(self.transport.as_ref()).await.map(|reply| reply.data);
        if result.is_ok() {
            self.persist_held();
            self.cache.invalidate(&QueryKey::queues());
        }
        self.settle(result, |t| format!("Queue number {} claimed at {}", t.queue_number, t.counter_name))
    }

    /// Release a ticket; `None` identifiers fall back to the held ticket
    pub async fn release(&mut self, counter_id: Option<CounterId>, queue_number: Option<u32>) -> Result<ClaimedTicket> {
        let held = self.tickets.held();
        let counter_id = counter_id.or_else(|| held.map(|t| t.counter_id));
        let queue_number = queue_number.or_else(|| held.map(|t| t.queue_number));

        let result = self
            .tickets
            .release(self.transport.as_ref(), counter_id, queue_number)
            .await
            .map(|reply| reply.data);
        if result.is_ok() {
            self.persist_held();
            self.cache.invalidate(&QueryKey::queues());
        }
        self.settle(result, |t| format!("Queue number {} released", t.queue_number))
    }

    pub async fn call_next(&mut self, counter_id: CounterId) -> Result<CalledQueue> {
        let outcome = queue::next(self.transport.as_ref(), counter_id).await;
        self.settle_mutation(outcome, &[QueryKey::queues()], |called| match called.queue_number {
            Some(number) => format!("Now serving number {number}"),
            None => "Next queue processed".to_string(),
        })
    }

    pub async fn skip(&mut self, counter_id: CounterId) -> Result<CalledQueue> {
        let outcome = queue::skip(self.transport.as_ref(), counter_id).await;
        self.settle_mutation(outcome, &[QueryKey::queues()], |called| match called.queue_number {
            Some(number) => format!("Queue number {number} skipped"),
            None => "Queue skipped".to_string(),
        })
    }

    pub async fn reset(&mut self, counter_id: Option<CounterId>) -> Result<ResetQueuesResponse> {
        let outcome = queue::reset(self.transport.as_ref(), counter_id).await;
        self.settle_mutation(outcome, &[QueryKey::queues()], |r| match counter_id {
            Some(id) => format!("Reset {} queue(s) at counter {id}", r.reset_count),
            None => format!("Reset {} queue(s) across all counters", r.reset_count),
        })
    }

    pub async fn current_queues(&mut self) -> Result<Vec<CurrentQueue>> {
        let key = QueryKey::current_queues();
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let outcome = queue::current(self.transport.as_ref()).await;
        self.settle_query(key, outcome)
    }

    pub async fn metrics(&mut self) -> Result<QueueMetrics> {
        let key = QueryKey::queue_metrics();
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let outcome = queue::metrics(self.transport.as_ref()).await;
        self.settle_query(key, outcome)
    }

    pub async fn search(&mut self, query: &str) -> Result<Vec<QueueRecord>> {
        let key = QueryKey::queue_search(query);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let outcome = queue::search(self.transport.as_ref(), query).await;
        self.settle_query(key, outcome)
    }

    // Settlement

    fn settle_query<R>(&mut self, key: QueryKey, outcome: ApiOutcome<R>) -> Result<R>
    where
        R: Serialize + DeserializeOwned,
    {
        match outcome {
            Ok(reply) => {
                self.cache.insert(key, &reply.data);
                Ok(reply.data)
            },
            Err(failure) => {
                self.on_failure(&failure);
                Err(failure.into())
            },
        }
    }

    fn settle_mutation<R, F>(&mut self, outcome: ApiOutcome<R>, invalidates: &[QueryKey], describe: F) -> Result<R>
    where
        F: FnOnce(&R) -> String,
    {
        let result = outcome.map(|reply| {
            for key in invalidates {
                self.cache.invalidate(key);
            }
            reply.data
        });
        self.settle(result.map_err(QueueDeskError::from), describe)
    }

    /// Emit the single notification for a finished mutation
    fn settle<R, F>(&mut self, result: Result<R>, describe: F) -> Result<R>
    where
        F: FnOnce(&R) -> String,
    {
        match &result {
            Ok(value) => self.notifier.notify(Notification::success(describe(value))),
            Err(error) => {
                if let QueueDeskError::Api(failure) = error {
                    self.on_failure(failure);
                }
                self.notifier.notify(Notification::error(error.user_message()));
            },
        }
        result
    }

    fn on_failure(&mut self, failure: &ApiFailure) {
        if failure.is_unauthorized() {
            warn!("server rejected the stored token; clearing it");
            if let Err(e) = self.store.clear_token() {
                warn!(error = %e, "failed to clear stored token");
            }
            self.cache.clear();
        }
    }

    fn persist_held(&self) {
        let result = match self.tickets.held() {
            Some(ticket) => self.store.save_held(ticket),
            None => self.store.clear_held(),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist held ticket");
        }
    }
}
