use crate::core::{ClaimedTicket, CounterId, ReleaseQueueRequest};
use crate::envelope::{ApiFailure, Reply};
use crate::error::{QueueDeskError, Result};
use crate::services::queue;
use crate::transport::Transport;

/// Shown when release is attempted without both identifiers
pub const NOTHING_TO_RELEASE: &str = "No queue to release";

/// Client-side view of the ticket this session holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TicketState {
    #[default]
    Idle,
    Claimed(ClaimedTicket),
}

/// The claim/release state machine
///
/// Transitions happen only after the server confirms them. A failed claim
/// leaves the machine `Idle`; a failed release leaves the ticket held.
/// Neither call is ever retried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketMachine {
    state: TicketState,
}

impl TicketMachine {
    /// Resume from a ticket persisted by an earlier run
    #[must_use]
    pub fn restore(held: Option<ClaimedTicket>) -> Self {
        Self {
            state: held.map_or(TicketState::Idle, TicketState::Claimed),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &TicketState {
        &self.state
    }

    #[must_use]
    pub const fn held(&self) -> Option<&ClaimedTicket> {
        match &self.state {
            TicketState::Idle => None,
            TicketState::Claimed(ticket) => Some(ticket),
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, TicketState::Idle)
    }

    /// Claim the next available ticket
    ///
    /// # Errors
    ///
    /// `TicketAlreadyHeld` without contacting the server when a ticket is
    /// already held, or the normalized failure of the claim call.
    pub async fn claim<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<Reply<ClaimedTicket>> {
        if let TicketState::Claimed(held) = &self.state {
            return Err(QueueDeskError::TicketAlreadyHeld {
                queue_number: held.queue_number,
                counter_name: held.counter_name.clone(),
            });
        }

        let reply = queue::claim(transport).await?;
        self.state = TicketState::Claimed(reply.data.clone());
        Ok(reply)
    }

    /// Release a ticket identified by counter and queue number
    ///
    /// A missing or zero identifier fails locally without contacting the
    /// server. The held ticket is only dropped once the server confirms.
    ///
    /// # Errors
    ///
    /// `NoHeldTicket` when idle, a validation failure when an identifier is
    /// missing or names a ticket other than the held one, or the normalized
    /// failure of the release call.
    pub async fn release<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        counter_id: Option<CounterId>,
        queue_number: Option<u32>,
    ) -> Result<Reply<ClaimedTicket>> {
        let TicketState::Claimed(held) = &self.state else {
            return Err(QueueDeskError::NoHeldTicket);
        };

        let (Some(counter_id), Some(queue_number)) = (counter_id.filter(|id| *id != 0), queue_number.filter(|n| *n != 0))
        else {
            return Err(ApiFailure::validation(NOTHING_TO_RELEASE).into());
        };
        if (counter_id, queue_number) != (held.counter_id, held.queue_number) {
            return Err(ApiFailure::validation(format!(
                "Queue number {queue_number} at counter {counter_id} is not the held ticket (queue number {} at counter {})",
                held.queue_number, held.counter_id
            ))
            .into());
        }

        let reply = queue::release(transport, &ReleaseQueueRequest { counter_id, queue_number }).await?;
        if !reply.data.success {
            return Err(ApiFailure::server(reply.message.unwrap_or_else(|| queue::RELEASE_FAILED.to_string()), None).into());
        }

        let released = held.clone();
        self.state = TicketState::Idle;
        Ok(Reply {
            data: released,
            message: reply.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::FailureKind;
    use crate::test_utils::{claim_envelope, envelope_ok, respond_with, sample_ticket};
    use crate::transport::{MockTransport, TransportError};
    use serde_json::json;

    #[tokio::test]
    async fn test_claim_stores_server_ticket() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| respond_with(claim_envelope()));

        let mut machine = TicketMachine::default();
        machine.claim(&transport).await.unwrap();

        assert_eq!(machine.state(), &TicketState::Claimed(sample_ticket()));
    }

    #[tokio::test]
    async fn test_second_claim_never_reaches_server() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let mut machine = TicketMachine::restore(Some(sample_ticket()));
        let error = machine.claim(&transport).await.unwrap_err();

        assert!(matches!(error, QueueDeskError::TicketAlreadyHeld { queue_number: 8, .. }));
        assert_eq!(machine.held(), Some(&sample_ticket()));
    }

    #[tokio::test]
    async fn test_failed_claim_stays_idle() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::network("Cannot connect to http://localhost:3000")));

        let mut machine = TicketMachine::default();
        assert!(machine.claim(&transport).await.is_err());
        assert!(machine.is_idle());
    }

    #[tokio::test]
    async fn test_release_without_identifiers_is_local() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let mut machine = TicketMachine::restore(Some(sample_ticket()));
        for (counter_id, queue_number) in [(None, Some(8)), (Some(2), None), (Some(0), Some(8))] {
            let error = machine.release(&transport, counter_id, queue_number).await.unwrap_err();
            match error {
                QueueDeskError::Api(failure) => {
                    assert_eq!(failure.kind, FailureKind::Validation);
                    assert_eq!(failure.message, NOTHING_TO_RELEASE);
                },
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert!(!machine.is_idle());
    }

    #[tokio::test]
    async fn test_release_of_another_ticket_is_local() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let mut machine = TicketMachine::restore(Some(sample_ticket()));
        for (counter_id, queue_number) in [(5, 99), (2, 99), (5, 8)] {
            let error = machine.release(&transport, Some(counter_id), Some(queue_number)).await.unwrap_err();
            match error {
                QueueDeskError::Api(failure) => {
                    assert_eq!(failure.kind, FailureKind::Validation);
                    assert!(failure.message.contains("is not the held ticket"));
                },
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(machine.held(), Some(&sample_ticket()));
    }

    #[tokio::test]
    async fn test_release_while_idle_is_local() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let mut machine = TicketMachine::default();
        let error = machine.release(&transport, Some(2), Some(8)).await.unwrap_err();
        assert!(matches!(error, QueueDeskError::NoHeldTicket));
    }

    #[tokio::test]
    async fn test_claim_then_release_returns_to_idle() {
        let mut transport = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_send()
            .withf(|r| r.path == "/api/v1/queues/claim")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| respond_with(claim_envelope()));
        transport
            .expect_send()
            .withf(|r| r.body == Some(json!({ "counter_id": 2, "queue_number": 8 })))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| respond_with(envelope_ok(json!({ "success": true }))));

        let mut machine = TicketMachine::default();
        let ticket = machine.claim(&transport).await.unwrap().data;
        let released = machine
            .release(&transport, Some(ticket.counter_id), Some(ticket.queue_number))
            .await
            .unwrap();

        assert_eq!(released.data, ticket);
        assert!(machine.is_idle());
        assert_eq!(machine.held(), None);
    }

    #[tokio::test]
    async fn test_failed_release_keeps_ticket() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| respond_with(json!({ "status": false, "message": "Queue already served" })));

        let mut machine = TicketMachine::restore(Some(sample_ticket()));
        let error = machine.release(&transport, Some(2), Some(8)).await.unwrap_err();

        assert_eq!(error.user_message(), "Queue already served");
        assert_eq!(machine.held(), Some(&sample_ticket()));
    }

    #[tokio::test]
    async fn test_unsuccessful_ack_keeps_ticket() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| respond_with(envelope_ok(json!({ "success": false }))));

        let mut machine = TicketMachine::restore(Some(sample_ticket()));
        let error = machine.release(&transport, Some(2), Some(8)).await.unwrap_err();

        assert_eq!(error.user_message(), queue::RELEASE_FAILED);
        assert!(!machine.is_idle());
    }
}
