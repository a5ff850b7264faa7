//! Bounded FIFO admission queue.

use tokio::sync::{mpsc, oneshot};

use crate::domain::{PaymentRequest, ProcessorId};
use crate::error::GatewayError;

/// Terminal result of one dispatched payment: the processor that settled
/// it, or the failure that ended the attempt.
pub type DispatchOutcome = Result<ProcessorId, GatewayError>;

/// One admitted request plus the channel its outcome is delivered on.
pub struct DispatchJob {
    pub request: PaymentRequest,
    pub reply: oneshot::Sender<DispatchOutcome>,
}

/// Producer half of the queue. Cloned freely by request handlers; the
/// single consumer holds the receiver.
#[derive(Clone)]
pub struct DispatchQueue {
    tx: mpsc::Sender<DispatchJob>,
}

/// Create the queue with a fixed capacity.
pub fn channel(capacity: usize) -> (DispatchQueue, mpsc::Receiver<DispatchJob>) {
    let (tx, rx) = mpsc::channel(capacity);
    (DispatchQueue { tx }, rx)
}

impl DispatchQueue {
    /// Admit a request without waiting. A full queue rejects immediately
    /// with [`GatewayError::QueueSaturated`]; an admitted request yields
    /// a receiver that resolves once dispatch reaches a terminal state.
    pub fn enqueue(
        &self,
        request: PaymentRequest,
    ) -> Result<oneshot::Receiver<DispatchOutcome>, GatewayError> {
        let (reply, outcome) = oneshot::channel();
        self.tx
            .try_send(DispatchJob { request, reply })
            .map_err(|_| GatewayError::QueueSaturated)?;
        Ok(outcome)
    }
}
