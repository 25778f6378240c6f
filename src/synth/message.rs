#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::reverb::ReverbParams;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FxMessage {
    SetParams(ReverbParams),
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<FxMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<FxMessage> {
    fn pop(&mut self) -> Option<FxMessage> {
        Consumer::pop(self).ok()
    }
}

/// Receiver for effects that are never controlled from another thread.
pub struct NoMessages;

impl MessageReceiver for NoMessages {
    fn pop(&mut self) -> Option<FxMessage> {
        None
    }
}

/// Control-thread end of a reverb's message queue.
#[cfg(feature = "rtrb")]
pub struct ReverbHandle {
    tx: Producer<FxMessage>,
}

#[cfg(feature = "rtrb")]
impl ReverbHandle {
    pub fn set_params(&mut self, params: ReverbParams) {
        let clamped = params.clamped();
        if clamped != params {
            tracing::debug!(?params, ?clamped, "reverb parameters clamped");
        }
        self.send(FxMessage::SetParams(clamped));
    }

    pub fn reset(&mut self) {
        self.send(FxMessage::Reset);
    }

    fn send(&mut self, message: FxMessage) {
        if self.tx.push(message).is_err() {
            tracing::warn!(?message, "reverb control queue full, message dropped");
        }
    }
}

/// Create a bounded control queue: the handle stays on the control thread,
/// the consumer goes to the audio thread.
#[cfg(feature = "rtrb")]
pub fn reverb_channel(capacity: usize) -> (ReverbHandle, Consumer<FxMessage>) {
    let (tx, rx) = RingBuffer::new(capacity);
    (ReverbHandle { tx }, rx)
}
