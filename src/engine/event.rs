use crate::error::PlaybackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Output device lifecycle. Activation happens on the first `play()` or an
/// explicit `initialize()`; a failed activation leaves the device
/// `Uninitialized` so the next call retries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeviceState {
    #[default]
    Uninitialized,
    Ready { sample_rate: f32 },
}

/// Status notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    StateChanged(TransportState),
    TimeUpdate { position: f64, duration: f64 },
    Completed,
    Error(PlaybackError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PlaybackEvent)>;
type TimeCallback = Box<dyn FnMut(f64, f64)>;
type ErrorCallback = Box<dyn FnMut(&PlaybackError)>;

/// Subscriber list plus the two single-slot callbacks.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    on_time_update: Option<TimeCallback>,
    on_error: Option<ErrorCallback>,
}

impl Observers {
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn set_time_update(&mut self, callback: TimeCallback) {
        self.on_time_update = Some(callback);
    }

    pub fn set_error(&mut self, callback: ErrorCallback) {
        self.on_error = Some(callback);
    }

    pub fn emit(&mut self, event: PlaybackEvent) {
        match &event {
            PlaybackEvent::TimeUpdate { position, duration } => {
                if let Some(callback) = self.on_time_update.as_mut() {
                    callback(*position, *duration);
                }
            }
            PlaybackEvent::Error(error) => {
                if let Some(callback) = self.on_error.as_mut() {
                    callback(error);
                }
            }
            _ => {}
        }

        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}
