//! Call-state listener
//!
//! Turns phone state transitions into controller transitions while
//! auto-call recording is enabled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::telephony::{CallState, TelephonyEvent};

use super::ports::{PlatformRecorder, PreferenceStore};
use super::recording::RecordingController;

/// What the listener did with one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallAction {
    /// Auto-call recording is off
    Disabled,
    /// Nothing to do for this state
    Ignored,
    /// A call recording started for this caller
    Started { caller: String },
    /// The running session, if any, was stopped
    Stopped,
    /// The controller refused or failed; already logged
    Failed,
}

/// Call-state listener
pub struct CallStateListener<P, R>
where
    P: PreferenceStore + ?Sized,
    R: PlatformRecorder,
{
    preferences: Arc<P>,
    controller: Arc<RecordingController<R>>,
}

impl<P, R> CallStateListener<P, R>
where
    P: PreferenceStore + ?Sized,
    R: PlatformRecorder,
{
    pub fn new(preferences: Arc<P>, controller: Arc<RecordingController<R>>) -> Self {
        Self {
            preferences,
            controller,
        }
    }

    /// Handle one telephony event.
    ///
    /// The preference is read on every event so a toggle takes effect on
    /// the next call. Controller failures are logged and dropped.
    pub async fn handle(&self, event: &TelephonyEvent) -> CallAction {
        let enabled = match self.preferences.auto_call_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!(error = %e, "Could not read auto-call preference, treating as off");
                false
            }
        };
        if !enabled {
            debug!(state = %event.state, "Auto-call recording off, event ignored");
            return CallAction::Disabled;
        }

        match event.state {
            CallState::Ringing => CallAction::Ignored,
            CallState::Offhook => {
                let caller = event.caller().to_string();
                match self.controller.start_call(&caller).await {
                    Ok(_) => {
                        info!(caller = %caller, "Call recording started");
                        CallAction::Started { caller }
                    }
                    Err(e) => {
                        warn!(error = %e, "Call recording could not start");
                        CallAction::Failed
                    }
                }
            }
            CallState::Idle => {
                self.controller.stop().await;
                CallAction::Stopped
            }
        }
    }

    /// Consume events until every sender is dropped
    pub async fn run(self, mut events: mpsc::Receiver<TelephonyEvent>) {
        while let Some(event) = events.recv().await {
            let action = self.handle(&event).await;
            debug!(state = %event.state, ?action, "Phone state handled");
        }
        debug!("Phone state channel closed");
    }
}
