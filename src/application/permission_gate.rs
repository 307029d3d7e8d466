//! Permission gate

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::permission::{Capability, PermissionStatus};

use super::error::AppError;
use super::ports::{PermissionError, PermissionProvider};

/// Outcome of requesting several capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionReport {
    pub statuses: Vec<(Capability, PermissionStatus)>,
}

impl PermissionReport {
    pub fn all_granted(&self) -> bool {
        self.statuses.iter().all(|(_, status)| status.is_granted())
    }

    /// First capability that was not granted
    pub fn first_refused(&self) -> Option<(Capability, PermissionStatus)> {
        self.statuses
            .iter()
            .find(|(_, status)| !status.is_granted())
            .copied()
    }

    /// Turn a refusal into an error the caller can show
    pub fn into_result(self) -> Result<(), AppError> {
        match self.first_refused() {
            Some((capability, status)) => Err(AppError::PermissionDenied { capability, status }),
            None => Ok(()),
        }
    }
}

/// Permission gate
pub struct PermissionGate<P: PermissionProvider + ?Sized> {
    provider: Arc<P>,
    notify: bool,
}

impl<P: PermissionProvider + ?Sized> PermissionGate<P> {
    /// `notify` adds notification posting to every requirement set
    pub fn new(provider: Arc<P>, notify: bool) -> Self {
        Self { provider, notify }
    }

    /// Current status without prompting
    pub async fn query_status(&self, capability: Capability) -> PermissionStatus {
        self.provider.check(capability).await
    }

    /// Check, and ask only when the answer may still change
    pub async fn ensure(&self, capability: Capability) -> PermissionStatus {
        let status = self.provider.check(capability).await;
        if status != PermissionStatus::Denied {
            return status;
        }
        debug!(capability = %capability, "Requesting permission");
        let status = self.provider.request(capability).await;
        info!(capability = %capability, status = %status, "Permission request answered");
        status
    }

    /// Ensure each capability in turn, stopping at the first refusal
    pub async fn request_all(&self, capabilities: &[Capability]) -> PermissionReport {
        let mut statuses = Vec::with_capacity(capabilities.len());
        for &capability in capabilities {
            let status = self.ensure(capability).await;
            statuses.push((capability, status));
            if !status.is_granted() {
                break;
            }
        }
        PermissionReport { statuses }
    }

    /// Capabilities needed before a voice recording starts; phone state is
    /// included so an incoming call can interrupt the memo
    pub fn for_recording(&self) -> Vec<Capability> {
        self.with_notifications(vec![Capability::Microphone, Capability::PhoneState])
    }

    /// Capabilities needed before auto-call recording is enabled
    pub fn for_auto_call(&self) -> Vec<Capability> {
        self.for_recording()
    }

    fn with_notifications(&self, mut capabilities: Vec<Capability>) -> Vec<Capability> {
        if self.notify {
            capabilities.push(Capability::PostNotifications);
        }
        capabilities
    }

    /// Succeed only if every capability ends up granted
    pub async fn authorize(&self, capabilities: &[Capability]) -> Result<(), AppError> {
        self.request_all(capabilities).await.into_result()
    }

    /// Escape hatch for blocked capabilities
    pub fn open_settings(&self) -> Result<(), PermissionError> {
        self.provider.open_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MockPermissions;

    #[tokio::test]
    async fn granted_is_not_prompted() {
        let provider = Arc::new(MockPermissions::granted());
        let gate = PermissionGate::new(provider.clone(), false);

        let report = gate.request_all(&gate.for_auto_call()).await;

        assert!(report.all_granted());
        assert!(provider.prompted().is_empty());
    }

    #[tokio::test]
    async fn denied_is_requested() {
        let provider = Arc::new(
            MockPermissions::granted()
                .with_check(Capability::Microphone, PermissionStatus::Denied)
                .with_request(Capability::Microphone, PermissionStatus::Granted),
        );
        let gate = PermissionGate::new(provider.clone(), false);

        assert_eq!(gate.ensure(Capability::Microphone).await, PermissionStatus::Granted);
        assert_eq!(provider.prompted(), vec![Capability::Microphone]);
    }

    #[tokio::test]
    async fn blocked_is_not_requested() {
        let provider = Arc::new(
            MockPermissions::granted().with_check(Capability::Microphone, PermissionStatus::Blocked),
        );
        let gate = PermissionGate::new(provider.clone(), false);

        let err = gate.authorize(&gate.for_recording()).await.unwrap_err();

        assert!(err.needs_settings());
        assert!(provider.prompted().is_empty());
    }

    #[tokio::test]
    async fn refusal_stops_further_requests() {
        let provider = Arc::new(
            MockPermissions::granted()
                .with_check(Capability::Microphone, PermissionStatus::Denied)
                .with_check(Capability::PhoneState, PermissionStatus::Denied),
        );
        let gate = PermissionGate::new(provider.clone(), false);

        let report = gate.request_all(&gate.for_auto_call()).await;

        assert!(!report.all_granted());
        assert_eq!(
            report.first_refused(),
            Some((Capability::Microphone, PermissionStatus::Denied))
        );
        assert_eq!(provider.prompted(), vec![Capability::Microphone]);
    }

    #[tokio::test]
    async fn unavailable_denies() {
        let provider = Arc::new(
            MockPermissions::granted()
                .with_check(Capability::Microphone, PermissionStatus::Unavailable),
        );
        let gate = PermissionGate::new(provider, false);

        let err = gate.authorize(&[Capability::Microphone]).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::PermissionDenied {
                capability: Capability::Microphone,
                status: PermissionStatus::Unavailable
            }
        ));
    }

    #[test]
    fn notifications_required_only_when_enabled() {
        let provider = Arc::new(MockPermissions::granted());
        let quiet = PermissionGate::new(provider.clone(), false);
        let loud = PermissionGate::new(provider, true);

        assert_eq!(
            quiet.for_recording(),
            vec![Capability::Microphone, Capability::PhoneState]
        );
        assert_eq!(
            loud.for_auto_call(),
            vec![
                Capability::Microphone,
                Capability::PhoneState,
                Capability::PostNotifications
            ]
        );
    }

    #[test]
    fn open_settings_delegates() {
        let provider = Arc::new(MockPermissions::granted());
        let gate = PermissionGate::new(provider.clone(), false);
        gate.open_settings().unwrap();
        assert_eq!(provider.settings_opened(), 1);
    }
}
