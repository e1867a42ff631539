//! Invite Service
//!
//! The orchestration the admin console drives: issue a code, build its
//! review link, hand the SMS to the transport, and record the outcome on
//! the code. The link is returned even when dispatch fails so the admin can
//! pass it on manually; a failed dispatch is terminal for the invite and is
//! retried only by issuing a new one.

use crate::codes::{AccessCodeManager, DispatchOutcome};
use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::types::AccessCode;
use ratify_gateway::{normalize_nz_number, SmsTransport};
use std::sync::Arc;
use tracing::{info, warn};

/// What one invite attempt produced
#[derive(Debug)]
pub struct InviteOutcome {
    /// The issued code, in its post-dispatch state
    pub code: AccessCode,
    /// Review link embedded in the SMS; usable manually on failure
    pub review_link: String,
    /// `DispatchFailure` when the transport rejected the request
    pub failure: Option<CoreError>,
}

impl InviteOutcome {
    /// Whether the transport accepted the request (never delivery)
    #[inline]
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.failure.is_none()
    }
}

/// Issues invites end to end: code, link, SMS, recorded outcome
pub struct InviteService {
    manager: AccessCodeManager,
    transport: Arc<dyn SmsTransport>,
    config: CoreConfig,
}

impl InviteService {
    /// Create an invite service
    #[must_use]
    pub fn new(
        manager: AccessCodeManager,
        transport: Arc<dyn SmsTransport>,
        config: CoreConfig,
    ) -> Self {
        Self {
            manager,
            transport,
            config,
        }
    }

    /// Issue a code and dispatch its invite SMS to `phone_number`
    ///
    /// The number is stored as entered and normalized only for the send.
    ///
    /// # Errors
    /// Store failures only; a transport rejection is reported through
    /// [`InviteOutcome::failure`], with the code left `Failed`.
    pub async fn send_invite(&self, phone_number: &str) -> Result<InviteOutcome, CoreError> {
        let issued = self.manager.create_code(phone_number)?;
        let review_link = self.config.review_link(&issued.code);
        let body = format!("Please review your pharmacy delivery here: {review_link}");
        let destination = normalize_nz_number(phone_number);

        let failure = match self.transport.dispatch(&destination, &body).await {
            Ok(receipt) => {
                self.manager
                    .record_dispatch_result(&issued.code, &DispatchOutcome::from(&receipt))?;
                info!(code = %issued.code, "invite dispatched");
                None
            }
            Err(e) => {
                let reason = e.to_string();
                self.manager.record_dispatch_result(
                    &issued.code,
                    &DispatchOutcome::Failed {
                        reason: reason.clone(),
                    },
                )?;
                warn!(code = %issued.code, reason = %reason, "invite dispatch rejected");
                Some(CoreError::DispatchFailure(reason))
            }
        };

        // Re-read so the caller sees the post-dispatch state.
        let code = self
            .manager
            .get_code(&issued.code)?
            .unwrap_or(issued);
        Ok(InviteOutcome {
            code,
            review_link,
            failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryStatus;
    use async_trait::async_trait;
    use ratify_gateway::{DispatchReceipt, GatewayError};
    use ratify_store::{KeyValueStore, MemoryStore};

    #[derive(Debug)]
    struct AcceptingTransport;

    #[async_trait]
    impl SmsTransport for AcceptingTransport {
        async fn dispatch(
            &self,
            _destination: &str,
            _body: &str,
        ) -> Result<DispatchReceipt, GatewayError> {
            Ok(DispatchReceipt {
                provider_message_id: "HERO-TEST000001".to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct RejectingTransport;

    #[async_trait]
    impl SmsTransport for RejectingTransport {
        async fn dispatch(
            &self,
            _destination: &str,
            _body: &str,
        ) -> Result<DispatchReceipt, GatewayError> {
            Err(GatewayError::NotConfigured)
        }
    }

    fn service(transport: Arc<dyn SmsTransport>) -> (AccessCodeManager, InviteService) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let manager = AccessCodeManager::new(store);
        let service = InviteService::new(manager.clone(), transport, CoreConfig::default());
        (manager, service)
    }

    #[tokio::test]
    async fn accepted_invite_is_sent_with_provider_id() {
        let (_, service) = service(Arc::new(AcceptingTransport));
        let outcome = service.send_invite("021 123 4567").await.unwrap();

        assert!(outcome.accepted());
        assert_eq!(outcome.code.delivery_status, DeliveryStatus::Sent);
        assert_eq!(
            outcome.code.provider_message_id.as_deref(),
            Some("HERO-TEST000001")
        );
        assert!(outcome.review_link.contains(&outcome.code.code));
        // Number at rest stays as entered.
        assert_eq!(outcome.code.phone_number, "021 123 4567");
    }

    #[tokio::test]
    async fn rejected_invite_still_returns_the_link() {
        let (manager, service) = service(Arc::new(RejectingTransport));
        let outcome = service.send_invite("0211234567").await.unwrap();

        assert!(!outcome.accepted());
        assert!(matches!(
            outcome.failure,
            Some(CoreError::DispatchFailure(_))
        ));
        assert_eq!(outcome.code.delivery_status, DeliveryStatus::Failed);
        assert!(outcome.code.provider_message_id.is_none());
        assert!(outcome.review_link.ends_with(&outcome.code.code));

        // The failed code stays on file for the admin's invite history.
        assert_eq!(manager.list_codes().unwrap().len(), 1);
    }
}
