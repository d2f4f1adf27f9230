//! Fire-and-forget mirror of claims and leads to the external CRM.
//!
//! Mutations enqueue an event after their own write succeeds; a background
//! worker posts it to the configured webhook. Delivery failure is logged and
//! the event dropped — it never affects the originating transaction.

use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrmEvent {
    ClaimSubmitted {
        claim_id: Uuid,
        venue_id: Uuid,
        user_id: Uuid,
        business_email: String,
    },
    ClaimApproved {
        claim_id: Uuid,
        venue_id: Uuid,
        owner_id: Uuid,
    },
    LeadCreated {
        lead_id: Uuid,
        venue_id: Option<Uuid>,
        email: String,
    },
}

#[derive(Clone)]
pub struct CrmSyncService {
    tx: mpsc::UnboundedSender<CrmEvent>,
}

impl CrmSyncService {
    /// Start the delivery worker. With no webhook configured the worker just
    /// drains the queue.
    pub fn spawn(webhook_url: Option<String>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<CrmEvent>();
        tokio::spawn(async move {
            let Some(url) = webhook_url else {
                debug!("no CRM webhook configured, events will be discarded");
                while rx.recv().await.is_some() {}
                return;
            };
            info!("CRM sync worker started");
            let client = Client::new();
            while let Some(event) = rx.recv().await {
                if let Err(e) = deliver(&client, &url, &event).await {
                    error!("CRM webhook delivery failed, dropping event: {}", e);
                }
            }
        });
        Self { tx }
    }

    /// A sender with no worker behind it, for tests and one-off tooling.
    pub fn disabled() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        Self { tx }
    }

    pub fn enqueue(&self, event: CrmEvent) {
        if self.tx.send(event).is_err() {
            debug!("CRM sync worker gone, event dropped");
        }
    }
}

async fn deliver(client: &Client, url: &str, event: &CrmEvent) -> Result<(), reqwest::Error> {
    let post = || async {
        client
            .post(url)
            .json(event)
            .send()
            .await?
            .error_for_status()
            .map(|_| ())
    };
    post.retry(ExponentialBuilder::default().with_max_times(3))
        .await
}
