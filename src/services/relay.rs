//! Notification relay
//!
//! Fans one [`NotificationEvent`] out to the owning user and every
//! administrator over a [`NotificationChannel`]. Each recipient is an
//! independent send bounded by a fixed timeout; failures are logged and
//! counted, never retried and never returned to the caller.
//!
//! Events can be dispatched inline ([`NotificationRelay::dispatch`]) or handed
//! to a bounded background queue ([`NotificationRelay::submit`]) served by a
//! single worker task. The worker runs at most `queue_capacity` dispatches at
//! once and stops pulling from the queue while that many are in flight, so a
//! slow channel fills the queue and `submit` starts dropping events.
//! [`NotificationRelay::shutdown`] closes the queue and gives queued and
//! in-flight dispatches a grace period to finish.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn, error};
use crate::config::NotificationConfig;
use crate::database::LedgerStore;
use crate::models::{DeliverySummary, NotificationEvent, User};
use crate::services::channel::NotificationChannel;
use crate::services::templates::{MessageTemplates, RecipientRole, DEFAULT_LANGUAGE};
use crate::utils::errors::NotificationError;
use crate::utils::logging;

/// One resolved delivery target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: i64,
    pub role: RecipientRole,
    pub language: String,
}

/// Compute the delivery targets of an event.
///
/// The owner (if any) comes first. Administrators follow in the given order,
/// skipping the actor, the owner and duplicates.
pub fn resolve_recipients(owner: Option<(i64, &str)>, admins: &[User], actor_id: i64) -> Vec<Recipient> {
    let mut seen = HashSet::new();
    let mut recipients = Vec::with_capacity(admins.len() + 1);

    if let Some((owner_id, language)) = owner {
        seen.insert(owner_id);
        recipients.push(Recipient {
            user_id: owner_id,
            role: RecipientRole::Owner,
            language: language.to_string(),
        });
    }

    for admin in admins {
        if admin.id == actor_id || !seen.insert(admin.id) {
            continue;
        }
        recipients.push(Recipient {
            user_id: admin.id,
            role: RecipientRole::Admin,
            language: admin.lang.clone(),
        });
    }

    recipients
}

/// Stateless delivery engine shared by the inline and background paths
struct Dispatcher {
    store: Arc<dyn LedgerStore>,
    channel: Arc<dyn NotificationChannel>,
    templates: MessageTemplates,
    send_timeout: Duration,
}

impl Dispatcher {
    async fn dispatch(&self, event: &NotificationEvent) -> DeliverySummary {
        let recipients = self.recipients_for(event).await;
        if recipients.is_empty() {
            debug!(kind = event.kind.as_str(), subject = event.subject_id(), "No recipients for notification");
            return DeliverySummary::default();
        }

        let sends = recipients.iter().map(|recipient| async move {
            let delivered = self.deliver(event, recipient).await;
            (recipient.role, delivered)
        });
        let outcomes = join_all(sends).await;

        let mut summary = DeliverySummary { total: outcomes.len(), ..DeliverySummary::default() };
        for (role, delivered) in outcomes {
            match (role, delivered) {
                (RecipientRole::Owner, true) => summary.owner_notified = true,
                (RecipientRole::Admin, true) => summary.admins_notified += 1,
                (_, false) => {}
            }
        }

        logging::log_delivery_summary(event.kind.as_str(), event.subject_id(), &summary);
        summary
    }

    /// Owner and admin lookups degrade instead of failing the dispatch
    async fn recipients_for(&self, event: &NotificationEvent) -> Vec<Recipient> {
        let owner_language = match event.owner_id {
            Some(owner_id) => match self.store.find_user_by_id(owner_id).await {
                Ok(Some(owner)) => Some(owner.lang),
                Ok(None) => Some(DEFAULT_LANGUAGE.to_string()),
                Err(e) => {
                    warn!(user_id = owner_id, error = %e, "Owner lookup failed, using default language");
                    Some(DEFAULT_LANGUAGE.to_string())
                }
            },
            None => None,
        };

        let admins = match self.store.find_administrators().await {
            Ok(admins) => admins,
            Err(e) => {
                error!(error = %e, subject = event.subject_id(), "Administrator lookup failed, notifying owner only");
                Vec::new()
            }
        };

        let owner = event.owner_id.zip(owner_language.as_deref());
        resolve_recipients(owner, &admins, event.actor_id)
    }

    async fn deliver(&self, event: &NotificationEvent, recipient: &Recipient) -> bool {
        let Some(text) = self.templates.render(event, recipient.role, &recipient.language) else {
            warn!(kind = event.kind.as_str(), role = ?recipient.role, "No template for recipient role");
            return false;
        };

        let result = match tokio::time::timeout(self.send_timeout, self.channel.send(recipient.user_id, &text)).await {
            Ok(result) => result,
            Err(_) => Err(NotificationError::Timeout(self.send_timeout)),
        };

        match result {
            Ok(()) => {
                debug!(recipient = recipient.user_id, subject = event.subject_id(), "Notification delivered");
                true
            }
            Err(e) => {
                logging::log_notification_failure(recipient.user_id, event.kind.as_str(), event.subject_id(), &e);
                false
            }
        }
    }
}

pub struct NotificationRelay {
    dispatcher: Arc<Dispatcher>,
    queue: Mutex<Option<mpsc::Sender<NotificationEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    shutdown_grace: Duration,
}

impl NotificationRelay {
    /// Create the relay and spawn its background worker on the current runtime
    pub fn start(
        store: Arc<dyn LedgerStore>,
        channel: Arc<dyn NotificationChannel>,
        config: &NotificationConfig,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher {
            store,
            channel,
            templates: MessageTemplates::new(),
            send_timeout: config.send_timeout(),
        });

        let capacity = config.queue_capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let worker = tokio::spawn(run_worker(dispatcher.clone(), receiver, capacity));

        info!(
            queue_capacity = config.queue_capacity,
            send_timeout_secs = config.send_timeout_secs,
            "Notification relay started"
        );

        Self {
            dispatcher,
            queue: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            shutdown_grace: config.shutdown_grace(),
        }
    }

    /// Deliver an event and wait for every recipient's outcome
    pub async fn dispatch(&self, event: &NotificationEvent) -> DeliverySummary {
        self.dispatcher.dispatch(event).await
    }

    /// Queue an event for background delivery without waiting.
    ///
    /// Returns `false` if the event was dropped because the queue is full or
    /// the relay is shutting down.
    pub fn submit(&self, event: NotificationEvent) -> bool {
        let queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(sender) = queue.as_ref() else {
            warn!(subject = event.subject_id(), "Relay is shut down, dropping notification");
            return false;
        };

        match sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(subject = event.subject_id(), kind = event.kind.as_str(), "Notification queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!(subject = event.subject_id(), "Notification worker gone, dropping event");
                false
            }
        }
    }

    /// Stop accepting events and drain what is already queued.
    ///
    /// Dispatches still running after the grace period are aborted.
    pub async fn shutdown(&self) {
        let sender = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take();
        drop(sender);

        let worker = self.worker.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take();
        let Some(mut worker) = worker else {
            return;
        };

        info!(grace_secs = self.shutdown_grace.as_secs(), "Draining notification relay");
        match tokio::time::timeout(self.shutdown_grace, &mut worker).await {
            Ok(_) => info!("Notification relay drained"),
            Err(_) => {
                warn!("Notification relay drain timed out, dropping in-flight notifications");
                worker.abort();
            }
        }
    }
}

async fn run_worker(
    dispatcher: Arc<Dispatcher>,
    mut receiver: mpsc::Receiver<NotificationEvent>,
    max_in_flight: usize,
) {
    let mut in_flight = JoinSet::new();

    loop {
        // leave events in the queue until a dispatch slot frees up
        if in_flight.len() >= max_in_flight {
            if let Some(finished) = in_flight.join_next().await {
                log_dispatch_outcome(finished);
            }
            continue;
        }

        let Some(event) = receiver.recv().await else {
            break;
        };

        let dispatcher = dispatcher.clone();
        in_flight.spawn(async move {
            dispatcher.dispatch(&event).await;
        });

        while let Some(finished) = in_flight.try_join_next() {
            log_dispatch_outcome(finished);
        }
    }

    while let Some(finished) = in_flight.join_next().await {
        log_dispatch_outcome(finished);
    }
}

fn log_dispatch_outcome(finished: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        error!(error = %e, "Notification dispatch task failed");
    }
}
