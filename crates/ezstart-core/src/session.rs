//! Effect runtime for the selection state machine
//!
//! [`Session`] owns a [`Selection`], runs the effects it emits on the tokio
//! runtime and feeds the results back as events through an mpsc channel.
//! Every adapter failure is caught here, logged, and degraded to an empty
//! list or a failed task status.

use crate::adapter::{AutomationClient, CloudInventory};
use crate::model::filter_resource_names;
use crate::selection::{Effect, Event, Selection};
use crate::submit::{SubmitRequest, SubmitSettings, SubmitTask, TaskStatus};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Selection state plus the collaborators that execute its effects
pub struct Session {
    selection: Selection,
    inventory: Arc<dyn CloudInventory>,
    automation: Arc<dyn AutomationClient>,
    settings: SubmitSettings,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Session {
    pub fn new(
        inventory: Arc<dyn CloudInventory>,
        automation: Arc<dyn AutomationClient>,
        settings: SubmitSettings,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            selection: Selection::new(),
            inventory,
            automation,
            settings,
            tx,
            rx,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &SubmitSettings {
        &self.settings
    }

    /// Apply an event and spawn the resulting effects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, event: Event) {
        for effect in self.selection.apply(event) {
            self.spawn(effect);
        }
    }

    /// Apply every completion that has already arrived. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn next(&mut self) {
        // `self.tx` keeps the channel open, so `recv` only returns `None` after close.
        if let Some(event) = self.rx.recv().await {
            self.dispatch(event);
        }
    }

    /// Wait until no fetch or submit task is outstanding
    pub async fn settle(&mut self) {
        while self.selection.is_busy() {
            self.next().await;
        }
    }

    fn spawn(&self, effect: Effect) {
        match effect {
            Effect::Submit {
                submission,
                request,
            } => {
                // 2 つのタスクは互いに独立して走る
                for task in [SubmitTask::Secret, SubmitTask::Workflow] {
                    let automation = Arc::clone(&self.automation);
                    let settings = self.settings.clone();
                    let request = request.clone();
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let status =
                            run_submit_task(automation.as_ref(), &settings, &request, task).await;
                        let _ = tx.send(Event::SubmitTaskFinished {
                            submission,
                            task,
                            status,
                        });
                    });
                }
            }
            fetch => {
                let inventory = Arc::clone(&self.inventory);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Some(event) = run_fetch(inventory.as_ref(), fetch).await {
                        let _ = tx.send(event);
                    }
                });
            }
        }
    }
}

/// Execute a fetch effect and turn its result into the completion event
pub async fn run_fetch(inventory: &dyn CloudInventory, effect: Effect) -> Option<Event> {
    match effect {
        Effect::ListSubscriptions { request } => {
            let subscriptions = match inventory.list_subscriptions().await {
                Ok(subscriptions) => {
                    tracing::info!(
                        "Loaded {} subscriptions from {}",
                        subscriptions.len(),
                        inventory.name()
                    );
                    subscriptions
                }
                Err(e) => {
                    tracing::warn!("An error occurred while listing subscriptions: {}", e);
                    Vec::new()
                }
            };
            Some(Event::SubscriptionsLoaded {
                request,
                subscriptions,
            })
        }
        Effect::ListResourceGroups {
            request,
            subscription_id,
        } => {
            let resource_groups = match inventory.list_resource_groups(&subscription_id).await {
                Ok(groups) => {
                    tracing::info!(
                        "Loaded {} resource groups for subscription {}",
                        groups.len(),
                        subscription_id
                    );
                    groups
                }
                Err(e) => {
                    tracing::warn!("An error occurred while listing resource groups: {}", e);
                    Vec::new()
                }
            };
            Some(Event::ResourceGroupsLoaded {
                request,
                resource_groups,
            })
        }
        Effect::ListResourceNames {
            request,
            subscription_id,
            resource_group,
            resource_type,
        } => {
            let resource_names = match inventory
                .list_resources(&subscription_id, &resource_group)
                .await
            {
                Ok(resources) => {
                    let names = filter_resource_names(&resources, &resource_type);
                    tracing::info!(
                        "Resources of type '{}' in resource group '{}': {}",
                        resource_type,
                        resource_group,
                        names.len()
                    );
                    names
                }
                Err(e) => {
                    tracing::warn!("Error fetching resources: {}", e);
                    Vec::new()
                }
            };
            Some(Event::ResourceNamesLoaded {
                request,
                resource_names,
            })
        }
        Effect::Submit { .. } => None,
    }
}

/// Run one of the two Start tasks and report its status
pub async fn run_submit_task(
    automation: &dyn AutomationClient,
    settings: &SubmitSettings,
    request: &SubmitRequest,
    task: SubmitTask,
) -> TaskStatus {
    let result = match task {
        SubmitTask::Secret => {
            automation
                .set_secret(&settings.secret_name, &request.resource_name)
                .await
        }
        SubmitTask::Workflow => {
            automation
                .dispatch_workflow(
                    &settings.workflow_file,
                    &settings.git_ref,
                    &request.workflow_inputs(),
                )
                .await
        }
    };

    match result {
        Ok(()) => TaskStatus::Succeeded,
        Err(e) => {
            tracing::warn!("Submit task {} failed: {}", task, e);
            TaskStatus::Failed(e.to_string())
        }
    }
}
