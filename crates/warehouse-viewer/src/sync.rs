//! Background synchronization with the allocation service.
//!
//! A dedicated thread runs a current-thread tokio runtime: one periodic poll
//! of the statistics endpoint plus a command channel for on-demand work
//! (method changes, order submissions). Results cross back to the render
//! thread over a bounded channel that the event loop drains between frames,
//! so a merge is never observed half-applied.

use api::{AllocParams, AllocationClient, OrderRequest};
use crossbeam_channel::{bounded, Receiver, Sender};
use scene::{Agent, Product, StateUpdate, Warehouse};
use std::time::Duration;
use tokio::sync::mpsc;

/// State handed from the network thread to the render loop.
pub enum SyncEvent {
    Warehouse(Warehouse),
    Products(Vec<Product>),
    Agents(Vec<Agent>),
    Update(StateUpdate),
    OrderAccepted {
        order_id: String,
        update: StateUpdate,
    },
    OrderRejected(String),
}

/// Requests from the UI to the network thread.
pub enum SyncCommand {
    /// Re-poll immediately, e.g. after the allocation method changed.
    Refresh(AllocParams),
    SubmitOrder(OrderRequest),
}

pub struct SyncHandle {
    pub commands: mpsc::UnboundedSender<SyncCommand>,
    pub events: Receiver<SyncEvent>,
}

/// Spawns the sync thread. The thread lives for the process lifetime; it
/// exits only when the command channel closes with the UI.
pub fn spawn(service_url: String, poll_interval: Duration) -> anyhow::Result<SyncHandle> {
    let client = AllocationClient::new(service_url)?;
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = bounded(64);

    std::thread::Builder::new()
        .name("state-sync".into())
        .spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_io()
                .enable_time()
                .build()
                .expect("failed to build sync runtime");
            rt.block_on(run_sync_loop(client, poll_interval, command_rx, event_tx));
            log::info!("Sync thread finished");
        })?;

    Ok(SyncHandle {
        commands: command_tx,
        events: event_rx,
    })
}

/// Reference data that only needs to load once; retried on every poll tick
/// until it does, so a service that comes up late still gets rendered.
#[derive(Default)]
struct Bootstrap {
    warehouse: bool,
    products: bool,
    agents: bool,
}

impl Bootstrap {
    fn done(&self) -> bool {
        self.warehouse && self.products && self.agents
    }
}

async fn run_sync_loop(
    client: AllocationClient,
    poll_interval: Duration,
    mut commands: mpsc::UnboundedReceiver<SyncCommand>,
    events: Sender<SyncEvent>,
) {
    let mut params = AllocParams::default();
    let mut bootstrap = Bootstrap::default();
    let mut interval = tokio::time::interval(poll_interval);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !bootstrap.done() {
                    load_reference_data(&client, &events, &mut bootstrap).await;
                }
                poll_stats(&client, &params, &events).await;
            }
            command = commands.recv() => {
                match command {
                    Some(SyncCommand::Refresh(new_params)) => {
                        params = new_params;
                        poll_stats(&client, &params, &events).await;
                    }
                    Some(SyncCommand::SubmitOrder(order)) => {
                        submit_order(&client, &order, &events).await;
                    }
                    None => break,
                }
            }
        }
    }
}

async fn load_reference_data(
    client: &AllocationClient,
    events: &Sender<SyncEvent>,
    bootstrap: &mut Bootstrap,
) {
    if !bootstrap.warehouse {
        match client.warehouse().await {
            Ok(warehouse) => {
                forward(events, SyncEvent::Warehouse(warehouse));
                bootstrap.warehouse = true;
            }
            Err(e) => log::warn!("Warehouse load failed: {e}"),
        }
    }
    if !bootstrap.products {
        match client.products().await {
            Ok(products) => {
                forward(events, SyncEvent::Products(products));
                bootstrap.products = true;
            }
            Err(e) => log::warn!("Product load failed: {e}"),
        }
    }
    if !bootstrap.agents {
        match client.agents().await {
            Ok(agents) => {
                forward(events, SyncEvent::Agents(agents));
                bootstrap.agents = true;
            }
            Err(e) => log::warn!("Agent load failed: {e}"),
        }
    }
}

async fn poll_stats(client: &AllocationClient, params: &AllocParams, events: &Sender<SyncEvent>) {
    match client.stats(params).await {
        Ok(response) => {
            if let Some(error) = &response.error {
                log::warn!("Allocation service reported: {error}");
                return;
            }
            forward(events, SyncEvent::Update(response.into_update()));
        }
        // No retry backoff: the next scheduled tick tries again.
        Err(e) => log::warn!("Stats poll failed: {e}"),
    }
}

async fn submit_order(client: &AllocationClient, order: &OrderRequest, events: &Sender<SyncEvent>) {
    match client.submit_order(order).await {
        Ok(response) if response.ok => {
            let order_id = response.order_id.clone().unwrap_or_default();
            forward(
                events,
                SyncEvent::OrderAccepted {
                    order_id,
                    update: response.into_update(),
                },
            );
        }
        Ok(response) => {
            let reason = response.error.unwrap_or_else(|| "order rejected".into());
            forward(events, SyncEvent::OrderRejected(reason));
        }
        Err(e) => forward(events, SyncEvent::OrderRejected(format!("network error: {e}"))),
    }
}

/// Drop rather than block if the render thread has not drained the channel.
fn forward(events: &Sender<SyncEvent>, event: SyncEvent) {
    if events.try_send(event).is_err() {
        log::debug!("Dropped sync event (render thread busy)");
    }
}
