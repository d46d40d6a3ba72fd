use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::api::{ApiClient, FetchError};
use crate::loader::Ticket;
use crate::types::{AppEvent, LoaderSlot, Payload};

/// One remote query shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    All { limit: Option<u32> },
    ById(u32),
    ByName(String),
    ByCategory(String),
    ByGeneration { generation: u32, cap: u32 },
    Categories,
    Search { query: String, limit: usize },
    ManyById(Vec<u32>),
}

#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub slot: LoaderSlot,
    pub ticket: Ticket,
    pub query: Query,
}

pub async fn execute(client: &ApiClient, query: Query) -> Result<Payload, FetchError> {
    match query {
        Query::All { limit } => client.fetch_all(limit).await.map(Payload::Creatures),
        Query::ById(id) => client.fetch_by_id(id).await.map(Payload::Creature),
        Query::ByName(name) => client
            .fetch_by_name(&name)
            .await
            .map(|c| Payload::Creature(Some(c))),
        Query::ByCategory(name) => client.fetch_by_category(&name).await.map(Payload::Creatures),
        Query::ByGeneration { generation, cap } => client
            .fetch_by_generation(generation, cap)
            .await
            .map(Payload::Creatures),
        Query::Categories => client.fetch_categories().await.map(Payload::Categories),
        Query::Search { query, limit } => client.search(&query, limit).await.map(Payload::Creatures),
        Query::ManyById(ids) => client.fetch_many_by_id(&ids).await.map(Payload::Creatures),
    }
}

/// Background task serving fetch requests from the UI loop.
///
/// Each request runs on its own task so a slow query never delays the others;
/// completions go back over `event_tx` tagged with the request's slot and
/// ticket. The network transfer of a superseded request is not aborted, the
/// loader just ignores its completion.
pub async fn run_fetcher(
    client: ApiClient,
    mut fetch_rx: UnboundedReceiver<FetchRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    log::info!("[fetcher] serving requests against {}", client.base_url());

    while let Some(req) = fetch_rx.recv().await {
        log::debug!("[fetcher] {:?} {:?} {:?}", req.slot, req.ticket, req.query);
        let client = client.clone();
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let result = execute(&client, req.query).await;
            if let Err(e) = &result {
                log::warn!("[fetcher] {:?} failed: {e}", req.slot);
            }
            let ev = AppEvent::Loaded {
                slot: req.slot,
                ticket: req.ticket,
                result,
            };
            if event_tx.send(ev).is_err() {
                log::debug!("[fetcher] UI loop gone, dropping completion");
            }
        });
    }

    log::info!("[fetcher] request channel closed, shutting down");
}
