//! Request/response bridge between a UI-facing caller and the record
//! store.
//!
//! The bridge consumes inbound requests and drives store operations,
//! publishing results on the matching outbound channel. Each round trip
//! is independent and handled synchronously to completion; there is no
//! batching and no ordering guarantee between different response
//! channels. `save-item` and `show-dialog` are fire-and-forget and
//! produce no response.

use std::sync::mpsc::{Receiver, Sender};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::Result;
use crate::record::Summary;
use crate::store::RecordStore;

/// Inbound request from the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    /// Load the raw value stored under `id`.
    LoadItem { id: String },
    /// Enumerate record summaries.
    LoadNames,
    /// Delete the record under `id`, then push a fresh summary list.
    DeleteItem { id: String },
    /// Store `value` under `id`. Fire-and-forget.
    SaveItem { id: String, value: String },
    /// Trigger the dialog identified by `dialog`. Fire-and-forget.
    ShowDialog { dialog: String },
}

/// Outbound response pushed back to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    /// Raw value for a `load-item` request, or `None` if absent.
    GetItem { value: Option<String> },
    /// Summary list for a `load-names` or `delete-item` request.
    GetNames { names: Vec<Summary> },
}

/// Host-side dialog trigger.
///
/// The identifier is an opaque handle; the host resolves it to a
/// concrete dialog widget. Purely imperative, no return value.
pub trait DialogHost {
    fn show_dialog(&mut self, id: &str);
}

/// Dialog host that ignores every request. For callers with no UI.
#[derive(Debug, Default)]
pub struct NullDialogHost;

impl DialogHost for NullDialogHost {
    fn show_dialog(&mut self, _id: &str) {}
}

/// Outbound channel pair for the channel runner.
///
/// Responses are routed by kind: `load-item` answers go to `items`,
/// summary lists (from `load-names` and `delete-item`) go to `names`.
pub struct Outbound {
    pub items: Sender<Option<String>>,
    pub names: Sender<Vec<Summary>>,
}

/// Adapter driving store operations from inbound requests.
pub struct Bridge<S, D> {
    store: S,
    dialogs: D,
}

impl<S: RecordStore, D: DialogHost> Bridge<S, D> {
    pub fn new(store: S, dialogs: D) -> Self {
        Self { store, dialogs }
    }

    /// The wrapped store, for direct access outside the request cycle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The wrapped dialog host.
    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    /// Handle one request synchronously.
    ///
    /// Returns the response to publish, or `None` for fire-and-forget
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns the underlying store error. A failed round trip leaves
    /// the bridge usable for subsequent requests.
    pub fn handle(&mut self, request: Request) -> Result<Option<Response>> {
        debug!(?request, "handling bridge request");
        match request {
            Request::LoadItem { id } => {
                let value = self.store.get(&id)?;
                Ok(Some(Response::GetItem { value }))
            }
            Request::LoadNames => {
                let names = self.store.list_summaries()?;
                Ok(Some(Response::GetNames { names }))
            }
            Request::DeleteItem { id } => {
                // Delete, then push a full refresh so subscribers never
                // need a separate re-request after a delete.
                self.store.remove(&id)?;
                let names = self.store.list_summaries()?;
                Ok(Some(Response::GetNames { names }))
            }
            Request::SaveItem { id, value } => {
                self.store.set(&id, &value)?;
                Ok(None)
            }
            Request::ShowDialog { dialog } => {
                self.dialogs.show_dialog(&dialog);
                Ok(None)
            }
        }
    }

    /// Drain `requests` until the channel closes, publishing responses
    /// on `outbound`.
    ///
    /// Requests are handled in arrival order. A failed round trip is
    /// logged and the loop continues; the loop also stops cleanly when
    /// an outbound receiver hangs up.
    pub fn run(mut self, requests: Receiver<Request>, outbound: Outbound) {
        for request in requests {
            match self.handle(request) {
                Ok(Some(Response::GetItem { value })) => {
                    if outbound.items.send(value).is_err() {
                        break;
                    }
                }
                Ok(Some(Response::GetNames { names })) => {
                    if outbound.names.send(names).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    error!(error = %err, "bridge request failed");
                }
            }
        }
    }
}
