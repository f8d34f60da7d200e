//! Generic resource controller behind every management page
//!
//! A [`ResourceController`] owns the page state: the loaded snapshot, the load
//! state machine (`idle → loading → loaded | error`), the modal state machine
//! (`closed → open → submitting → closed | open`) and the error banner. It only
//! performs synchronous transitions. [`Page`] wraps it in a mutex and drives the
//! remote calls without holding the lock, so a slow backend never blocks other
//! requests on the same page.
//!
//! Every load takes a [`LoadTicket`]; a completion carrying an older ticket than
//! the latest load started is dropped, so overlapping refreshes cannot leave an
//! older response on screen.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    client::ResourceApi,
    error::{AppError, AppResult},
    listing::{self, ListQuery, Listing},
    models::{Entity, RefKind},
    validation::{FieldErrors, FormValidator},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalMode {
    Create,
    Edit(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ModalState<F> {
    Closed,
    Open {
        mode: ModalMode,
        form: F,
        errors: FieldErrors,
        /// Error returned by the last failed submission
        error: Option<String>,
    },
    Submitting {
        mode: ModalMode,
        form: F,
    },
}

/// Identifies one started load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct ResourceController<E: Entity> {
    items: Vec<E>,
    load: LoadState,
    modal: ModalState<E::Form>,
    banner: Option<String>,
    generation: u64,
}

impl<E: Entity> Default for ResourceController<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            load: LoadState::Idle,
            modal: ModalState::Closed,
            banner: None,
            generation: 0,
        }
    }
}

impl<E: Entity> ResourceController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn modal(&self) -> &ModalState<E::Form> {
        &self.modal
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Enter `loading` from any state.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Apply a list response. Returns `false` when the ticket is stale and the
    /// response was discarded.
    ///
    /// A failed load keeps whatever snapshot was already on screen.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: &AppResult<Vec<E>>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                "Discarding stale {} response (ticket {}, latest {})",
                E::RESOURCE,
                ticket.0,
                self.generation
            );
            return false;
        }

        match result {
            Ok(items) => {
                tracing::debug!("Loaded {} {}", items.len(), E::RESOURCE);
                self.items = items.clone();
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!("Loading {} failed: {}", E::RESOURCE, e);
                let message = e.user_message();
                self.banner = Some(message.clone());
                self.load = LoadState::Error(message);
            }
        }
        true
    }

    pub fn open_create(&mut self) -> AppResult<()> {
        self.ensure_not_submitting()?;
        self.modal = ModalState::Open {
            mode: ModalMode::Create,
            form: E::Form::default(),
            errors: FieldErrors::new(),
            error: None,
        };
        Ok(())
    }

    pub fn open_edit(&mut self, id: i32) -> AppResult<()> {
        self.ensure_not_submitting()?;
        let item = self
            .items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("No {} with id {}", E::RESOURCE, id)))?;
        self.modal = ModalState::Open {
            mode: ModalMode::Edit(id),
            form: item.to_form(),
            errors: FieldErrors::new(),
            error: None,
        };
        Ok(())
    }

    /// Replace the form being edited and re-run validation.
    pub fn update_form(&mut self, new_form: E::Form) -> AppResult<FieldErrors> {
        match &mut self.modal {
            ModalState::Open { form, errors, .. } => {
                *errors = new_form.validate();
                *form = new_form;
                Ok(errors.clone())
            }
            ModalState::Submitting { .. } => Err(submitting()),
            ModalState::Closed => Err(AppError::BadRequest("No form is open".to_string())),
        }
    }

    pub fn close_modal(&mut self) -> AppResult<()> {
        self.ensure_not_submitting()?;
        self.modal = ModalState::Closed;
        Ok(())
    }

    /// Validate the open form and enter `submitting`.
    ///
    /// On validation failure the modal stays open with its field errors and no
    /// remote call may be made. A second submission while one is in flight is
    /// rejected.
    pub fn begin_submit(&mut self) -> AppResult<(ModalMode, E::Form)> {
        let (mode, form) = match &mut self.modal {
            ModalState::Closed => {
                return Err(AppError::BadRequest("No form is open".to_string()))
            }
            ModalState::Submitting { .. } => return Err(submitting()),
            ModalState::Open {
                mode, form, errors, ..
            } => {
                let found = form.validate();
                if !found.is_empty() {
                    *errors = found.clone();
                    return Err(AppError::Validation(found));
                }
                (*mode, form.clone())
            }
        };

        self.modal = ModalState::Submitting {
            mode,
            form: form.clone(),
        };
        Ok((mode, form))
    }

    /// Leave `submitting`: close on success, reopen with the error otherwise.
    pub fn finish_submit(&mut self, result: &AppResult<E>) {
        let ModalState::Submitting { mode, form } = &self.modal else {
            return;
        };
        let (mode, form) = (*mode, form.clone());
        self.modal = ModalState::Closed;

        if let Err(e) = result {
            let errors = match e {
                AppError::Validation(fields) => fields.clone(),
                _ => FieldErrors::new(),
            };
            self.modal = ModalState::Open {
                mode,
                form,
                errors,
                error: Some(e.user_message()),
            };
        }
    }

    pub fn set_banner(&mut self, message: String) {
        self.banner = Some(message);
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    fn ensure_not_submitting(&self) -> AppResult<()> {
        match self.modal {
            ModalState::Submitting { .. } => Err(submitting()),
            _ => Ok(()),
        }
    }
}

fn submitting() -> AppError {
    AppError::Conflict("A submission is already in progress".to_string())
}

/// Display names of records other pages have loaded, by kind and id.
#[derive(Debug, Clone, Default)]
pub struct Lookups(HashMap<RefKind, HashMap<i32, String>>);

impl Lookups {
    pub fn insert<E: Entity>(&mut self, kind: RefKind, items: &[E]) {
        let names = items.iter().map(|i| (i.id(), i.display_name())).collect();
        self.0.insert(kind, names);
    }

    /// Name of the referenced record, `#id` when it is not loaded.
    pub fn resolve(&self, kind: RefKind, id: i32) -> String {
        self.0
            .get(&kind)
            .and_then(|names| names.get(&id))
            .cloned()
            .unwrap_or_else(|| format!("#{}", id))
    }
}

/// One rendered table row: the record plus resolved reference names.
#[derive(Debug, Clone, Serialize)]
pub struct Row<E> {
    #[serde(flatten)]
    pub item: E,
    pub labels: BTreeMap<&'static str, String>,
}

/// What a page shows for one request.
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct PageView<E: Entity> {
    pub resource: &'static str,
    pub state: LoadState,
    pub banner: Option<String>,
    /// Whether the page offers a retry action
    pub can_retry: bool,
    pub listing: Listing<Row<E>>,
    pub modal: ModalState<E::Form>,
}

/// A management page: controller state plus the remote operations it calls.
pub struct Page<E: Entity> {
    state: Mutex<ResourceController<E>>,
    api: Arc<dyn ResourceApi<E>>,
}

impl<E: Entity> Page<E> {
    pub fn new(api: Arc<dyn ResourceApi<E>>) -> Self {
        Self {
            state: Mutex::new(ResourceController::new()),
            api,
        }
    }

    /// Load the collection on first display.
    pub async fn mount(&self) {
        let idle = *self.state.lock().await.load_state() == LoadState::Idle;
        if idle {
            self.refresh().await;
        }
    }

    /// Re-enter `loading` and fetch the list.
    pub async fn refresh(&self) {
        // Failures are already on the banner.
        let _ = self.load().await;
    }

    /// Fetch the list, apply it to the page unless a newer load started
    /// meanwhile, and hand the fetched items back to the caller.
    pub async fn load(&self) -> AppResult<Vec<E>> {
        let ticket = self.state.lock().await.begin_load();
        let result = self.api.list().await;
        self.state.lock().await.finish_load(ticket, &result);
        result
    }

    pub async fn snapshot(&self) -> Vec<E> {
        self.state.lock().await.items().to_vec()
    }

    pub async fn view(&self, query: &ListQuery, lookups: &Lookups) -> PageView<E> {
        let state = self.state.lock().await;
        let listing = listing::apply(state.items(), query);
        let rows = listing
            .items
            .into_iter()
            .map(|item| {
                let labels = item
                    .references()
                    .into_iter()
                    .map(|(kind, id)| (kind.label(), lookups.resolve(kind, id)))
                    .collect();
                Row { item, labels }
            })
            .collect();

        PageView {
            resource: E::RESOURCE,
            state: state.load_state().clone(),
            banner: state.banner().map(str::to_string),
            can_retry: matches!(state.load_state(), LoadState::Error(_)),
            listing: Listing {
                items: rows,
                total: listing.total,
                page: listing.page,
                per_page: listing.per_page,
                pages: listing.pages,
            },
            modal: state.modal().clone(),
        }
    }

    pub async fn modal(&self) -> ModalState<E::Form> {
        self.state.lock().await.modal().clone()
    }

    pub async fn open_create(&self) -> AppResult<ModalState<E::Form>> {
        let mut state = self.state.lock().await;
        state.open_create()?;
        Ok(state.modal().clone())
    }

    pub async fn open_edit(&self, id: i32) -> AppResult<ModalState<E::Form>> {
        let mut state = self.state.lock().await;
        state.open_edit(id)?;
        Ok(state.modal().clone())
    }

    pub async fn update_form(&self, form: E::Form) -> AppResult<FieldErrors> {
        self.state.lock().await.update_form(form)
    }

    pub async fn close_modal(&self) -> AppResult<()> {
        self.state.lock().await.close_modal()
    }

    /// Submit the open form: create or update depending on the modal mode,
    /// then reload the list and close the modal.
    pub async fn submit(&self) -> AppResult<E> {
        let (mode, form) = self.state.lock().await.begin_submit()?;

        let result = match mode {
            ModalMode::Create => self.api.create(&form).await,
            ModalMode::Edit(id) => self.api.update(id, &form).await,
        };

        if let Err(e) = &result {
            tracing::warn!("Saving {} failed: {}", E::RESOURCE, e);
            self.state.lock().await.finish_submit(&result);
            return result;
        }

        self.refresh().await;
        self.state.lock().await.finish_submit(&result);
        result
    }

    /// Delete a record once the operator has confirmed.
    pub async fn delete(&self, id: i32, confirmed: bool) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired(format!(
                "Deleting {} #{} must be confirmed",
                E::RESOURCE,
                id
            )));
        }
        self.mutate("delete", self.api.delete(id)).await
    }

    pub async fn toggle_status(&self, id: i32) -> AppResult<E> {
        self.mutate("toggle status of", self.api.toggle_status(id))
            .await
    }

    /// Run a remote mutation; reload on success, raise the banner on failure.
    pub async fn mutate<T>(
        &self,
        action: &str,
        call: impl std::future::Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match call.await {
            Ok(value) => {
                self.refresh().await;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("Failed to {} {}: {}", action, E::RESOURCE, e);
                self.state.lock().await.set_banner(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn dismiss_banner(&self) {
        self.state.lock().await.dismiss_banner();
    }
}
