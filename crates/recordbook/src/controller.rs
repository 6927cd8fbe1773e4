//! Interaction controller.
//!
//! The [`Controller`] owns the record store and the current [`UiState`]. It
//! feeds each [`Action`] through the reducer, applies any resulting store
//! command, and settles submissions. Failures are returned to the caller;
//! a failed save re-opens its form and raises no success notice.

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::notice::{Notice, NoticeBoard, NoticeKind};
use crate::record::RecordDraft;
use crate::state::{reduce, Action, Context, Outcome, StoreCommand, Transition, UiState};
use crate::store::RecordStore;
use crate::validation::Rules;
use crate::view::{self, PageSummary, Pagination, Row, ViewParams};

/// Drives the store from user actions.
#[derive(Debug)]
pub struct Controller {
    store: RecordStore,
    state: UiState,
    params: ViewParams,
    rules: Rules,
    notice_ttl: Option<Duration>,
    notices: NoticeBoard,
    clock: Box<dyn Clock>,
}

impl Controller {
    /// Create a controller with an empty store on wall-clock time.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a controller whose store and notices use `clock`.
    #[must_use]
    pub fn with_clock<C>(config: &Config, clock: C) -> Self
    where
        C: Clock + Clone + 'static,
    {
        Self {
            store: RecordStore::with_clock(clock.clone()),
            state: UiState::default(),
            params: config.view_params(),
            rules: config.rules(),
            notice_ttl: config.notice_ttl(),
            notices: NoticeBoard::default(),
            clock: Box::new(clock),
        }
    }

    /// Append drafts directly, in order, without going through the forms.
    ///
    /// Each draft is still validated. Returns the number of records added.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] for the first invalid draft;
    /// drafts before it have already been added.
    pub fn load_drafts(&mut self, drafts: impl IntoIterator<Item = RecordDraft>) -> Result<usize> {
        let mut added = 0;
        for draft in drafts {
            self.rules.check(&draft)?;
            self.store.append(draft);
            added += 1;
        }
        self.state = self.state.clone().normalized(&self.context());
        debug!(added, "Loaded drafts");
        Ok(added)
    }

    /// Handle one action.
    ///
    /// Returns the notices raised by the action (empty unless a record was
    /// created, updated, or deleted and notices are enabled).
    ///
    /// # Errors
    ///
    /// Returns the reducer's error if the action is not allowed, or the
    /// store's error if the mutation failed. A rejected submit leaves the
    /// form open with every field marked touched.
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<Notice>> {
        let result = reduce(&self.state, action, &self.context());
        let Transition { state, command } = match result {
            Ok(transition) => transition,
            Err(err) => {
                if err.is_validation() {
                    self.state = self.state.clone().with_form_touched();
                }
                warn!(error = %err, "Action rejected");
                return Err(err);
            }
        };

        let Some(command) = command else {
            self.state = state.normalized(&self.context());
            return Ok(Vec::new());
        };

        let removing = matches!(command, StoreCommand::Remove { .. });
        let applied = self.apply(command);

        let next = if removing {
            state
        } else {
            let outcome = if applied.is_ok() {
                Outcome::Succeeded
            } else {
                Outcome::Failed
            };
            reduce(&state, Action::Settled(outcome), &self.context())?.state
        };
        self.state = next.normalized(&self.context());

        let kind = applied?;
        Ok(self.notify(kind).into_iter().collect())
    }

    fn apply(&mut self, command: StoreCommand) -> Result<NoticeKind> {
        match command {
            StoreCommand::Create(draft) => {
                let id = self.store.append(draft);
                info!(%id, "Record created");
                Ok(NoticeKind::Created)
            }
            StoreCommand::Update { id, draft } => {
                if let Err(err) = self.store.update(id, draft) {
                    warn!(%id, error = %err, "Record update failed");
                    return Err(err);
                }
                info!(%id, "Record updated");
                Ok(NoticeKind::Updated)
            }
            StoreCommand::Remove { id } => {
                if let Err(err) = self.store.remove(id) {
                    warn!(%id, error = %err, "Record delete failed");
                    return Err(err);
                }
                info!(%id, "Record deleted");
                Ok(NoticeKind::Deleted)
            }
        }
    }

    fn notify(&mut self, kind: NoticeKind) -> Option<Notice> {
        let ttl = self.notice_ttl?;
        let now = self.clock.now();
        self.notices.prune(now);
        let notice = Notice::new(kind, now, ttl);
        self.notices.post(notice.clone());
        Some(notice)
    }

    fn context(&self) -> Context<'_> {
        Context {
            records: self.store.records(),
            params: self.params,
            rules: self.rules,
        }
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// The record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Rows shown for the current page and search.
    #[must_use]
    pub fn rows(&self) -> Vec<Row<'_>> {
        view::derive_rows(
            self.store.records(),
            self.state.page(),
            self.state.search(),
            self.state.selection(),
            self.params,
        )
    }

    fn paged_total(&self) -> usize {
        view::paged_total(self.store.records(), self.state.search(), self.params)
    }

    /// Pagination controls for the current page.
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.paged_total(), self.state.page(), self.params.page_size)
    }

    /// The "Total: N records" header, if there are records to count.
    #[must_use]
    pub fn summary(&self) -> Option<PageSummary> {
        PageSummary::new(self.paged_total(), self.state.page(), self.params.page_size)
    }

    /// Notices still showing; expired ones are dismissed.
    pub fn active_notices(&mut self) -> Vec<Notice> {
        let now = self.clock.now();
        self.notices.prune(now);
        self.notices.active(now).cloned().collect()
    }
}
