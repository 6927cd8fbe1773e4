//! Interaction state machine.
//!
//! [`UiState`] is an immutable value; [`reduce`] computes the next state for
//! an [`Action`] without touching the store. Store changes are returned as a
//! [`StoreCommand`] for the controller to apply.
//!
//! ```text
//! Idle --OpenAdd--> AddModalOpen --Submit--> Submitting --Settled--> Idle
//! Idle --OpenEdit-> EditModalOpen --Submit--> Submitting --Settled--> Idle
//! Idle --RequestDelete--> ConfirmingDelete --Confirm/Cancel--> Idle
//! ```

use tracing::trace;

use crate::error::{Error, Result};
use crate::form::FormState;
use crate::record::{Record, RecordDraft, RecordId};
use crate::validation::{Field, Rules};
use crate::view::{self, PageNav, ViewParams};

/// A submission waiting for its store command to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// Creating a record from the add form.
    Create {
        /// The submitted form.
        form: FormState,
    },
    /// Updating a record from the edit form.
    Update {
        /// The record being edited.
        target: RecordId,
        /// The submitted form.
        form: FormState,
    },
}

/// Which modal, if any, is in front of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Just the table.
    #[default]
    Idle,
    /// The add form is open.
    AddModalOpen {
        /// Form contents.
        form: FormState,
    },
    /// The edit form is open for `target`.
    EditModalOpen {
        /// The record being edited.
        target: RecordId,
        /// Form contents, pre-filled from the record.
        form: FormState,
    },
    /// A form was submitted and its store command is being applied.
    Submitting {
        /// What is being saved.
        pending: Pending,
    },
    /// The delete confirmation prompt is showing.
    ConfirmingDelete {
        /// The record to delete.
        target: RecordId,
    },
}

impl Mode {
    /// Short name used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AddModalOpen { .. } => "adding",
            Self::EditModalOpen { .. } => "editing",
            Self::Submitting { .. } => "submitting",
            Self::ConfirmingDelete { .. } => "confirming delete",
        }
    }

    /// The open form, if a modal with a form is showing.
    #[must_use]
    pub fn form(&self) -> Option<&FormState> {
        match self {
            Self::AddModalOpen { form } | Self::EditModalOpen { form, .. } => Some(form),
            _ => None,
        }
    }
}

/// Result of applying a store command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The store accepted the change.
    Succeeded,
    /// The store rejected the change.
    Failed,
}

/// User and internal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the add form.
    OpenAdd,
    /// Open the edit form for the selected record.
    OpenEdit,
    /// Type into a form field.
    SetField {
        /// The field edited.
        field: Field,
        /// Its new value.
        value: String,
    },
    /// Dismiss the open form without saving.
    CloseModal,
    /// Submit the open form.
    Submit,
    /// The store command of a submission has been applied.
    Settled(Outcome),
    /// Ask to delete the selected record.
    RequestDelete,
    /// Answer "yes" to the delete prompt.
    ConfirmDelete,
    /// Answer "no" to the delete prompt.
    CancelDelete,
    /// Toggle selection of the row at a page-relative offset.
    ToggleRow(usize),
    /// Change the search text.
    SetSearch(String),
    /// Use the pagination controls.
    Navigate(PageNav),
}

impl Action {
    /// Short name used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAdd => "add",
            Self::OpenEdit => "edit",
            Self::SetField { .. } => "edit a field",
            Self::CloseModal => "close the form",
            Self::Submit => "submit",
            Self::Settled(_) => "settle a submission",
            Self::RequestDelete => "delete",
            Self::ConfirmDelete => "confirm delete",
            Self::CancelDelete => "cancel delete",
            Self::ToggleRow(_) => "select a row",
            Self::SetSearch(_) => "search",
            Self::Navigate(_) => "change page",
        }
    }
}

/// A store mutation requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Append a new record.
    Create(RecordDraft),
    /// Rewrite an existing record.
    Update {
        /// Record to rewrite.
        id: RecordId,
        /// New field values.
        draft: RecordDraft,
    },
    /// Delete a record.
    Remove {
        /// Record to delete.
        id: RecordId,
    },
}

/// What the reducer sees of the world besides the state itself.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Store contents, newest first.
    pub records: &'a [Record],
    /// Page size and search scope.
    pub params: ViewParams,
    /// Form validation rules.
    pub rules: Rules,
}

impl Context<'_> {
    fn total_pages(&self, search: &str) -> usize {
        let total = view::paged_total(self.records, search, self.params);
        view::page_count(total, self.params.page_size)
    }
}

/// Complete interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    mode: Mode,
    selection: Option<RecordId>,
    page: usize,
    search: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::Idle,
            selection: None,
            page: 1,
            search: String::new(),
        }
    }
}

/// The next state and the store change it requires, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the action.
    pub state: UiState,
    /// Store mutation to apply.
    pub command: Option<StoreCommand>,
}

impl Transition {
    fn to(state: UiState) -> Self {
        Self {
            state,
            command: None,
        }
    }

    fn with_command(state: UiState, command: StoreCommand) -> Self {
        Self {
            state,
            command: Some(command),
        }
    }
}

impl UiState {
    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Selected record, if any.
    #[must_use]
    pub fn selection(&self) -> Option<RecordId> {
        self.selection
    }

    /// Current page, 1-based.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current search text, as typed.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Whether the edit button is enabled.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.mode == Mode::Idle && self.selection.is_some()
    }

    /// Whether the delete button is enabled.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.can_edit()
    }

    fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    /// This state with every field of the open form marked touched.
    #[must_use]
    pub fn with_form_touched(self) -> Self {
        let mode = match self.mode {
            Mode::AddModalOpen { form } => Mode::AddModalOpen {
                form: form.touched_all(),
            },
            Mode::EditModalOpen { target, form } => Mode::EditModalOpen {
                target,
                form: form.touched_all(),
            },
            other => other,
        };
        Self { mode, ..self }
    }

    /// Bring page and selection back in line with the store.
    ///
    /// The page is clamped into range and a selection whose record no
    /// longer exists is dropped.
    #[must_use]
    pub fn normalized(self, ctx: &Context<'_>) -> Self {
        let page = view::clamp_page(self.page, ctx.total_pages(&self.search));
        let selection = self
            .selection
            .filter(|id| ctx.records.iter().any(|r| r.id == *id));
        Self {
            selection,
            page,
            ..self
        }
    }
}

/// Compute the transition for `action` from `state`.
///
/// Search and navigation are accepted in every mode; everything else is
/// handled by the current mode.
///
/// # Errors
///
/// - [`Error::InvalidTransition`] if `action` is not allowed in the current
///   mode.
/// - [`Error::NoSelection`] for edit/delete without a selected row.
/// - [`Error::RecordNotFound`] if the selected record has disappeared.
/// - [`Error::RowOutOfRange`] when toggling a row that is not shown.
/// - [`Error::Validation`] or [`Error::FormUnchanged`] when submitting a
///   form that cannot be saved.
pub fn reduce(state: &UiState, action: Action, ctx: &Context<'_>) -> Result<Transition> {
    trace!(mode = state.mode.name(), action = action.name(), "Reducing");
    let rejected = Error::invalid_transition(state.mode.name(), action.name());
    let next = state.clone();

    let transition = match action {
        Action::SetSearch(search) => Some(Transition::to(UiState { search, ..next })),
        Action::Navigate(nav) => {
            let page = nav.resolve(state.page, ctx.total_pages(&state.search));
            Some(Transition::to(UiState { page, ..next }))
        }
        action => match &state.mode {
            Mode::Idle => reduce_idle(next, action, ctx)?,
            Mode::AddModalOpen { .. } | Mode::EditModalOpen { .. } => reduce_form(next, action)?,
            Mode::Submitting { pending } => reduce_submitting(next, pending, action),
            Mode::ConfirmingDelete { target } => reduce_confirming(next, *target, action),
        },
    };
    transition.ok_or(rejected)
}

fn reduce_idle(state: UiState, action: Action, ctx: &Context<'_>) -> Result<Option<Transition>> {
    let transition = match action {
        Action::OpenAdd => Transition::to(state.with_mode(Mode::AddModalOpen {
            form: FormState::empty(ctx.rules),
        })),
        Action::OpenEdit => {
            let target = state.selection.ok_or(Error::NoSelection)?;
            let record = ctx
                .records
                .iter()
                .find(|r| r.id == target)
                .ok_or(Error::RecordNotFound { id: target })?;
            let form = FormState::prefilled(&record.draft(), ctx.rules);
            Transition::to(state.with_mode(Mode::EditModalOpen { target, form }))
        }
        Action::RequestDelete => {
            let target = state.selection.ok_or(Error::NoSelection)?;
            Transition::to(state.with_mode(Mode::ConfirmingDelete { target }))
        }
        Action::ToggleRow(offset) => toggle_row(state, offset, ctx)?,
        _ => return Ok(None),
    };
    Ok(Some(transition))
}

/// Only rows actually shown can be toggled; a row hidden by the search is
/// out of range.
fn toggle_row(state: UiState, offset: usize, ctx: &Context<'_>) -> Result<Transition> {
    let record = view::record_at(ctx.records, state.page, offset, &state.search, ctx.params)
        .ok_or_else(|| Error::RowOutOfRange {
            row: offset,
            visible: view::derive_rows(ctx.records, state.page, &state.search, None, ctx.params)
                .len(),
        })?;
    let selection = if state.selection == Some(record.id) {
        None
    } else {
        Some(record.id)
    };
    Ok(Transition::to(UiState { selection, ..state }))
}

fn reduce_form(state: UiState, action: Action) -> Result<Option<Transition>> {
    let Some(form) = state.mode.form().cloned() else {
        return Ok(None);
    };
    let target = match state.mode {
        Mode::EditModalOpen { target, .. } => Some(target),
        _ => None,
    };
    let reopen = |form: FormState| match target {
        Some(target) => Mode::EditModalOpen { target, form },
        None => Mode::AddModalOpen { form },
    };

    let transition = match action {
        Action::SetField { field, value } => {
            Transition::to(state.with_mode(reopen(form.with_value(field, value))))
        }
        Action::CloseModal => Transition::to(state.with_mode(Mode::Idle)),
        Action::Submit => {
            check_submittable(&form)?;
            let (command, pending) = match target {
                Some(target) => (
                    StoreCommand::Update {
                        id: target,
                        draft: form.draft(),
                    },
                    Pending::Update { target, form },
                ),
                None => (StoreCommand::Create(form.draft()), Pending::Create { form }),
            };
            Transition::with_command(state.with_mode(Mode::Submitting { pending }), command)
        }
        _ => return Ok(None),
    };
    Ok(Some(transition))
}

/// A successful create clears the selection; a failure reopens the form
/// with the submitted values.
fn reduce_submitting(state: UiState, pending: &Pending, action: Action) -> Option<Transition> {
    let Action::Settled(outcome) = action else {
        return None;
    };
    let settled = match (outcome, pending) {
        (Outcome::Succeeded, Pending::Create { .. }) => UiState {
            selection: None,
            ..state.with_mode(Mode::Idle)
        },
        (Outcome::Succeeded, Pending::Update { .. }) => state.with_mode(Mode::Idle),
        (Outcome::Failed, Pending::Create { form }) => {
            state.with_mode(Mode::AddModalOpen { form: form.clone() })
        }
        (Outcome::Failed, Pending::Update { target, form }) => {
            state.with_mode(Mode::EditModalOpen {
                target: *target,
                form: form.clone(),
            })
        }
    };
    Some(Transition::to(settled))
}

fn reduce_confirming(state: UiState, target: RecordId, action: Action) -> Option<Transition> {
    match action {
        Action::ConfirmDelete => Some(Transition::with_command(
            UiState {
                selection: None,
                ..state.with_mode(Mode::Idle)
            },
            StoreCommand::Remove { id: target },
        )),
        Action::CancelDelete => Some(Transition::to(state.with_mode(Mode::Idle))),
        _ => None,
    }
}

fn check_submittable(form: &FormState) -> Result<()> {
    let errors = form.errors();
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }
    if !form.is_dirty() {
        return Err(Error::FormUnchanged);
    }
    Ok(())
}
