// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Keeps the task store, the rendered list and the backend in agreement.
//!
//! Mutations go to the backend first. Successful ones patch the visible
//! control right away and queue a full-month refresh a short delay later;
//! the refresh is what makes the store authoritative again. Status toggles
//! are serialized by a single processing flag.

use std::time::{Duration, Instant};

use time::Date;
use tracing::{debug, info, warn};

use crate::{
    AppCommand, AppEvent, AppState, BackendError, Category, CategoryForm, DisplayTree, FetchError,
    FilterSelector, Modal, ModalKind, MonthView, MutationError, Notice, SubmitControl, TaskBackend,
    TaskCard, TaskForm, TaskId, TaskStatus, day_cards, format_iso_date, render,
};

pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_DAY_REFRESH_DELAY: Duration = Duration::from_millis(500);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Delay before the reconciling refresh after a mutation from the list
    /// or a modal form.
    pub refresh_delay: Duration,
    /// Same, for toggles made from the day-details modal.
    pub day_refresh_delay: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            refresh_delay: DEFAULT_REFRESH_DELAY,
            day_refresh_delay: DEFAULT_DAY_REFRESH_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOrigin {
    List,
    DayDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied,
    /// Another toggle was in flight; nothing was sent.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Toggle,
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRefresh {
    pub due_at: Instant,
    pub reason: RefreshReason,
}

/// A toggle that has been sent but not yet answered.
#[must_use = "a pending toggle holds the processing flag until finished"]
#[derive(Debug)]
pub struct PendingToggle {
    task_id: TaskId,
    origin: ToggleOrigin,
    before: TaskCard,
}

impl PendingToggle {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }
}

pub struct Calendar<B, C = SystemClock> {
    backend: B,
    clock: C,
    settings: SyncSettings,
    state: AppState,
    scheduled: Vec<ScheduledRefresh>,
}

impl<B: TaskBackend> Calendar<B, SystemClock> {
    pub fn new(backend: B, view: MonthView, settings: SyncSettings) -> Self {
        Self::with_clock(backend, SystemClock, view, settings)
    }
}

impl<B: TaskBackend, C: Clock> Calendar<B, C> {
    pub fn with_clock(backend: B, clock: C, view: MonthView, settings: SyncSettings) -> Self {
        Self {
            backend,
            clock,
            settings,
            state: AppState::new(view),
            scheduled: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        self.state.dispatch(command)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.state.notices)
    }

    pub fn render(&self) -> DisplayTree {
        render(&self.state.store, self.state.filter, self.state.view)
    }

    /// Change the selector and re-render from the cached snapshot.
    pub fn set_filter(&mut self, filter: FilterSelector) -> DisplayTree {
        self.state.dispatch(AppCommand::SetFilter(filter));
        self.render()
    }

    /// Switch to `view` once its tasks have loaded. On failure both the
    /// viewed month and the snapshot stay as they were.
    pub fn set_month(&mut self, view: MonthView) -> Result<(), FetchError> {
        self.load_month(view)?;
        self.state.dispatch(AppCommand::SetMonth(view));
        Ok(())
    }

    /// Replace the store with the backend's snapshot of the viewed month.
    /// On failure the previous snapshot stays in place.
    pub fn refresh(&mut self) -> Result<(), FetchError> {
        self.load_month(self.state.view)
    }

    fn load_month(&mut self, view: MonthView) -> Result<(), FetchError> {
        debug!(
            month = view.month_number(),
            year = view.year,
            "refreshing month"
        );
        match self.backend.tasks_by_month(view) {
            Ok(days) => {
                self.state.store.replace(view, days);
                debug!(tasks = self.state.store.len(), "month snapshot replaced");
                Ok(())
            }
            Err(error) => {
                warn!(%error, "month refresh failed, keeping previous snapshot");
                let message = match &error {
                    BackendError::Network(_) => crate::UNREACHABLE_MESSAGE,
                    BackendError::Server { .. } => "Could not load the month's tasks",
                };
                self.state.push_notice(Notice::error(message));
                Err(error)
            }
        }
    }

    pub fn is_processing(&self) -> bool {
        self.state.processing
    }

    /// First half of a toggle. Returns `None`, leaving `card` alone, when
    /// another toggle already holds the processing flag.
    pub fn begin_toggle(
        &mut self,
        card: &mut TaskCard,
        origin: ToggleOrigin,
    ) -> Option<PendingToggle> {
        if self.state.processing {
            debug!(task_id = %card.id, "toggle dropped, another one is in flight");
            return None;
        }
        self.state.processing = true;
        let before = card.clone();
        card.toggle.enabled = false;
        card.toggle.busy = true;
        Some(PendingToggle {
            task_id: card.id,
            origin,
            before,
        })
    }

    /// Second half of a toggle: apply the backend's answer to `card`.
    pub fn finish_toggle(
        &mut self,
        pending: PendingToggle,
        card: &mut TaskCard,
        result: Result<String, BackendError>,
    ) -> Result<ToggleOutcome, MutationError> {
        self.state.processing = false;
        match result {
            Ok(message) => {
                let status: TaskStatus = pending.before.toggle.status.toggled();
                card.show_status(status);
                card.toggle.enabled = true;
                card.toggle.busy = false;
                info!(task_id = %pending.task_id, status = status.as_str(), "task status toggled");
                self.state.push_notice(Notice::success(message));
                let delay = match pending.origin {
                    ToggleOrigin::List => self.settings.refresh_delay,
                    ToggleOrigin::DayDetails => self.settings.day_refresh_delay,
                };
                self.schedule_refresh(delay, RefreshReason::Toggle);
                Ok(ToggleOutcome::Applied)
            }
            Err(error) => {
                warn!(task_id = %pending.task_id, %error, "status toggle failed");
                *card = pending.before;
                self.state
                    .push_notice(Notice::error(error.user_message("Could not change the status")));
                Err(error.into())
            }
        }
    }

    /// Toggle done/pending for the task behind `card`.
    pub fn toggle_status(
        &mut self,
        card: &mut TaskCard,
        origin: ToggleOrigin,
    ) -> Result<ToggleOutcome, MutationError> {
        let Some(pending) = self.begin_toggle(card, origin) else {
            return Ok(ToggleOutcome::Dropped);
        };
        let result = self.backend.toggle_status(pending.task_id);
        self.finish_toggle(pending, card, result)
    }

    /// Toggle a task listed in the open day-details modal. A task that is
    /// not listed there is reported as dropped.
    pub fn toggle_day_task(&mut self, id: TaskId) -> Result<ToggleOutcome, MutationError> {
        let Some(mut card) = self.day_card(id).cloned() else {
            return Ok(ToggleOutcome::Dropped);
        };
        let outcome = self.toggle_status(&mut card, ToggleOrigin::DayDetails);
        if let Some(Modal::DayDetails { cards, .. }) = &mut self.state.modal
            && let Some(slot) = cards.iter_mut().find(|slot| slot.id == id)
        {
            *slot = card;
        }
        outcome
    }

    fn day_card(&self, id: TaskId) -> Option<&TaskCard> {
        match &self.state.modal {
            Some(Modal::DayDetails { cards, .. }) => cards.iter().find(|card| card.id == id),
            _ => None,
        }
    }

    pub fn submit_create(
        &mut self,
        form: &TaskForm,
        control: &mut SubmitControl,
    ) -> Result<(), MutationError> {
        self.submit_form(
            ModalKind::CreateTask,
            RefreshReason::Create,
            form,
            control,
            |backend, form| backend.create_task(form),
        )
    }

    pub fn submit_edit(
        &mut self,
        id: TaskId,
        form: &TaskForm,
        control: &mut SubmitControl,
    ) -> Result<(), MutationError> {
        self.submit_form(
            ModalKind::EditTask,
            RefreshReason::Edit,
            form,
            control,
            |backend, form| backend.edit_task(id, form),
        )
    }

    fn submit_form(
        &mut self,
        modal: ModalKind,
        reason: RefreshReason,
        form: &TaskForm,
        control: &mut SubmitControl,
        send: impl FnOnce(&mut B, &TaskForm) -> Result<String, BackendError>,
    ) -> Result<(), MutationError> {
        if let Err(error) = form.validate() {
            self.state.push_notice(Notice::error(error.to_string()));
            return Err(error.into());
        }

        control.begin();
        match send(&mut self.backend, form) {
            Ok(message) => {
                info!(?reason, title = form.title.trim(), "task saved");
                self.state.close_modal(modal);
                self.state.push_notice(Notice::success(message));
                control.restore();
                self.schedule_refresh(self.settings.refresh_delay, reason);
                Ok(())
            }
            Err(error) => {
                warn!(?reason, %error, "task save failed");
                self.state
                    .push_notice(Notice::error(error.user_message("Could not save the task")));
                control.restore();
                Err(error.into())
            }
        }
    }

    /// Delete a task. Asking the user to confirm is the caller's job.
    pub fn delete_task(&mut self, id: TaskId) -> Result<(), MutationError> {
        match self.backend.delete_task(id) {
            Ok(message) => {
                info!(task_id = %id, "task deleted");
                self.state.close_modal(ModalKind::TaskDetails);
                self.state.push_notice(Notice::success(message));
                self.schedule_refresh(self.settings.refresh_delay, RefreshReason::Delete);
                Ok(())
            }
            Err(error) => {
                warn!(task_id = %id, %error, "task delete failed");
                self.state
                    .push_notice(Notice::error(error.user_message("Could not delete the task")));
                Err(error.into())
            }
        }
    }

    pub fn schedule_refresh(&mut self, delay: Duration, reason: RefreshReason) {
        let due_at = self.clock.now() + delay;
        // Keep deadline order; equal deadlines stay in scheduling order.
        let index = self
            .scheduled
            .partition_point(|scheduled| scheduled.due_at <= due_at);
        self.scheduled
            .insert(index, ScheduledRefresh { due_at, reason });
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        debug!(?reason, delay_ms, "refresh scheduled");
    }

    pub fn scheduled(&self) -> &[ScheduledRefresh] {
        &self.scheduled
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduled.first().map(|scheduled| scheduled.due_at)
    }

    /// Run every scheduled refresh whose deadline has passed, oldest first.
    /// Failures become notices; the count of refreshes attempted is returned.
    pub fn run_due(&mut self) -> usize {
        let now = self.clock.now();
        let ready = self
            .scheduled
            .partition_point(|scheduled| scheduled.due_at <= now);
        let due: Vec<ScheduledRefresh> = self.scheduled.drain(..ready).collect();
        for scheduled in &due {
            debug!(reason = ?scheduled.reason, "running scheduled refresh");
            let _ = self.refresh();
        }
        due.len()
    }

    pub fn open_context_menu(&mut self, date: Date) -> Vec<AppEvent> {
        self.state.dispatch(AppCommand::OpenContextMenu(date))
    }

    pub fn hide_context_menu(&mut self) -> Vec<AppEvent> {
        self.state.dispatch(AppCommand::HideContextMenu)
    }

    /// Open the create form for the selected day. Returns false when no day
    /// has been picked from the context menu.
    pub fn show_create_modal(&mut self) -> bool {
        let opened = match self.state.selected_date {
            Some(date) => {
                let categories = self.load_categories().unwrap_or_default();
                debug!(due_date = %format_iso_date(date), "opening create form");
                self.state.open_modal(Modal::CreateTask {
                    form: TaskForm::for_date(date),
                    categories,
                });
                true
            }
            None => false,
        };
        self.hide_context_menu();
        opened
    }

    /// Open the day-details list for the selected day.
    pub fn view_day_details(&mut self) -> Result<bool, BackendError> {
        let Some(date) = self.state.selected_date else {
            self.hide_context_menu();
            return Ok(false);
        };
        self.hide_context_menu();
        match self.backend.day_details(date) {
            Ok(tasks) => {
                self.state.open_modal(Modal::DayDetails {
                    date,
                    title: format!(
                        "Tasks for {}/{}/{}",
                        date.day(),
                        u8::from(date.month()),
                        date.year()
                    ),
                    cards: day_cards(&tasks),
                });
                Ok(true)
            }
            Err(error) => {
                warn!(%error, "day details failed to load");
                let message = error.user_message("Could not load the day's tasks");
                self.state.push_notice(Notice::error(message));
                Err(error)
            }
        }
    }

    pub fn open_task_details(&mut self, id: TaskId) -> Result<(), BackendError> {
        match self.backend.task(id) {
            Ok(task) => {
                self.state.open_modal(Modal::TaskDetails { task });
                Ok(())
            }
            Err(error) => {
                warn!(task_id = %id, %error, "task details failed to load");
                self.state.push_notice(Notice::error("Could not load the task details"));
                Err(error)
            }
        }
    }

    /// Open the edit form prefilled from the backend's copy of the task.
    /// Replaces a details modal if one is open.
    pub fn open_edit(&mut self, id: TaskId) -> Result<(), BackendError> {
        let task = match self.backend.task(id) {
            Ok(task) => task,
            Err(error) => {
                warn!(task_id = %id, %error, "task failed to load for editing");
                self.state
                    .push_notice(Notice::error("Could not load the task for editing"));
                return Err(error);
            }
        };
        let categories = self.backend.categories().unwrap_or_else(|error| {
            debug!(%error, "categories unavailable for edit form");
            Vec::new()
        });
        self.state.open_modal(Modal::EditTask {
            task_id: id,
            form: TaskForm::from_task(&task),
            categories,
        });
        Ok(())
    }

    pub fn load_categories(&mut self) -> Result<Vec<Category>, BackendError> {
        self.backend.categories().inspect_err(|error| {
            warn!(%error, "categories failed to load");
            self.state.push_notice(Notice::error("Could not load categories"));
        })
    }

    pub fn show_categories(&mut self) -> Result<(), BackendError> {
        let categories = self.load_categories()?;
        self.state.open_modal(Modal::Categories { categories });
        Ok(())
    }

    pub fn show_new_category_modal(&mut self) -> Vec<AppEvent> {
        self.state.dispatch(AppCommand::OpenNewCategoryModal)
    }

    /// Create a category, then swap its form for the reloaded category list.
    pub fn create_category(&mut self, form: &CategoryForm) -> Result<Category, MutationError> {
        if let Err(error) = form.validate() {
            self.state.push_notice(Notice::error(error.to_string()));
            return Err(error.into());
        }
        match self.backend.create_category(form) {
            Ok(category) => {
                info!(name = %category.name, "category created");
                self.state.close_modal(ModalKind::NewCategory);
                self.state.push_notice(Notice::success("Category created"));
                if let Ok(categories) = self.load_categories() {
                    self.state.open_modal(Modal::Categories { categories });
                }
                Ok(category)
            }
            Err(error) => {
                warn!(%error, "category create failed");
                let message = error.user_message("Could not create the category");
                self.state.push_notice(Notice::error(message));
                Err(error.into())
            }
        }
    }
}
