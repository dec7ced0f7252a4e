// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::time::Duration;
use taskcal_app::{Calendar, Clock, Modal, TaskBackend, TaskId, ToggleOrigin, ToggleOutcome};
use tracing::debug;

use crate::view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ShowMonth,
    Toggle(TaskId),
    Delete(TaskId),
    Day(u8),
    Categories,
}

/// Load the month, perform `action`, let any queued refreshes land and
/// return what should be printed.
///
/// `wait` is called with the time left until the next scheduled refresh.
pub fn execute<B, C>(
    calendar: &mut Calendar<B, C>,
    action: Action,
    mut wait: impl FnMut(Duration),
) -> Result<String>
where
    B: TaskBackend,
    C: Clock,
{
    let view = calendar.state().view;
    calendar
        .refresh()
        .with_context(|| format!("load tasks for {}/{}", view.month_number(), view.year))?;

    let output = match action {
        Action::ShowMonth => None,
        Action::Toggle(id) => {
            toggle(calendar, id)?;
            None
        }
        Action::Delete(id) => {
            calendar
                .delete_task(id)
                .with_context(|| format!("delete task {id}"))?;
            None
        }
        Action::Day(day) => Some(day_details(calendar, day)?),
        Action::Categories => {
            calendar.show_categories().context("load categories")?;
            match &calendar.state().modal {
                Some(Modal::Categories { categories }) => Some(view::render_categories(categories)),
                _ => None,
            }
        }
    };

    settle(calendar, &mut wait);

    Ok(match output {
        Some(output) => output,
        None => {
            let state = calendar.state();
            view::render_month(&calendar.render(), state.view, state.filter)
        }
    })
}

fn toggle<B: TaskBackend, C: Clock>(calendar: &mut Calendar<B, C>, id: TaskId) -> Result<()> {
    let mut tree = calendar.render();
    let view = calendar.state().view;
    let card = tree.card_mut(id).ok_or_else(|| {
        anyhow!(
            "task {id} is not listed for {}/{} with the current filter; pass --month/--year or --filter all",
            view.month_number(),
            view.year
        )
    })?;
    match calendar
        .toggle_status(card, ToggleOrigin::List)
        .with_context(|| format!("toggle task {id}"))?
    {
        ToggleOutcome::Applied => Ok(()),
        ToggleOutcome::Dropped => bail!("another status change is still in flight"),
    }
}

fn day_details<B: TaskBackend, C: Clock>(
    calendar: &mut Calendar<B, C>,
    day: u8,
) -> Result<String> {
    let view = calendar.state().view;
    let date = view
        .date(day)
        .ok_or_else(|| anyhow!("{}/{} has no day {day}", view.month_number(), view.year))?;
    calendar.open_context_menu(date);
    calendar
        .view_day_details()
        .with_context(|| format!("load tasks for day {day}"))?;
    match &calendar.state().modal {
        Some(Modal::DayDetails { title, cards, .. }) => Ok(view::render_day(title, cards)),
        _ => bail!("day details for {day} did not open"),
    }
}

/// Block until every scheduled refresh has run.
pub fn settle<B: TaskBackend, C: Clock>(
    calendar: &mut Calendar<B, C>,
    wait: &mut impl FnMut(Duration),
) {
    while let Some(due_at) = calendar.next_due() {
        let remaining = due_at.saturating_duration_since(calendar.clock().now());
        if !remaining.is_zero() {
            let wait_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
            debug!(wait_ms, "waiting for scheduled refresh");
            wait(remaining);
        }
        calendar.run_due();
    }
}
