// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Projection of the task store into a display tree.
//!
//! Nothing here touches the store or any UI toolkit: a rendering layer
//! turns [`DisplayTree`] into whatever the surface draws.

use crate::{FilterSelector, MonthView, Task, TaskId, TaskPriority, TaskStatus, TaskStore, filter};

pub const NO_TASKS_TITLE: &str = "No tasks found";
pub const NO_TASKS_HINT: &str = "Right-click a day in the calendar to add a task";
pub const FILTERED_OUT_TITLE: &str = "No tasks match the current filter";
pub const FILTERED_OUT_HINT: &str = "Try a different filter to see more tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Secondary,
}

impl Tone {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Done,
    Overdue,
    Pending,
}

impl CardState {
    pub fn of(status: TaskStatus, is_overdue: bool) -> Self {
        if status == TaskStatus::Done {
            Self::Done
        } else if is_overdue {
            Self::Overdue
        } else {
            Self::Pending
        }
    }

    pub const fn tone(self) -> Tone {
        match self {
            Self::Done => Tone::Success,
            Self::Overdue => Tone::Danger,
            Self::Pending => Tone::Warning,
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Done => "check-circle",
            Self::Overdue => "exclamation-triangle",
            Self::Pending => "clock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: Tone,
    pub icon: &'static str,
}

impl StatusBadge {
    pub fn new(status: TaskStatus, is_overdue: bool) -> Self {
        let state = CardState::of(status, is_overdue);
        Self {
            label: status.label(),
            tone: state.tone(),
            icon: state.icon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityBadge {
    pub priority: TaskPriority,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBadge {
    pub name: String,
    pub color: String,
}

/// The complete/reopen button on a task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub enabled: bool,
    pub busy: bool,
}

impl ToggleControl {
    pub fn new(task_id: TaskId, status: TaskStatus) -> Self {
        Self {
            task_id,
            status,
            enabled: true,
            busy: false,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.status == TaskStatus::Done {
            "Reopen"
        } else {
            "Complete"
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.busy {
            "spinner"
        } else if self.status == TaskStatus::Done {
            "undo"
        } else {
            "check"
        }
    }

    pub fn tone(&self) -> Tone {
        if self.status == TaskStatus::Done {
            Tone::Warning
        } else {
            Tone::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub state: CardState,
    pub status_badge: StatusBadge,
    pub priority_badge: PriorityBadge,
    pub category_badge: Option<CategoryBadge>,
    pub toggle: ToggleControl,
}

impl TaskCard {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description_text().map(str::to_owned),
            due_date: format_day_label(task.due_date.day(), MonthView::from(task.due_date)),
            state: CardState::of(task.status, task.is_overdue),
            status_badge: StatusBadge::new(task.status, task.is_overdue),
            priority_badge: PriorityBadge {
                priority: task.priority,
                label: task.priority.label(),
            },
            category_badge: task.category.as_ref().map(|category| CategoryBadge {
                name: category.name.clone(),
                color: category.color.clone(),
            }),
            toggle: ToggleControl::new(task.id, task.status),
        }
    }

    /// Show `status` locally ahead of the reconciling refresh. The overdue
    /// marker is server-computed, so the patched card never claims it.
    pub fn show_status(&mut self, status: TaskStatus) {
        self.toggle.status = status;
        self.state = CardState::of(status, false);
        self.status_badge = StatusBadge::new(status, false);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySection {
    pub day: u8,
    pub date_label: String,
    pub count: usize,
    pub count_label: String,
    pub cards: Vec<TaskCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoTasks,
    FilteredOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyPlaceholder {
    pub reason: EmptyReason,
    pub icon: &'static str,
    pub title: &'static str,
    pub hint: &'static str,
}

impl EmptyPlaceholder {
    pub const fn new(reason: EmptyReason) -> Self {
        match reason {
            EmptyReason::NoTasks => Self {
                reason,
                icon: "tasks",
                title: NO_TASKS_TITLE,
                hint: NO_TASKS_HINT,
            },
            EmptyReason::FilteredOut => Self {
                reason,
                icon: "filter",
                title: FILTERED_OUT_TITLE,
                hint: FILTERED_OUT_HINT,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayTree {
    Empty(EmptyPlaceholder),
    Days {
        sections: Vec<DaySection>,
        total: usize,
    },
}

impl DisplayTree {
    pub fn total(&self) -> usize {
        match self {
            Self::Empty(_) => 0,
            Self::Days { total, .. } => *total,
        }
    }

    pub fn sections(&self) -> &[DaySection] {
        match self {
            Self::Empty(_) => &[],
            Self::Days { sections, .. } => sections,
        }
    }

    pub fn card(&self, id: TaskId) -> Option<&TaskCard> {
        self.sections()
            .iter()
            .flat_map(|section| section.cards.iter())
            .find(|card| card.id == id)
    }

    pub fn card_mut(&mut self, id: TaskId) -> Option<&mut TaskCard> {
        match self {
            Self::Empty(_) => None,
            Self::Days { sections, .. } => sections
                .iter_mut()
                .flat_map(|section| section.cards.iter_mut())
                .find(|card| card.id == id),
        }
    }
}

pub fn render(store: &TaskStore, selector: FilterSelector, view: MonthView) -> DisplayTree {
    if store.is_empty() {
        return DisplayTree::Empty(EmptyPlaceholder::new(EmptyReason::NoTasks));
    }

    let mut days: Vec<u8> = store.days().collect();
    days.sort_unstable_by(|a, b| b.cmp(a));

    let mut sections = Vec::new();
    let mut total = 0;
    for day in days {
        let kept = filter(store.tasks_on(day), selector);
        if kept.is_empty() {
            continue;
        }
        total += kept.len();
        sections.push(DaySection {
            day,
            date_label: format_day_label(day, view),
            count: kept.len(),
            count_label: format!("{} task(s)", kept.len()),
            cards: kept.iter().map(TaskCard::from_task).collect(),
        });
    }

    if total == 0 {
        return DisplayTree::Empty(EmptyPlaceholder::new(EmptyReason::FilteredOut));
    }
    DisplayTree::Days { sections, total }
}

/// Cards for the day-details list, in the order the backend sent them.
pub fn day_cards(tasks: &[Task]) -> Vec<TaskCard> {
    tasks.iter().map(TaskCard::from_task).collect()
}

pub fn format_day_label(day: u8, view: MonthView) -> String {
    format!("{day:02}/{:02}/{}", view.month_number(), view.year)
}

#[cfg(test)]
mod tests {
    use super::{
        CardState, DisplayTree, EmptyReason, FILTERED_OUT_TITLE, NO_TASKS_TITLE, Tone, render,
    };
    use crate::{
        Category, CategoryId, FilterSelector, MonthView, Task, TaskId, TaskPriority, TaskStatus,
        TaskStore, TasksByDay,
    };
    use time::{Date, Month};

    const MARCH: MonthView = MonthView::new(2026, Month::March);

    fn task(id: i64, day: u8, status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            description: None,
            due_date: Date::from_calendar_date(2026, Month::March, day).expect("valid date"),
            status,
            is_overdue: false,
            priority: TaskPriority::Medium,
            category: None,
        }
    }

    fn store(entries: Vec<(u8, Vec<Task>)>) -> TaskStore {
        TaskStore::from_snapshot(MARCH, entries.into_iter().collect::<TasksByDay>())
    }

    #[test]
    fn pending_filter_keeps_only_matching_day() {
        let store = store(vec![
            (5, vec![task(1, 5, TaskStatus::Pending)]),
            (10, vec![task(2, 10, TaskStatus::Done)]),
        ]);

        let tree = render(&store, FilterSelector::Pending, MARCH);
        assert_eq!(tree.total(), 1);
        let sections = tree.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].day, 5);
        assert_eq!(sections[0].cards[0].id, TaskId::new(1));
    }

    #[test]
    fn sections_run_in_descending_day_order() {
        let store = store(vec![
            (2, vec![task(1, 2, TaskStatus::Pending)]),
            (28, vec![task(2, 28, TaskStatus::Pending)]),
            (14, vec![task(3, 14, TaskStatus::Done), task(4, 14, TaskStatus::Pending)]),
        ]);

        let tree = render(&store, FilterSelector::All, MARCH);
        let days: Vec<u8> = tree.sections().iter().map(|section| section.day).collect();
        assert_eq!(days, vec![28, 14, 2]);
        assert!(days.windows(2).all(|pair| pair[0] > pair[1]));
        assert_eq!(
            tree.total(),
            tree.sections().iter().map(|section| section.count).sum::<usize>()
        );
        assert_eq!(tree.total(), 4);
    }

    #[test]
    fn empty_store_and_filtered_out_use_distinct_placeholders() {
        let empty = render(&TaskStore::new(), FilterSelector::All, MARCH);
        let filtered = render(
            &store(vec![(3, vec![task(1, 3, TaskStatus::Done)])]),
            FilterSelector::Pending,
            MARCH,
        );

        match (&empty, &filtered) {
            (DisplayTree::Empty(none), DisplayTree::Empty(excluded)) => {
                assert_eq!(none.reason, EmptyReason::NoTasks);
                assert_eq!(none.title, NO_TASKS_TITLE);
                assert_eq!(excluded.reason, EmptyReason::FilteredOut);
                assert_eq!(excluded.title, FILTERED_OUT_TITLE);
                assert_ne!(none.title, excluded.title);
            }
            other => panic!("expected two placeholders, got {other:?}"),
        }
    }

    #[test]
    fn day_with_empty_list_reads_as_filtered_out() {
        let tree = render(&store(vec![(4, Vec::new())]), FilterSelector::All, MARCH);
        match tree {
            DisplayTree::Empty(placeholder) => {
                assert_eq!(placeholder.reason, EmptyReason::FilteredOut);
            }
            other => panic!("expected a placeholder, got {other:?}"),
        }
    }

    #[test]
    fn render_is_idempotent_and_leaves_store_alone() {
        let store = store(vec![(7, vec![task(1, 7, TaskStatus::Pending)])]);
        let before = store.clone();
        let first = render(&store, FilterSelector::All, MARCH);
        let second = render(&store, FilterSelector::All, MARCH);
        assert_eq!(first, second);
        assert_eq!(store, before);
    }

    #[test]
    fn card_carries_badges_and_toggle_label() {
        let mut overdue = task(1, 3, TaskStatus::Pending);
        overdue.is_overdue = true;
        overdue.priority = TaskPriority::High;
        overdue.description = Some("bring receipts".to_owned());
        overdue.category = Some(Category {
            id: CategoryId::new(4),
            name: "Finance".to_owned(),
            color: "#0d6efd".to_owned(),
        });
        let store = store(vec![
            (3, vec![overdue]),
            (4, vec![task(2, 4, TaskStatus::Done)]),
        ]);

        let tree = render(&store, FilterSelector::All, MARCH);
        let section = &tree.sections()[1];
        assert_eq!(section.date_label, "03/03/2026");
        assert_eq!(section.count_label, "1 task(s)");

        let card = &section.cards[0];
        assert_eq!(card.state, CardState::Overdue);
        assert_eq!(card.status_badge.tone, Tone::Danger);
        assert_eq!(card.status_badge.icon, "exclamation-triangle");
        assert_eq!(card.priority_badge.label, "High");
        assert_eq!(card.description.as_deref(), Some("bring receipts"));
        let category = card.category_badge.as_ref().expect("category badge");
        assert_eq!(category.color, "#0d6efd");
        assert_eq!(card.toggle.label(), "Complete");
        assert_eq!(card.toggle.tone(), Tone::Success);

        let done = tree.card(TaskId::new(2)).expect("done card");
        assert_eq!(done.toggle.label(), "Reopen");
        assert_eq!(done.toggle.icon(), "undo");
        assert_eq!(done.status_badge.tone, Tone::Success);
        assert!(done.category_badge.is_none());
    }

    #[test]
    fn show_status_flips_badge_and_control() {
        let mut late = task(1, 3, TaskStatus::Pending);
        late.is_overdue = true;
        let mut tree = render(&store(vec![(3, vec![late])]), FilterSelector::All, MARCH);

        let card = tree.card_mut(TaskId::new(1)).expect("card");
        card.show_status(TaskStatus::Done);
        assert_eq!(card.toggle.label(), "Reopen");
        assert_eq!(card.status_badge.tone, Tone::Success);
        assert_eq!(card.status_badge.label, "Done");
        assert_eq!(card.state, CardState::Done);
    }
}
