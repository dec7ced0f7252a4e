// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::{MonthView, Task, TaskId};

/// Tasks of one month keyed by day of month, exactly as the backend
/// returned them.
pub type TasksByDay = BTreeMap<u8, Vec<Task>>;

/// Snapshot of the viewed month. Only ever replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    view: Option<MonthView>,
    days: TasksByDay,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(view: MonthView, days: TasksByDay) -> Self {
        Self {
            view: Some(view),
            days,
        }
    }

    /// Swap in a fresh backend snapshot, dropping the previous one.
    pub fn replace(&mut self, view: MonthView, days: TasksByDay) {
        self.view = Some(view);
        self.days = days;
    }

    /// Month the current snapshot was fetched for, if any refresh has landed.
    pub fn view(&self) -> Option<MonthView> {
        self.view
    }

    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.days.keys().copied()
    }

    pub fn tasks_on(&self, day: u8) -> &[Task] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.days.values().flatten().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// True when the backend returned no days at all. A day mapped to an
    /// empty list still counts as content.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskStore, TasksByDay};
    use crate::{MonthView, Task, TaskId, TaskPriority, TaskStatus};
    use time::{Date, Month};

    fn task(id: i64, day: u8) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            description: None,
            due_date: Date::from_calendar_date(2026, Month::March, day).expect("valid date"),
            status: TaskStatus::Pending,
            is_overdue: false,
            priority: TaskPriority::Medium,
            category: None,
        }
    }

    #[test]
    fn replace_discards_previous_snapshot() {
        let march = MonthView::new(2026, Month::March);
        let mut first = TasksByDay::new();
        first.insert(3, vec![task(1, 3)]);
        first.insert(9, vec![task(2, 9)]);
        let mut store = TaskStore::from_snapshot(march, first);
        assert_eq!(store.len(), 2);

        let mut second = TasksByDay::new();
        second.insert(12, vec![task(3, 12)]);
        store.replace(march, second);

        assert_eq!(store.days().collect::<Vec<_>>(), vec![12]);
        assert!(store.find(TaskId::new(1)).is_none());
        assert!(store.find(TaskId::new(3)).is_some());
        assert!(store.tasks_on(3).is_empty());
    }

    #[test]
    fn empty_day_lists_still_count_as_content() {
        let mut days = TasksByDay::new();
        days.insert(4, Vec::new());
        let store = TaskStore::from_snapshot(MonthView::new(2026, Month::March), days);
        assert!(!store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(TaskStore::new().is_empty());
        assert!(TaskStore::new().view().is_none());
    }
}
