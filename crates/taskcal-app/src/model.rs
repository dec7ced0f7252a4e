// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};

use crate::ids::*;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Done, Self::Cancelled];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Status the backend assigns on a toggle: done reopens to pending,
    /// anything else completes.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Done => Self::Pending,
            Self::Pending | Self::InProgress | Self::Cancelled => Self::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "iso_date")]
    pub due_date: Date,
    pub status: TaskStatus,
    #[serde(default)]
    pub is_overdue: bool,
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Task {
    /// Description, treating a blank string the same as a missing one.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// The month whose tasks are loaded into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: Month,
}

impl MonthView {
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn from_numbers(month: u8, year: i32) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        Some(Self { year, month })
    }

    pub fn current() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub const fn month_number(self) -> u8 {
        self.month as u8
    }

    pub fn date(self, day: u8) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, day).ok()
    }

    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl From<Date> for MonthView {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// `YYYY-MM-DD`, the form and wire format for due dates.
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::{MonthView, Task, TaskPriority, TaskStatus, format_iso_date};
    use time::{Date, Month};

    #[test]
    fn toggle_reopens_done_and_completes_everything_else() {
        assert_eq!(TaskStatus::Done.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Done);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Done);
        assert_eq!(TaskStatus::Cancelled.toggled(), TaskStatus::Done);
    }

    #[test]
    fn status_and_priority_names_parse_back() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        for priority in TaskPriority::ALL {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(TaskStatus::parse("finished"), None);
    }

    #[test]
    fn task_decodes_from_backend_json() {
        let task: Task = serde_json::from_str(
            r##"{
                "id": 7,
                "title": "Pay rent",
                "description": "",
                "due_date": "2026-03-05",
                "status": "in_progress",
                "is_overdue": true,
                "priority": "high",
                "category": {"id": 2, "name": "Home", "color": "#ff0000"}
            }"##,
        )
        .expect("decode task");

        assert_eq!(task.id.get(), 7);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(
            task.due_date,
            Date::from_calendar_date(2026, Month::March, 5).expect("valid date")
        );
        assert!(task.is_overdue);
        assert_eq!(task.description_text(), None);
        assert_eq!(task.category.map(|category| category.name).as_deref(), Some("Home"));
    }

    #[test]
    fn task_without_category_or_description_decodes() {
        let task: Task = serde_json::from_str(
            r#"{"id":1,"title":"t","due_date":"2026-01-31","status":"done","priority":"low","category":null}"#,
        )
        .expect("decode minimal task");
        assert!(task.category.is_none());
        assert!(task.description.is_none());
        assert!(!task.is_overdue);
    }

    #[test]
    fn month_view_rejects_out_of_range_month() {
        assert!(MonthView::from_numbers(13, 2026).is_none());
        let view = MonthView::from_numbers(2, 2026).expect("february");
        assert_eq!(view.month_number(), 2);
        assert!(view.date(30).is_none());
        assert!(view.date(28).is_some());
    }

    #[test]
    fn iso_dates_are_zero_padded() {
        let date = Date::from_calendar_date(2026, Month::July, 4).expect("valid date");
        assert_eq!(format_iso_date(date), "2026-07-04");
        let early = Date::from_calendar_date(987, Month::December, 25).expect("valid date");
        assert_eq!(format_iso_date(early), "0987-12-25");
    }
}
