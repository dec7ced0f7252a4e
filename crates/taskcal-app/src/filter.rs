// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterSelector {
    #[default]
    All,
    Pending,
    Done,
    Overdue,
    HighPriority,
}

impl FilterSelector {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Pending,
        Self::Done,
        Self::Overdue,
        Self::HighPriority,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Overdue => "overdue",
            Self::HighPriority => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            "overdue" => Some(Self::Overdue),
            "high" | "high-priority" | "high_priority" => Some(Self::HighPriority),
            _ => None,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => task.status == TaskStatus::Pending,
            Self::Done => task.status == TaskStatus::Done,
            Self::Overdue => task.is_overdue,
            Self::HighPriority => task.priority == TaskPriority::High,
        }
    }
}

pub fn filter(tasks: &[Task], selector: FilterSelector) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| selector.matches(task))
        .cloned()
        .collect()
}
