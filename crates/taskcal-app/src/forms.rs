// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::{CategoryId, Task, TaskPriority, TaskStatus, ValidationError, format_iso_date};

pub const DEFAULT_CATEGORY_COLOR: &str = "#000000";

/// Fields of the create and edit task forms. `status` is only sent on edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: Option<Date>,
    pub priority: TaskPriority,
    pub status: Option<TaskStatus>,
    pub category_id: Option<CategoryId>,
}

impl TaskForm {
    /// Blank create form with the due date prefilled from the calendar.
    pub fn for_date(date: Date) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: Some(date),
            priority: TaskPriority::Medium,
            status: None,
            category_id: None,
        }
    }

    /// Edit form prefilled from the task as the backend currently has it.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: Some(task.due_date),
            priority: task.priority,
            status: Some(task.status),
            category_id: task.category.as_ref().map(|category| category.id),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError { field: "title" });
        }
        if self.due_date.is_none() {
            return Err(ValidationError { field: "due date" });
        }
        Ok(())
    }

    /// Form-encoded body. A missing category is sent as an empty value,
    /// which the backend reads as "no category".
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.trim().to_owned()),
            ("description", self.description.trim().to_owned()),
            (
                "due_date",
                self.due_date.map(format_iso_date).unwrap_or_default(),
            ),
            ("priority", self.priority.as_str().to_owned()),
        ];
        if let Some(status) = self.status {
            fields.push(("status", status.as_str().to_owned()));
        }
        fields.push((
            "category_id",
            self.category_id
                .map(|id| id.get().to_string())
                .unwrap_or_default(),
        ));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub color: String,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_owned(),
        }
    }
}

impl CategoryForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError {
                field: "category name",
            });
        }
        Ok(())
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let color = if self.color.trim().is_empty() {
            DEFAULT_CATEGORY_COLOR.to_owned()
        } else {
            self.color.trim().to_owned()
        };
        vec![("name", self.name.trim().to_owned()), ("color", color)]
    }
}

/// A form's submit button while a request is out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: String,
    pub enabled: bool,
    pub busy: bool,
    idle_label: String,
}

impl SubmitControl {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            enabled: true,
            busy: false,
            idle_label: label.to_owned(),
        }
    }

    pub fn begin(&mut self) {
        self.enabled = false;
        self.busy = true;
        self.label = "Saving...".to_owned();
    }

    pub fn restore(&mut self) {
        self.enabled = true;
        self.busy = false;
        self.label = self.idle_label.clone();
    }
}
