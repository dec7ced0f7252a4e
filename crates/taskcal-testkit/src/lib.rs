// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::cell::Cell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use taskcal_app::{
    BackendError, Category, CategoryForm, CategoryId, Clock, MonthView, Task, TaskBackend,
    TaskForm, TaskId, TaskPriority, TaskStatus, TasksByDay,
};
use time::{Date, Month};

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("fixture date should be valid")
}

pub fn category(id: i64, name: &str, color: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_owned(),
        color: color.to_owned(),
    }
}

#[derive(Debug, Clone)]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: i64, due_date: Date) -> Self {
        Self {
            task: Task {
                id: TaskId::new(id),
                title: format!("Task {id}"),
                description: None,
                due_date,
                status: TaskStatus::Pending,
                is_overdue: false,
                priority: TaskPriority::Medium,
                category: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_owned();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.task.description = Some(description.to_owned());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn overdue(mut self) -> Self {
        self.task.is_overdue = true;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.task.category = Some(category);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

pub fn group_by_day(tasks: impl IntoIterator<Item = Task>) -> TasksByDay {
    let mut days = TasksByDay::new();
    for task in tasks {
        days.entry(task.due_date.day()).or_default().push(task);
    }
    days
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    TasksByMonth(MonthView),
    Task(TaskId),
    DayDetails(Date),
    Categories,
    CreateTask(TaskForm),
    EditTask(TaskId, TaskForm),
    ToggleStatus(TaskId),
    DeleteTask(TaskId),
    CreateCategory(CategoryForm),
}

/// In-memory backend that behaves like the real one unless a scripted
/// response is queued for the next call of that kind.
///
/// Successful mutations change the held tasks, so the next month fetch
/// reflects them the way the server would.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    month_responses: VecDeque<Result<TasksByDay, BackendError>>,
    category_responses: VecDeque<Result<Vec<Category>, BackendError>>,
    mutation_responses: VecDeque<Result<String, BackendError>>,
    calls: Vec<BackendCall>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: tasks.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn push_month(&mut self, response: Result<TasksByDay, BackendError>) {
        self.month_responses.push_back(response);
    }

    pub fn push_categories(&mut self, response: Result<Vec<Category>, BackendError>) {
        self.category_responses.push_back(response);
    }

    pub fn push_mutation(&mut self, response: Result<String, BackendError>) {
        self.mutation_responses.push_back(response);
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn month_fetches(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::TasksByMonth(_)))
            .count()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn next_mutation(&mut self, default: &str) -> Result<String, BackendError> {
        self.mutation_responses
            .pop_front()
            .unwrap_or_else(|| Ok(default.to_owned()))
    }

    fn position(&self, id: TaskId) -> Result<usize, BackendError> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| BackendError::server("Task not found"))
    }

    fn category_for(&self, id: Option<CategoryId>) -> Option<Category> {
        let id = id?;
        self.categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
    }
}

impl TaskBackend for ScriptedBackend {
    fn tasks_by_month(&mut self, view: MonthView) -> Result<TasksByDay, BackendError> {
        self.calls.push(BackendCall::TasksByMonth(view));
        if let Some(response) = self.month_responses.pop_front() {
            return response;
        }
        Ok(group_by_day(
            self.tasks
                .iter()
                .filter(|task| view.contains(task.due_date))
                .cloned(),
        ))
    }

    fn task(&mut self, id: TaskId) -> Result<Task, BackendError> {
        self.calls.push(BackendCall::Task(id));
        let index = self.position(id)?;
        Ok(self.tasks[index].clone())
    }

    fn day_details(&mut self, date: Date) -> Result<Vec<Task>, BackendError> {
        self.calls.push(BackendCall::DayDetails(date));
        Ok(self
            .tasks
            .iter()
            .filter(|task| task.due_date == date)
            .cloned()
            .collect())
    }

    fn categories(&mut self) -> Result<Vec<Category>, BackendError> {
        self.calls.push(BackendCall::Categories);
        self.category_responses
            .pop_front()
            .unwrap_or_else(|| Ok(self.categories.clone()))
    }

    fn create_task(&mut self, form: &TaskForm) -> Result<String, BackendError> {
        self.calls.push(BackendCall::CreateTask(form.clone()));
        let message = self.next_mutation("Task created")?;
        let Some(due_date) = form.due_date else {
            return Err(BackendError::server("Title and due date are required"));
        };
        let id = self.tasks.iter().map(|task| task.id.get()).max().unwrap_or(0) + 1;
        let task = Task {
            id: TaskId::new(id),
            title: form.title.trim().to_owned(),
            description: Some(form.description.clone()),
            due_date,
            status: TaskStatus::Pending,
            is_overdue: false,
            priority: form.priority,
            category: self.category_for(form.category_id),
        };
        self.tasks.push(task);
        Ok(message)
    }

    fn edit_task(&mut self, id: TaskId, form: &TaskForm) -> Result<String, BackendError> {
        self.calls.push(BackendCall::EditTask(id, form.clone()));
        let message = self.next_mutation("Task updated")?;
        let index = self.position(id)?;
        let category = self.category_for(form.category_id);
        let task = &mut self.tasks[index];
        task.title = form.title.trim().to_owned();
        task.description = Some(form.description.clone());
        if let Some(due_date) = form.due_date {
            task.due_date = due_date;
        }
        task.priority = form.priority;
        if let Some(status) = form.status {
            task.status = status;
        }
        task.category = category;
        Ok(message)
    }

    fn toggle_status(&mut self, id: TaskId) -> Result<String, BackendError> {
        self.calls.push(BackendCall::ToggleStatus(id));
        let message = self.next_mutation("Status updated")?;
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        task.status = task.status.toggled();
        if task.status == TaskStatus::Done {
            task.is_overdue = false;
        }
        Ok(message)
    }

    fn delete_task(&mut self, id: TaskId) -> Result<String, BackendError> {
        self.calls.push(BackendCall::DeleteTask(id));
        let message = self.next_mutation("Task deleted")?;
        let index = self.position(id)?;
        self.tasks.remove(index);
        Ok(message)
    }

    fn create_category(&mut self, form: &CategoryForm) -> Result<Category, BackendError> {
        self.calls.push(BackendCall::CreateCategory(form.clone()));
        self.next_mutation("Category created")?;
        let id = self
            .categories
            .iter()
            .map(|category| category.id.get())
            .max()
            .unwrap_or(0)
            + 1;
        let created = Category {
            id: CategoryId::new(id),
            name: form.name.trim().to_owned(),
            color: form.color.clone(),
        };
        self.categories.push(created.clone());
        Ok(created)
    }
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}
