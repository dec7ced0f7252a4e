// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::{BackendError, Category, CategoryForm, MonthView, Task, TaskForm, TaskId, TasksByDay};

/// The task backend as seen by the calendar. Implemented over HTTP by
/// `taskcal-client` and by scripted fakes in tests.
///
/// Mutations return the backend's confirmation message.
pub trait TaskBackend {
    fn tasks_by_month(&mut self, view: MonthView) -> Result<TasksByDay, BackendError>;
    fn task(&mut self, id: TaskId) -> Result<Task, BackendError>;
    fn day_details(&mut self, date: Date) -> Result<Vec<Task>, BackendError>;
    fn categories(&mut self) -> Result<Vec<Category>, BackendError>;
    fn create_task(&mut self, form: &TaskForm) -> Result<String, BackendError>;
    fn edit_task(&mut self, id: TaskId, form: &TaskForm) -> Result<String, BackendError>;
    fn toggle_status(&mut self, id: TaskId) -> Result<String, BackendError>;
    fn delete_task(&mut self, id: TaskId) -> Result<String, BackendError>;
    fn create_category(&mut self, form: &CategoryForm) -> Result<Category, BackendError>;
}

impl<B: TaskBackend + ?Sized> TaskBackend for &mut B {
    fn tasks_by_month(&mut self, view: MonthView) -> Result<TasksByDay, BackendError> {
        (**self).tasks_by_month(view)
    }

    fn task(&mut self, id: TaskId) -> Result<Task, BackendError> {
        (**self).task(id)
    }

    fn day_details(&mut self, date: Date) -> Result<Vec<Task>, BackendError> {
        (**self).day_details(date)
    }

    fn categories(&mut self) -> Result<Vec<Category>, BackendError> {
        (**self).categories()
    }

    fn create_task(&mut self, form: &TaskForm) -> Result<String, BackendError> {
        (**self).create_task(form)
    }

    fn edit_task(&mut self, id: TaskId, form: &TaskForm) -> Result<String, BackendError> {
        (**self).edit_task(id, form)
    }

    fn toggle_status(&mut self, id: TaskId) -> Result<String, BackendError> {
        (**self).toggle_status(id)
    }

    fn delete_task(&mut self, id: TaskId) -> Result<String, BackendError> {
        (**self).delete_task(id)
    }

    fn create_category(&mut self, form: &CategoryForm) -> Result<Category, BackendError> {
        (**self).create_category(form)
    }
}
