// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::{
    Category, CategoryForm, FilterSelector, MonthView, Task, TaskCard, TaskForm, TaskId, TaskStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success!",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error!",
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    CreateTask,
    TaskDetails,
    EditTask,
    DayDetails,
    Categories,
    NewCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    CreateTask {
        form: TaskForm,
        categories: Vec<Category>,
    },
    TaskDetails {
        task: Task,
    },
    EditTask {
        task_id: TaskId,
        form: TaskForm,
        categories: Vec<Category>,
    },
    DayDetails {
        date: Date,
        title: String,
        cards: Vec<TaskCard>,
    },
    Categories {
        categories: Vec<Category>,
    },
    NewCategory {
        form: CategoryForm,
    },
}

impl Modal {
    pub fn kind(&self) -> ModalKind {
        match self {
            Self::CreateTask { .. } => ModalKind::CreateTask,
            Self::TaskDetails { .. } => ModalKind::TaskDetails,
            Self::EditTask { .. } => ModalKind::EditTask,
            Self::DayDetails { .. } => ModalKind::DayDetails,
            Self::Categories { .. } => ModalKind::Categories,
            Self::NewCategory { .. } => ModalKind::NewCategory,
        }
    }
}

/// Everything the calendar page keeps between user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: MonthView,
    pub filter: FilterSelector,
    pub selected_date: Option<Date>,
    pub context_menu: MenuVisibility,
    pub modal: Option<Modal>,
    pub processing: bool,
    pub store: TaskStore,
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn new(view: MonthView) -> Self {
        Self {
            view,
            filter: FilterSelector::All,
            selected_date: None,
            context_menu: MenuVisibility::Hidden,
            modal: None,
            processing: false,
            store: TaskStore::new(),
            notices: Vec::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MonthView::current())
    }
}

/// Local state changes that need no round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    SetFilter(FilterSelector),
    SetMonth(MonthView),
    OpenContextMenu(Date),
    HideContextMenu,
    OpenNewCategoryModal,
    CloseModal,
    ClearNotices,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    FilterChanged(FilterSelector),
    MonthChanged(MonthView),
    ContextMenuChanged(MenuVisibility),
    SelectedDateChanged(Date),
    ModalOpened(ModalKind),
    ModalClosed(ModalKind),
    NoticesCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SetFilter(filter) => {
                self.filter = filter;
                vec![AppEvent::FilterChanged(filter)]
            }
            AppCommand::SetMonth(view) => {
                self.view = view;
                vec![AppEvent::MonthChanged(view)]
            }
            AppCommand::OpenContextMenu(date) => {
                self.selected_date = Some(date);
                self.context_menu = MenuVisibility::Visible;
                vec![
                    AppEvent::SelectedDateChanged(date),
                    AppEvent::ContextMenuChanged(MenuVisibility::Visible),
                ]
            }
            AppCommand::HideContextMenu => {
                self.context_menu = MenuVisibility::Hidden;
                vec![AppEvent::ContextMenuChanged(MenuVisibility::Hidden)]
            }
            AppCommand::OpenNewCategoryModal => {
                self.modal = Some(Modal::NewCategory {
                    form: CategoryForm::default(),
                });
                vec![AppEvent::ModalOpened(ModalKind::NewCategory)]
            }
            AppCommand::CloseModal => match self.modal.take() {
                Some(modal) => vec![AppEvent::ModalClosed(modal.kind())],
                None => Vec::new(),
            },
            AppCommand::ClearNotices => {
                self.notices.clear();
                vec![AppEvent::NoticesCleared]
            }
        }
    }

    pub fn open_modal(&mut self, modal: Modal) -> AppEvent {
        let kind = modal.kind();
        self.modal = Some(modal);
        AppEvent::ModalOpened(kind)
    }

    /// Close the open modal only if it is of `kind`.
    pub fn close_modal(&mut self, kind: ModalKind) -> Option<AppEvent> {
        if self.modal.as_ref().map(Modal::kind) == Some(kind) {
            self.modal = None;
            return Some(AppEvent::ModalClosed(kind));
        }
        None
    }

    pub fn modal_kind(&self) -> Option<ModalKind> {
        self.modal.as_ref().map(Modal::kind)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
