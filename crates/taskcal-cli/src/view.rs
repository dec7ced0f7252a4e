// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Plain-text drawing of the calendar's display tree and modals.

use std::fmt::Write as _;
use taskcal_app::{
    CardState, Category, DisplayTree, FilterSelector, MonthView, Notice, NoticeLevel, TaskCard,
};

pub const NO_TASKS_ON_DAY: &str = "No tasks on this day";
pub const NO_CATEGORIES: &str = "No categories yet";

pub fn month_heading(view: MonthView, filter: FilterSelector, total: usize) -> String {
    format!(
        "{} {} | filter: {} | {} task(s)",
        view.month,
        view.year,
        filter.as_str(),
        total
    )
}

pub fn render_month(tree: &DisplayTree, view: MonthView, filter: FilterSelector) -> String {
    let mut out = month_heading(view, filter, tree.total());
    out.push('\n');
    match tree {
        DisplayTree::Empty(placeholder) => {
            let _ = writeln!(out, "\n{}\n{}", placeholder.title, placeholder.hint);
        }
        DisplayTree::Days { sections, .. } => {
            for section in sections {
                let _ = writeln!(out, "\n{}  ({})", section.date_label, section.count_label);
                for card in &section.cards {
                    push_card(&mut out, card);
                }
            }
        }
    }
    out
}

pub fn render_day(title: &str, cards: &[TaskCard]) -> String {
    let mut out = format!("{title}\n");
    if cards.is_empty() {
        let _ = writeln!(out, "\n{NO_TASKS_ON_DAY}");
        return out;
    }
    out.push('\n');
    for card in cards {
        push_card(&mut out, card);
    }
    out
}

pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return format!("{NO_CATEGORIES}\n");
    }
    let mut out = String::from("Categories\n");
    for category in categories {
        let _ = writeln!(out, "  #{} {} ({})", category.id, category.name, category.color);
    }
    out
}

pub fn notice_line(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    format!("[{marker}] {} {}", notice.title, notice.message)
}

fn push_card(out: &mut String, card: &TaskCard) {
    let marker = match card.state {
        CardState::Done => "[x]",
        CardState::Overdue => "[!]",
        CardState::Pending => "[ ]",
    };
    let _ = write!(
        out,
        "  {marker} #{} {}  {} | {}",
        card.id, card.title, card.status_badge.label, card.priority_badge.label
    );
    if let Some(category) = &card.category_badge {
        let _ = write!(out, " | {}", category.name);
    }
    let _ = writeln!(out, "  -> {}", card.toggle.label());
    if let Some(description) = &card.description {
        let _ = writeln!(out, "      {description}");
    }
}
