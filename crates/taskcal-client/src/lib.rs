// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::COOKIE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use taskcal_app::{
    BackendError, Category, CategoryForm, MonthView, Task, TaskBackend, TaskForm, TaskId,
    TasksByDay,
};
use time::Date;
use tracing::debug;
use url::Url;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";
const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
const REQUESTED_WITH: &str = "XMLHttpRequest";

/// Blocking HTTP client for the task calendar backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    cookie: Option<String>,
    csrf_token: Option<String>,
    http: HttpClient,
}

impl Client {
    /// `cookie` is sent verbatim on every request; the CSRF token is read
    /// from its `csrf_cookie` entry.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        cookie: Option<&str>,
        csrf_cookie: &str,
    ) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("backend.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("backend.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "backend.base_url must use http or https, got {:?}",
                parsed.scheme()
            );
        }

        let cookie = cookie
            .map(str::trim)
            .filter(|cookie| !cookie.is_empty())
            .map(str::to_owned);
        let csrf_token = cookie
            .as_deref()
            .and_then(|cookie| csrf_token_from_cookies(cookie, csrf_cookie));

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            cookie,
            csrf_token,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Confirm the backend answers, with a hint when it does not.
    pub fn ping(&self) -> Result<()> {
        self.fetch_categories().map_err(|error| match error {
            BackendError::Network(detail) => anyhow!(
                "{detail} -- check that the server is running and backend.base_url is right"
            ),
            BackendError::Server { message } => anyhow!(
                "backend at {} answered with an error: {message} -- check backend.cookie",
                self.base_url
            ),
        })?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        debug!(method = "GET", path, "backend request");
        self.with_cookie(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        debug!(method = "POST", path, "backend request");
        let mut request = self
            .http
            .post(self.url(path))
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        self.with_cookie(request)
    }

    fn with_cookie(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|error| BackendError::network(format!("read {what} response: {error}")))?;
        if !status.is_success() {
            return Err(clean_error_response(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|error| BackendError::network(format!("decode {what} response: {error}")))
    }

    fn fetch_categories(&self) -> Result<Vec<Category>, BackendError> {
        let parsed: CategoriesResponse = self.send(self.get("categories/"), "categories")?;
        check(parsed.success, parsed.error)?;
        Ok(parsed.categories)
    }

    fn send_message(
        &self,
        request: RequestBuilder,
        what: &str,
        default: &str,
    ) -> Result<String, BackendError> {
        let parsed: MessageResponse = self.send(request, what)?;
        check(parsed.success, parsed.error)?;
        Ok(parsed
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| default.to_owned()))
    }
}

impl TaskBackend for Client {
    fn tasks_by_month(&mut self, view: MonthView) -> Result<TasksByDay, BackendError> {
        let request = self.get("tasks-by-month/").query(&[
            ("month", view.month_number().to_string()),
            ("year", view.year.to_string()),
        ]);
        let parsed: MonthResponse = self.send(request, "tasks by month")?;
        check(parsed.success, parsed.error)?;
        Ok(parsed.tasks_by_day)
    }

    fn task(&mut self, id: TaskId) -> Result<Task, BackendError> {
        let parsed: TaskResponse = self.send(self.get(&format!("task/{id}/")), "task")?;
        check(parsed.success, parsed.error)?;
        parsed
            .task
            .ok_or_else(|| BackendError::network("task response has no task"))
    }

    fn day_details(&mut self, date: Date) -> Result<Vec<Task>, BackendError> {
        let request = self.get("day-details/").query(&[
            ("day", date.day().to_string()),
            ("month", u8::from(date.month()).to_string()),
            ("year", date.year().to_string()),
        ]);
        let parsed: DayResponse = self.send(request, "day details")?;
        check(parsed.success, parsed.error)?;
        Ok(parsed.tasks)
    }

    fn categories(&mut self) -> Result<Vec<Category>, BackendError> {
        self.fetch_categories()
    }

    fn create_task(&mut self, form: &TaskForm) -> Result<String, BackendError> {
        let request = self.post("task/create/").form(&form.fields());
        self.send_message(request, "create task", "Task created")
    }

    fn edit_task(&mut self, id: TaskId, form: &TaskForm) -> Result<String, BackendError> {
        let request = self.post(&format!("task/{id}/edit/")).form(&form.fields());
        self.send_message(request, "edit task", "Task updated")
    }

    fn toggle_status(&mut self, id: TaskId) -> Result<String, BackendError> {
        let request = self.post(&format!("task/{id}/toggle-status/"));
        self.send_message(request, "toggle status", "Status updated")
    }

    fn delete_task(&mut self, id: TaskId) -> Result<String, BackendError> {
        let request = self.post(&format!("task/{id}/delete/"));
        self.send_message(request, "delete task", "Task deleted")
    }

    fn create_category(&mut self, form: &CategoryForm) -> Result<Category, BackendError> {
        let request = self.post("categories/create/").form(&form.fields());
        let parsed: CategoryCreatedResponse = self.send(request, "create category")?;
        check(parsed.success, parsed.error)?;
        parsed
            .category
            .ok_or_else(|| BackendError::network("create category response has no category"))
    }
}

/// Value of the `name` entry in a `Cookie` header, percent-decoded.
pub fn csrf_token_from_cookies(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .flat_map(|pair| url::form_urlencoded::parse(pair.trim().as_bytes()).take(1))
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn connection_error(base_url: &str, error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        return BackendError::network(format!("request to {base_url} timed out ({error})"));
    }
    BackendError::network(format!("cannot reach {base_url} ({error})"))
}

fn clean_error_response(status: StatusCode, body: &str) -> BackendError {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.error.or(parsed.message)
        && !message.trim().is_empty()
    {
        return BackendError::server(message);
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') && !body.contains('<') {
        return BackendError::server(body);
    }

    BackendError::server(format!("HTTP {}", status.as_u16()))
}

/// Some endpoints send no `success` flag and signal failure with `error`
/// alone.
fn check(success: Option<bool>, error: Option<String>) -> Result<(), BackendError> {
    match (success, error) {
        (Some(true), _) | (None, None) => Ok(()),
        (Some(false), error) => Err(BackendError::server(error.unwrap_or_default())),
        (None, Some(error)) => Err(BackendError::server(error)),
    }
}

// serde's flatten cannot carry the integer day keys, so each response
// repeats the status fields.
#[derive(Debug, Deserialize)]
struct MonthResponse {
    success: Option<bool>,
    error: Option<String>,
    #[serde(default)]
    tasks_by_day: TasksByDay,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    success: Option<bool>,
    error: Option<String>,
    task: Option<Task>,
}

#[derive(Debug, Deserialize)]
struct DayResponse {
    success: Option<bool>,
    error: Option<String>,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    success: Option<bool>,
    error: Option<String>,
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    success: Option<bool>,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryCreatedResponse {
    success: Option<bool>,
    error: Option<String>,
    category: Option<Category>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}
