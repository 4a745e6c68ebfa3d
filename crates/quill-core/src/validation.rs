//! Validation layer - typed, constrained inputs parsed from request bodies.
//!
//! Request bodies deserialize straight into the input structs below (serde
//! enforces presence and types, and fills defaults); [`Validate`] then checks
//! the value constraints and reports every violated field at once.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::TITLE_MAX_CHARS;

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// All constraint violations found in one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldIssue>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Value-level constraints of an input type.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A clearable field in a partial update.
///
/// With `#[serde(default)]` on the field: absent → `Unchanged`,
/// `null` → `Clear`, a value → `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl Patch<String> {
    /// Write the patch into `slot`. An empty string clears it.
    pub fn apply(self, slot: &mut Option<String>) {
        match self {
            Patch::Unchanged => {}
            Patch::Clear => *slot = None,
            Patch::Set(value) => *slot = non_empty(Some(value)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

/// Body of a post creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Validate for NewPost {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_title(&self.title, &mut errors);
        check_content(&self.content, &mut errors);
        if let Some(tags) = &self.tags {
            check_tags(tags, &mut errors);
        }
        errors.into_result()
    }
}

/// Body of a post update request. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Patch<String>,
    #[serde(default)]
    pub cover_image: Patch<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Validate for PostPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }
        if let Some(content) = &self.content {
            check_content(content, &mut errors);
        }
        if let Some(tags) = &self.tags {
            check_tags(tags, &mut errors);
        }
        errors.into_result()
    }
}

/// Body of a comment creation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: Uuid,
    pub content: String,
}

impl Validate for NewComment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_content(&self.content, &mut errors);
        errors.into_result()
    }
}

/// Post listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPosts {
    pub page: u64,
    pub limit: u64,
    pub published: Option<bool>,
    pub author_id: Option<Uuid>,
}

impl ListPosts {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;
}

impl Default for ListPosts {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
            published: None,
            author_id: None,
        }
    }
}

impl Validate for ListPosts {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.page == 0 {
            errors.push("page", "must be at least 1");
        }
        if self.limit == 0 {
            errors.push("limit", "must be at least 1");
        }
        errors.into_result()
    }
}

/// Treats empty strings as absent. Stored optional text is never `""`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_title(title: &str, errors: &mut ValidationErrors) {
    let len = title.chars().count();
    if len == 0 {
        errors.push("title", "must not be empty");
    } else if len > TITLE_MAX_CHARS {
        errors.push(
            "title",
            format!("must be at most {TITLE_MAX_CHARS} characters"),
        );
    }
}

fn check_content(content: &str, errors: &mut ValidationErrors) {
    if content.is_empty() {
        errors.push("content", "must not be empty");
    }
}

fn check_tags(tags: &[String], errors: &mut ValidationErrors) {
    for (index, tag) in tags.iter().enumerate() {
        if tag.trim().is_empty() {
            errors.push(format!("tags[{index}]"), "must not be blank");
        }
    }
}
