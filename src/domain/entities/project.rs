use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    constants::CREATED_AT_FORMAT,
    entities::language::Language,
    utils::markdown::safe_markdown_to_html,
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 1;
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_SLUG_LENGTH: u64 = 2;
const MAX_SLUG_LENGTH: u64 = 80;
const MAX_SUMMARY_LENGTH: u64 = 500;
const MAX_TECH_ITEMS: usize = 30;
const MAX_TECH_ITEM_LENGTH: usize = 40;


// ───── Stored Models ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "active")]
    Active,
    #[default]
    #[serde(rename = "wip", alias = "in-progress")]
    InProgress,
    #[serde(rename = "archived")]
    Archived,
}

impl ProjectStatus {
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (ProjectStatus::Active, Language::En) => "Active",
            (ProjectStatus::Active, Language::Es) => "Activo",
            (ProjectStatus::InProgress, Language::En) => "In Progress",
            (ProjectStatus::InProgress, Language::Es) => "En Progreso",
            (ProjectStatus::Archived, Language::En) => "Archived",
            (ProjectStatus::Archived, Language::Es) => "Archivado",
        }
    }
}

/// Only selects the icon a rendering layer shows next to the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Github,
    Demo,
    Docs,
    #[serde(alias = "package-index")]
    Pypi,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDecision {
    pub title: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContent {
    #[validate(length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub summary: String,

    /// Lightly marked text: bold spans, headings, lists and blank-line paragraphs.
    pub description: String,

    #[validate(custom(function = "validate_tech_stack"))]
    pub tech_stack: Vec<String>,

    pub decisions: Vec<TechnicalDecision>,
    pub learnings: Vec<String>,

    #[validate(custom(function = "validate_links"))]
    pub links: Vec<ProjectLink>,
}

/// Both locales are required; a record missing either fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LocalizedContent {
    #[validate(nested)]
    pub en: ProjectContent,
    #[validate(nested)]
    pub es: ProjectContent,
}

impl LocalizedContent {
    /// Same content under both locales.
    pub fn mirrored(content: ProjectContent) -> Self {
        LocalizedContent {
            en: content.clone(),
            es: content,
        }
    }

    pub fn get(&self, language: Language) -> &ProjectContent {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = "validate_slug")
    )]
    pub slug: String,

    pub featured: bool,
    pub status: ProjectStatus,

    /// Display string such as `Oct 2025`; lexical order is not chronological.
    pub created_at: String,

    #[validate(nested)]
    pub content: LocalizedContent,
}

// ───── Presentation Models ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: String,
    pub slug: String,
    pub language: Language,
    pub featured: bool,
    pub status: ProjectStatus,
    pub status_label: &'static str,
    pub created_at: String,
    pub title: String,
    pub summary: String,
    pub description_html: String,
    pub tech_stack: Vec<String>,
    pub decisions: Vec<TechnicalDecision>,
    pub learnings: Vec<String>,
    pub links: Vec<ProjectLink>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummaryView {
    pub id: String,
    pub slug: String,
    pub featured: bool,
    pub status_label: &'static str,
    pub created_at: String,
    pub title: String,
    pub summary: String,
    pub tech_stack: Vec<String>,
}

impl ProjectRecord {
    pub fn content_for(&self, language: Language) -> &ProjectContent {
        self.content.get(language)
    }

    pub fn to_view(&self, language: Language) -> ProjectView {
        let content = self.content_for(language);
        ProjectView {
            id: self.id.clone(),
            slug: self.slug.clone(),
            language,
            featured: self.featured,
            status: self.status,
            status_label: self.status.label(language),
            created_at: self.created_at.clone(),
            title: content.title.clone(),
            summary: content.summary.clone(),
            description_html: safe_markdown_to_html(&content.description),
            tech_stack: content.tech_stack.clone(),
            decisions: content.decisions.clone(),
            learnings: content.learnings.clone(),
            links: content.links.clone(),
        }
    }

    pub fn to_summary_view(&self, language: Language) -> ProjectSummaryView {
        let content = self.content_for(language);
        ProjectSummaryView {
            id: self.id.clone(),
            slug: self.slug.clone(),
            featured: self.featured,
            status_label: self.status.label(language),
            created_at: self.created_at.clone(),
            title: content.title.clone(),
            summary: content.summary.clone(),
            tech_stack: content.tech_stack.clone(),
        }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Input of the add-project form. The form is monolingual, so the content
/// lands in both locales.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct NewProjectRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[validate(length(max = MAX_SUMMARY_LENGTH))]
    pub summary: String,

    pub description: String,

    #[validate(custom(function = "validate_tech_stack"))]
    pub tech_stack: Vec<String>,

    pub status: ProjectStatus,
    pub featured: bool,

    #[validate(custom(function = "validate_links"))]
    pub links: Vec<ProjectLink>,

    pub decisions: Vec<TechnicalDecision>,
    pub learnings: Vec<String>,
}

impl NewProjectRequest {
    /// Builds the stored record. The id is the creation instant in
    /// milliseconds since the epoch.
    pub fn into_record(mut self, now: DateTime<Utc>) -> Result<ProjectRecord, ValidationErrors> {
        // A blank slug field means "derive it from the title"
        if self.slug.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.slug = None;
        }
        self.validate()?;

        let slug = match self.slug {
            Some(s) => s,
            None => {
                let generated = slug::slugify(&self.title);
                if generated.len() < MIN_SLUG_LENGTH as usize {
                    let mut errors = ValidationErrors::new();
                    errors.add("slug", new_validation_error("slug_too_short", "Generated slug is too short; please provide a custom slug"));
                    return Err(errors);
                }
                generated
            }
        };

        let content = ProjectContent {
            title: self.title,
            summary: self.summary,
            description: self.description,
            tech_stack: self.tech_stack.into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            decisions: self.decisions,
            learnings: self.learnings,
            links: self.links,
        };

        let record = ProjectRecord {
            id: now.timestamp_millis().to_string(),
            slug,
            featured: self.featured,
            status: self.status,
            created_at: now.format(CREATED_AT_FORMAT).to_string(),
            content: LocalizedContent::mirrored(content),
        };

        record.validate()?;
        Ok(record)
    }
}

/// Splits the form's comma separated tech stack, dropping blanks.
pub fn parse_tech_stack(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_links(links: &[ProjectLink]) -> Result<(), ValidationError> {
    for link in links {
        if link.label.trim().is_empty() {
            return Err(new_validation_error("link_label_empty", "Link label cannot be empty"));
        }
        validate_url(&link.url)?;
    }
    Ok(())
}

pub fn validate_tech_stack(stack: &[String]) -> Result<(), ValidationError> {
    if stack.len() > MAX_TECH_ITEMS {
        return Err(new_validation_error("too_many_technologies", "Too many tech stack entries"));
    }
    if stack.iter().any(|t| t.chars().count() > MAX_TECH_ITEM_LENGTH) {
        return Err(new_validation_error("technology_too_long", "Tech stack entry is too long"));
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
