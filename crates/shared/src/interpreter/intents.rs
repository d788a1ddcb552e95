use std::sync::LazyLock;

use regex::Regex;

use crate::models::DocumentType;

pub const DEFAULT_TASK_TITLE: &str = "Tarea IA";
pub const DEFAULT_DOC_TITLE: &str = "Documento IA";

const DOC_KEYWORDS: &[&str] = &[
    "documento",
    "doc",
    "archivo",
    "alcance",
    "minuta",
    "requerimiento",
    "technical",
    "scope",
    "técnico",
];

const TASK_KEYWORDS: &[&str] = &["tarea", "task", "issue", "backlog", "pendiente"];

const CREATION_VERBS: &[&str] = &[
    "crea", "nuevo", "new", "genera", "agrega", "crear", "añadir",
];

static DOC_TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(documento|doc|llamado|alcance|minuta|archivo|llamada)\s+["']?([^"']+)["']?"#)
        .expect("doc title pattern should compile")
});

static TASK_TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(tarea|task|llamada)\s+["']?([^"']+)["']?"#)
        .expect("task title pattern should compile")
});

static PROJECT_MENTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(proyecto|project|en)\s+["']?([^"']+)["']?"#)
        .expect("project mention pattern should compile")
});

/// A fresh command classified from raw text, evaluated only when no flow is
/// pending. The variants are checked in a fixed priority order; the first
/// matching rule wins.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    CreateDocument {
        title: String,
        doc_type: DocumentType,
        project_mention: Option<String>,
    },
    CreateTask {
        title: String,
        project_mention: Option<String>,
    },
    ListProjects,
    ListTasks,
    SmallTalk,
}

pub fn classify(text: &str) -> Intent {
    let normalized = text.to_lowercase();
    let wants_creation = contains_any(&normalized, CREATION_VERBS);

    if wants_creation && contains_any(&normalized, DOC_KEYWORDS) {
        return Intent::CreateDocument {
            title: extract_title(&DOC_TITLE_PATTERN, text)
                .unwrap_or_else(|| DEFAULT_DOC_TITLE.to_string()),
            doc_type: classify_doc_type(&normalized),
            project_mention: extract_project_mention(text),
        };
    }

    if wants_creation && contains_any(&normalized, TASK_KEYWORDS) {
        return Intent::CreateTask {
            title: extract_title(&TASK_TITLE_PATTERN, text)
                .unwrap_or_else(|| DEFAULT_TASK_TITLE.to_string()),
            project_mention: extract_project_mention(text),
        };
    }

    if normalized.contains("proyecto") {
        return Intent::ListProjects;
    }

    if normalized.contains("tarea") || normalized.contains("backlog") {
        return Intent::ListTasks;
    }

    Intent::SmallTalk
}

/// The mentioned project fragment, if the text names one. The `en` alternative
/// has no word boundary on purpose; stray captures are tolerated because
/// resolution falls back to scanning the whole text for a live project name.
pub fn extract_project_mention(text: &str) -> Option<String> {
    PROJECT_MENTION_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|fragment| !fragment.is_empty())
}

fn classify_doc_type(normalized: &str) -> DocumentType {
    if normalized.contains("alcance") || normalized.contains("scope") {
        return DocumentType::Scope;
    }

    if normalized.contains("tecnico") || normalized.contains("technical") {
        return DocumentType::Technical;
    }

    DocumentType::Draft
}

fn extract_title(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}
