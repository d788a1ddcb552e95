use crate::models::Project;

/// Ordinal replies accepted while a task-creation flow waits for a project.
pub const TASK_FLOW_ORDINALS: &[(&str, usize)] = &[
    ("primero", 0),
    ("1", 0),
    ("segundo", 1),
    ("2", 1),
    ("tercero", 2),
    ("3", 2),
];

/// Ordinal replies accepted while a document-creation flow waits for a
/// project. Covers two positions where the task flow covers three; the
/// mismatch is inherited behavior and numeric replies past position two are
/// expected to resolve through the leading-integer fallback instead.
pub const DOC_FLOW_ORDINALS: &[(&str, usize)] = &[
    ("primero", 0),
    ("1", 0),
    ("segundo", 1),
    ("2", 1),
];

/// Resolves a disambiguation reply against the options most recently offered
/// to the user, then against the live project list:
///
/// 1. exact ordinal token into `last_options`,
/// 2. leading integer minus one into `last_options`,
/// 3. case-insensitive substring match against live project names.
pub fn resolve_project_reply<'a>(
    reply: &str,
    last_options: &[String],
    projects: &'a [Project],
    ordinals: &[(&str, usize)],
) -> Option<&'a Project> {
    let normalized = reply.trim().to_lowercase();

    let offered = ordinals
        .iter()
        .find(|(token, _)| *token == normalized)
        .map(|(_, index)| *index)
        .or_else(|| {
            parse_leading_int(&normalized)
                .filter(|value| *value >= 1)
                .map(|value| (value - 1) as usize)
        })
        .and_then(|index| last_options.get(index));

    if let Some(name) = offered {
        return find_project(name, projects);
    }

    find_project(reply, projects)
}

/// Fuzzy match of a name fragment against the live project list. The fragment
/// and the name match if either contains the other, case-insensitively.
pub fn find_project<'a>(fragment: &str, projects: &'a [Project]) -> Option<&'a Project> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    projects.iter().find(|project| {
        let name = project.name.to_lowercase();
        name.contains(&needle) || needle.contains(&name)
    })
}

/// Resolves a project named inline in a fresh command. Tries the extracted
/// mention first; the extraction pattern can capture filler words ("el
/// proyecto"), so the whole input is scanned for a live name as a fallback.
pub fn resolve_project_mention<'a>(
    text: &str,
    mention: Option<&str>,
    projects: &'a [Project],
) -> Option<&'a Project> {
    if let Some(project) = mention.and_then(|fragment| find_project(fragment, projects)) {
        return Some(project);
    }

    let normalized = text.to_lowercase();
    projects
        .iter()
        .find(|project| normalized.contains(&project.name.to_lowercase()))
}

/// Leading-integer parse matching `parseInt`: optional sign, then digits,
/// ignoring any trailing garbage. `None` when the input starts with neither.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix: String = digits.chars().take_while(char::is_ascii_digit).collect();
    if prefix.is_empty() {
        return None;
    }

    prefix
        .parse::<i64>()
        .ok()
        .map(|parsed| if negative { -parsed } else { parsed })
}
