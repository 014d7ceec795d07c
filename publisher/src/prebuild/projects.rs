//! The site's project list.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the projects file.
///
/// The well-known keys are typed; any other keys are carried through to the
/// enriched output unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Project {
    /// Display name, used as the card title fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project page to fetch metadata from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Short description, used as the card description fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Technologies used by the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
    /// Remaining keys, preserved as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// The trimmed URL, if one is set and non-blank.
    #[must_use]
    pub fn page_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    /// The trimmed name, or an empty string.
    #[must_use]
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().map_or("", str::trim)
    }

    /// The trimmed description, or an empty string.
    #[must_use]
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().map_or("", str::trim)
    }
}

/// Parse the YAML projects file. A document holding only blank lines and
/// comments is an empty list.
///
/// Hand-written project lists often carry unquoted values that strict YAML
/// rejects, such as `description: Rust CLI: publishes stylesheets`. When
/// strict parsing fails the file is read line by line instead: `- key: value`
/// opens an entry, indented `key: value` lines add to it (split on the first
/// colon, surrounding quotes stripped) and `stack:` collects the `- item`
/// lines below it.
///
/// # Errors
///
/// Returns the strict parser's error if the document is not a YAML sequence
/// of mappings and the line-oriented reading finds no entries either.
///
/// # Examples
///
/// ```
/// use site_publisher::prebuild::parse_projects;
///
/// let projects = parse_projects(
///     "- name: Notebook\n  url: https://example.com\n  stack:\n    - Rust\n",
/// )?;
/// assert_eq!(projects.len(), 1);
/// assert_eq!(projects[0].page_url(), Some("https://example.com"));
/// # Ok::<(), serde_yaml_ng::Error>(())
/// ```
pub fn parse_projects(contents: &str) -> Result<Vec<Project>, serde_yaml_ng::Error> {
    let is_blank = contents.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if is_blank {
        return Ok(Vec::new());
    }
    match serde_yaml_ng::from_str::<Option<Vec<Project>>>(contents) {
        Ok(projects) => Ok(projects.unwrap_or_default()),
        Err(err) => {
            let projects = parse_project_lines(contents);
            if projects.is_empty() {
                return Err(err);
            }
            debug!("projects file is not strict YAML ({err}); read it line by line");
            Ok(projects)
        }
    }
}

fn parse_project_lines(contents: &str) -> Vec<Project> {
    let mut projects = Vec::new();
    let mut current: Option<Project> = None;
    let mut in_stack = false;

    for line in contents.lines().map(str::trim_end) {
        if line.is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if let Some(first) = line.strip_prefix("- ") {
            projects.extend(current.take());
            let mut project = Project::default();
            if let Some((key, value)) = first.split_once(':') {
                project.set(key.trim(), strip_quotes(value));
            }
            current = Some(project);
            in_stack = false;
            continue;
        }

        let Some(project) = current.as_mut() else {
            continue;
        };

        if line.starts_with("  stack:") {
            project.stack = Some(Vec::new());
            in_stack = true;
        } else if let Some(item) = line.strip_prefix("    - ").filter(|_| in_stack) {
            let item = strip_quotes(item);
            if !item.is_empty() {
                project.stack.get_or_insert_with(Vec::new).push(item.to_owned());
            }
        } else if let Some((key, value)) = line.strip_prefix("  ").and_then(|rest| rest.split_once(':')) {
            project.set(key.trim(), strip_quotes(value));
            in_stack = false;
        }
    }

    projects.extend(current);
    projects
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            value
                .strip_prefix(quote)
                .and_then(|inner| inner.strip_suffix(quote))
        })
        .unwrap_or(value)
}

impl Project {
    fn set(&mut self, key: &str, value: &str) {
        let value = value.to_owned();
        match key {
            "name" => self.name = Some(value),
            "url" => self.url = Some(value),
            "description" => self.description = Some(value),
            _ => {
                self.extra.insert(key.to_owned(), Value::String(value));
            }
        }
    }
}
