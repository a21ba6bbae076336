//! Project name transformations.
//!
//! Every path and replacement token in a scaffold run is derived from the
//! single user-supplied project name through the functions in this module.

use std::collections::HashMap;

use crate::domain::value_objects::ProjectName;

// ============================================================================
// String Case Conversion
// ============================================================================

/// Convert a string to PascalCase.
///
/// ## Examples
///
/// | Input | Output |
/// |-------|--------|
/// | "sample" | "Sample" |
/// | "my-app" | "MyApp" |
/// | "HTTPRequest" | "HttpRequest" |
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert a string to camelCase.
///
/// Same as [`to_pascal_case`] except the first word stays lowercase.
///
/// | Input | Output |
/// |-------|--------|
/// | "sample" | "sample" |
/// | "My Shop" | "myShop" |
pub fn to_camel_case(s: &str) -> String {
    split_words(s)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lowercase words based on casing and separators.
///
/// ## Word Boundary Detection
///
/// 1. **Explicit separators:** `_`, `-`, whitespace → always split
/// 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
///    (detected by `Upper Upper Lower` pattern)
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // "myApp" → "my" + "App"
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

// ============================================================================
// Render Context
// ============================================================================

/// Variables available to template manifests.
///
/// | Variable | Example |
/// |----------|---------|
/// | `PROJECT_NAME` | "my-shop" |
/// | `PROJECT_NAME_PASCAL` | "MyShop" |
/// | `PROJECT_NAME_CAMEL` | "myShop" |
///
/// Placeholders are written `{{VARIABLE}}`. Unknown placeholders are left
/// untouched.
#[derive(Debug, Clone)]
pub struct RenderContext {
    project_name: ProjectName,
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(project_name: &ProjectName) -> Self {
        let mut vars = HashMap::new();
        vars.insert("PROJECT_NAME".to_string(), project_name.as_str().to_string());
        vars.insert("PROJECT_NAME_PASCAL".to_string(), project_name.pascal_case());
        vars.insert("PROJECT_NAME_CAMEL".to_string(), project_name.camel_case());

        Self {
            project_name: project_name.clone(),
            variables: vars,
        }
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every `{{VARIABLE}}` placeholder in `template`.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}
