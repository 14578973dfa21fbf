use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculator {
    pub id: String,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub category_id: String,
    pub category_title: String,
}

impl Calculator {
    pub fn new(id: &str, title: &str, description: &str, keywords: &[&str]) -> Self {
        Self::from_owned(
            id.to_string(),
            title.to_string(),
            description.to_string(),
            keywords.iter().map(|kw| kw.to_string()).collect(),
        )
    }

    /// Builds a calculator not yet attached to a category. Duplicate and blank
    /// keywords are dropped, keeping first-seen order.
    pub fn from_owned(id: String, title: String, description: String, keywords: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let trimmed = keyword.trim();
            if trimmed.is_empty() || unique.iter().any(|kw| kw.eq_ignore_ascii_case(trimmed)) {
                continue;
            }
            unique.push(trimmed.to_string());
        }

        Self {
            id,
            title,
            description,
            keywords: unique,
            category_id: String::new(),
            category_title: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color_token: String,
    pub icon_ref: String,
    calculators: Vec<Calculator>,
}

impl Category {
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        color_token: &str,
        icon_ref: &str,
        calculators: Vec<Calculator>,
    ) -> Self {
        let mut category = Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            color_token: color_token.to_string(),
            icon_ref: icon_ref.to_string(),
            calculators: Vec::new(),
        };
        category.adopt(calculators);
        category
    }

    pub fn calculators(&self) -> &[Calculator] {
        &self.calculators
    }

    fn adopt(&mut self, calculators: Vec<Calculator>) {
        self.calculators = calculators
            .into_iter()
            .map(|mut calculator| {
                calculator.category_id = self.id.clone();
                calculator.category_title = self.title.clone();
                calculator
            })
            .collect();
    }
}

pub fn normalize_for_search(input: &str) -> String {
    NormalizedText::new(input).as_string()
}

/// Lowercased text with every run of non-alphanumeric characters folded into a
/// single space. `origin[i]` is the char offset in the source text of `chars[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    chars: Vec<char>,
    origin: Vec<usize>,
}

impl NormalizedText {
    pub fn new(input: &str) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut origin = Vec::with_capacity(input.len());
        let mut pending_space: Option<usize> = None;

        for (offset, ch) in input.chars().enumerate() {
            if ch.is_alphanumeric() {
                if let Some(space_at) = pending_space.take() {
                    if !chars.is_empty() {
                        chars.push(' ');
                        origin.push(space_at);
                    }
                }
                chars.push(ch.to_lowercase().next().unwrap_or(ch));
                origin.push(offset);
            } else if pending_space.is_none() {
                pending_space = Some(offset);
            }
        }

        Self { chars, origin }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Maps a half-open normalized span back to `(start, length)` in source chars.
    pub fn source_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if start >= end || end > self.origin.len() {
            return None;
        }
        let first = self.origin[start];
        let last = self.origin[end - 1];
        Some((first, last + 1 - first))
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_for_search, NormalizedText};

    #[test]
    fn folds_punctuation_runs_into_single_spaces() {
        assert_eq!(normalize_for_search("  Break-Even -- Point "), "break even point");
    }

    #[test]
    fn source_span_points_at_original_characters() {
        let text = NormalizedText::new("BMI / Body  Mass");
        let rendered = text.as_string();
        assert_eq!(rendered, "bmi body mass");
        let start = rendered.find("body").unwrap();
        assert_eq!(text.source_span(start, start + 4), Some((6, 4)));
    }
}
