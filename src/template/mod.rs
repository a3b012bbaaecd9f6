//! Placeholder extraction and substitution for `{{name}}` prompt templates.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is valid"))
}

/// Distinct, trimmed placeholder names in order of first appearance.
///
/// Empty placeholders (`{{}}`, `{{  }}`) are skipped: there is nothing a
/// user could meaningfully fill in, and keeping them would block generation
/// behind a field with no label.
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_re().captures_iter(template) {
        let name = caps[1].trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Substitute every placeholder whose name is assigned, in a single pass.
///
/// Values are inserted verbatim and never re-scanned, so a value containing
/// `{{other}}` stays literal. Placeholders with no assignment are left as-is.
pub fn fill_template(template: &str, assignment: &Assignment) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures| match assignment.get(caps[1].trim()) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Ordered name -> value mapping for one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    entries: Vec<(String, String)>,
}

impl Assignment {
    /// One empty slot per extracted variable.
    pub fn from_template(template: &str) -> Self {
        Self {
            entries: extract_variables(template).into_iter().map(|n| (n, String::new())).collect(),
        }
    }

    /// Update an existing slot. Returns false when `name` is not a slot.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every value is non-empty after trimming.
    pub fn all_filled(&self) -> bool {
        self.entries.iter().all(|(_, v)| !v.trim().is_empty())
    }

    /// Names whose values are still blank.
    pub fn missing(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Assignment::default();
        for (k, v) in iter {
            let k = k.into();
            let v = v.into();
            if !out.set(&k, v.clone()) {
                out.entries.push((k, v));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trimmed_names_in_order() {
        assert_eq!(extract_variables("Hello {{name}}, your {{ city }} home"), vec!["name", "city"]);
    }

    #[test]
    fn no_placeholders_yields_nothing() {
        assert!(extract_variables("No placeholders here").is_empty());
        assert!(Assignment::from_template("No placeholders here").is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(extract_variables("{{a}} and {{a}} again"), vec!["a"]);
        assert_eq!(extract_variables("{{ a }} and {{a}}"), vec!["a"]);
    }

    #[test]
    fn empty_placeholders_are_skipped() {
        assert_eq!(extract_variables("{{}} then {{  }} then {{x}}"), vec!["x"]);
    }

    #[test]
    fn placeholders_do_not_span_lines() {
        assert!(extract_variables("{{first\nsecond}}").is_empty());
    }

    #[test]
    fn fills_simple_template() {
        let a: Assignment = [("name", "Sam")].into_iter().collect();
        assert_eq!(fill_template("Hi {{name}}", &a), "Hi Sam");
    }

    #[test]
    fn shared_prefixes_do_not_cross_contaminate() {
        let a: Assignment = [("a", "1"), ("ab", "2")].into_iter().collect();
        assert_eq!(fill_template("{{a}}-{{ab}}", &a), "1-2");
    }

    #[test]
    fn replacement_is_global_and_whitespace_tolerant() {
        let a: Assignment = [("city", "Austin")].into_iter().collect();
        assert_eq!(fill_template("{{city}}, {{ city }}!", &a), "Austin, Austin!");
    }

    #[test]
    fn values_are_not_rescanned() {
        let a: Assignment = [("a", "{{b}}"), ("b", "B")].into_iter().collect();
        assert_eq!(fill_template("{{a}} {{b}}", &a), "{{b}} B");
    }

    #[test]
    fn unassigned_tokens_are_kept() {
        let a: Assignment = [("x", "1")].into_iter().collect();
        assert_eq!(fill_template("{{x}} {{y}}", &a), "1 {{y}}");
    }

    #[test]
    fn filled_template_has_no_known_tokens_left() {
        let templates = [
            "Welcome to {{city}}!",
            "{{a}}{{b}}{{a}}",
            "Dear {{ client }}, the {{property}} at {{address}} is {{ property }}.",
            "plain",
        ];
        for t in templates {
            let mut a = Assignment::from_template(t);
            let names: Vec<String> = a.names().map(String::from).collect();
            for n in &names {
                a.set(n, format!("v-{n}"));
            }
            let out = fill_template(t, &a);
            assert_eq!(extract_variables(&out), Vec::<String>::new(), "template {t:?} -> {out:?}");
        }
    }

    #[test]
    fn fill_does_not_mutate_inputs() {
        let t = String::from("Hi {{name}}");
        let a: Assignment = [("name", "Sam")].into_iter().collect();
        let before = a.clone();
        let first = fill_template(&t, &a);
        let second = fill_template(&t, &a);
        assert_eq!(first, second);
        assert_eq!(t, "Hi {{name}}");
        assert_eq!(a, before);
    }

    #[test]
    fn assignment_tracks_missing_values() {
        let mut a = Assignment::from_template("{{city}} {{beds}}");
        assert!(!a.all_filled());
        assert_eq!(a.missing(), vec!["city", "beds"]);
        assert!(a.set("city", "Austin"));
        assert!(a.set("beds", "   "));
        assert_eq!(a.missing(), vec!["beds"]);
        assert!(a.set("beds", "3"));
        assert!(a.all_filled());
        assert!(!a.set("unknown", "x"));
        assert_eq!(a.len(), 2);
    }
}
