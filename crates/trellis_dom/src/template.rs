//! Template engine
//!
//! Minimal placeholder substitution: a template string plus a data map
//! produce markup. Supports `{key}` substitution and `{?key}...{/key}`
//! conditional sections gated on a truthy value. Widgets assemble the
//! data map through [`TplData`], folding each layer's contribution in
//! without overwriting keys already set by a more specific layer.

use indexmap::IndexMap;

/// A template variable value
#[derive(Clone, Debug, PartialEq)]
pub enum TplValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl TplValue {
    fn render(&self) -> String {
        match self {
            TplValue::Str(s) => s.clone(),
            TplValue::Bool(b) => b.to_string(),
            TplValue::Int(i) => i.to_string(),
            TplValue::Float(f) => f.to_string(),
        }
    }

    fn truthy(&self) -> bool {
        match self {
            TplValue::Str(s) => !s.is_empty(),
            TplValue::Bool(b) => *b,
            TplValue::Int(i) => *i != 0,
            TplValue::Float(f) => *f != 0.0,
        }
    }
}

impl From<&str> for TplValue {
    fn from(s: &str) -> Self {
        TplValue::Str(s.to_owned())
    }
}

impl From<String> for TplValue {
    fn from(s: String) -> Self {
        TplValue::Str(s)
    }
}

impl From<bool> for TplValue {
    fn from(b: bool) -> Self {
        TplValue::Bool(b)
    }
}

impl From<i64> for TplValue {
    fn from(i: i64) -> Self {
        TplValue::Int(i)
    }
}

impl From<f64> for TplValue {
    fn from(f: f64) -> Self {
        TplValue::Float(f)
    }
}

/// Template variable map with layered assembly.
#[derive(Clone, Debug, Default)]
pub struct TplData {
    values: IndexMap<String, TplValue>,
}

impl TplData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<TplValue>) -> &mut Self {
        self.values.insert(key.to_owned(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&TplValue> {
        self.values.get(key)
    }

    /// Fold another layer's contribution in without overwriting keys
    /// already present: most-derived values win on conflict.
    pub fn merge_missing(&mut self, other: TplData) -> &mut Self {
        for (key, value) in other.values {
            self.values.entry(key).or_insert(value);
        }
        self
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        self.values.get(key).map(TplValue::truthy).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A compiled-on-demand template string.
#[derive(Clone, Debug)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Render the template against a data map. Unknown `{key}`
    /// placeholders render empty; unknown conditional keys are falsy.
    pub fn render(&self, data: &TplData) -> String {
        render_section(&self.source, data)
    }
}

fn render_section(source: &str, data: &TplData) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        if let Some(cond_key_end) = after.strip_prefix('?').and_then(|a| a.find('}')) {
            // {?key}...{/key} conditional section
            let key = &after[1..1 + cond_key_end];
            let body_start = start + 1 + 1 + cond_key_end + 1;
            let close = format!("{{/{key}}}");
            if let Some(body_len) = rest[body_start..].find(&close) {
                let body = &rest[body_start..body_start + body_len];
                if data.is_truthy(key) {
                    out.push_str(&render_section(body, data));
                }
                rest = &rest[body_start + body_len + close.len()..];
                continue;
            }
            // Unterminated section: emit literally
            out.push('{');
            rest = after;
        } else if let Some(end) = after.find('}') {
            let key = &after[..end];
            if let Some(value) = data.get(key) {
                out.push_str(&value.render());
            }
            rest = &after[end + 1..];
        } else {
            out.push('{');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let tpl = Template::new("<label>{label}</label>");
        let mut data = TplData::new();
        data.set("label", "Age");
        assert_eq!(tpl.render(&data), "<label>Age</label>");
    }

    #[test]
    fn test_unknown_key_renders_empty() {
        let tpl = Template::new("[{missing}]");
        assert_eq!(tpl.render(&TplData::new()), "[]");
    }

    #[test]
    fn test_conditional_section() {
        let tpl = Template::new("{text}{?menu} <span class=\"caret\"></span>{/menu}");

        let mut with_menu = TplData::new();
        with_menu.set("text", "File").set("menu", true);
        assert_eq!(
            tpl.render(&with_menu),
            "File <span class=\"caret\"></span>"
        );

        let mut without = TplData::new();
        without.set("text", "File").set("menu", false);
        assert_eq!(tpl.render(&without), "File");
    }

    #[test]
    fn test_conditional_body_substitutes() {
        let tpl = Template::new("{?label}<label>{label}</label>{/label}<input>");
        let mut data = TplData::new();
        data.set("label", "Name");
        assert_eq!(tpl.render(&data), "<label>Name</label><input>");

        assert_eq!(tpl.render(&TplData::new()), "<input>");
    }

    #[test]
    fn test_merge_missing_keeps_derived_values() {
        let mut derived = TplData::new();
        derived.set("cls", "btn-primary");

        let mut base = TplData::new();
        base.set("cls", "btn").set("disabled", false);

        derived.merge_missing(base);
        assert_eq!(derived.get("cls"), Some(&TplValue::Str("btn-primary".into())));
        assert_eq!(derived.get("disabled"), Some(&TplValue::Bool(false)));
    }
}
