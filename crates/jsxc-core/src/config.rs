//! Factory names, formatting and parse mode for one transform call.
//!
//! A [`Config`] is an immutable value passed into every call. A `@jsx`
//! pragma in the input never mutates it: [`Config::resolve`] returns the
//! effective configuration for that input only.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// How malformed markup is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Recover silently and keep whatever was parsed (legacy behavior)
    #[default]
    Lenient,
    /// Report a [`ParseError`](crate::ParseError) with its position
    Strict,
}

/// Code generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Factory called for lowercase elements
    pub element: String,

    /// Factory called for components
    pub component: String,

    /// Optional wrapper for text children; `None` or `""` emits bare text
    pub text: Option<String>,

    /// One indentation step in block-formatted children
    pub indent: String,

    pub mode: ParseMode,

    /// Honor a `@jsx Name` pragma found in the input
    pub pragma: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            element: DEFAULT_FACTORY.to_string(),
            component: DEFAULT_FACTORY.to_string(),
            text: None,
            indent: "\t".to_string(),
            mode: ParseMode::Lenient,
            pragma: true,
        }
    }
}

const DEFAULT_FACTORY: &str = "h";

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `name` for elements and components and drop the text wrapper,
    /// the same effect a `@jsx name` pragma has.
    pub fn with_factory(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            element: name.clone(),
            component: name,
            ..Self::default()
        }
    }

    pub fn with_element(mut self, name: impl Into<String>) -> Self {
        self.element = name.into();
        self
    }

    pub fn with_component(mut self, name: impl Into<String>) -> Self {
        self.component = name.into();
        self
    }

    pub fn with_text(mut self, name: impl Into<String>) -> Self {
        self.text = Some(name.into());
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pragma(mut self, pragma: bool) -> Self {
        self.pragma = pragma;
        self
    }

    /// The text wrapper, if one is configured.
    pub fn text_factory(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Build a configuration from an already parsed table, such as the
    /// `[jsx]` section of a larger file.
    pub fn from_toml_table(table: toml::Table) -> Result<Self, ConfigError> {
        Ok(table.try_into()?)
    }

    /// The configuration to use for `source`.
    ///
    /// A `@jsx Name` pragma sets both element and component factories to
    /// `Name` and disables the text wrapper. Without a pragma (or with
    /// `pragma = false`) `self` is returned unchanged.
    pub fn resolve(&self, source: &str) -> Cow<'_, Config> {
        if !self.pragma {
            return Cow::Borrowed(self);
        }

        match detect_pragma(source) {
            Some(factory) => {
                tracing::debug!(factory, "@jsx pragma overrides factory names");
                Cow::Owned(Config {
                    element: factory.to_string(),
                    component: factory.to_string(),
                    text: None,
                    ..self.clone()
                })
            }
            None => Cow::Borrowed(self),
        }
    }
}

static PRAGMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/\*(?:[^*]|\*+[^*/])*?|//[^\n]*?)@jsx[ \t]+([^\s*]+)")
        .expect("Invalid pragma regex")
});

/// Find the factory named by the first `@jsx Name` comment in `source`.
///
/// The name is taken verbatim; it is not validated as an identifier.
pub fn detect_pragma(source: &str) -> Option<&str> {
    PRAGMA_RE
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_h_without_text_wrapper() {
        let config = Config::default();

        assert_eq!(config.element, "h");
        assert_eq!(config.component, "h");
        assert_eq!(config.text_factory(), None);
        assert_eq!(config.indent, "\t");
        assert_eq!(config.mode, ParseMode::Lenient);
    }

    #[test]
    fn empty_text_factory_is_disabled() {
        let config = Config::default().with_text("");
        assert_eq!(config.text_factory(), None);

        let config = Config::default().with_text("t");
        assert_eq!(config.text_factory(), Some("t"));
    }

    #[test]
    fn detects_block_comment_pragma() {
        assert_eq!(detect_pragma("/* @jsx h */\n<div/>"), Some("h"));
        assert_eq!(
            detect_pragma("/** @jsx React.createElement */"),
            Some("React.createElement")
        );
        assert_eq!(detect_pragma("/*@jsx m*/"), Some("m"));
    }

    #[test]
    fn detects_pragma_inside_doc_block() {
        let source = "/**\n * Renders the app.\n * @jsx dom\n */";
        assert_eq!(detect_pragma(source), Some("dom"));
    }

    #[test]
    fn detects_line_comment_pragma() {
        assert_eq!(detect_pragma("// @jsx preact.h\nlet a;"), Some("preact.h"));
    }

    #[test]
    fn ignores_pragma_outside_comments() {
        assert_eq!(detect_pragma("let jsx = '@jsx h';"), None);
    }

    #[test]
    fn accepts_unusual_pragma_targets_verbatim() {
        assert_eq!(detect_pragma("/* @jsx 1-not-an-ident */"), Some("1-not-an-ident"));
    }

    #[test]
    fn pragma_overrides_factories_and_text() {
        let config = Config::default()
            .with_element("el")
            .with_component("comp")
            .with_text("txt");

        let resolved = config.resolve("/* @jsx m */");

        assert_eq!(resolved.element, "m");
        assert_eq!(resolved.component, "m");
        assert_eq!(resolved.text_factory(), None);
        // the caller's value is untouched
        assert_eq!(config.element, "el");
    }

    #[test]
    fn pragma_can_be_disabled() {
        let config = Config::default().with_pragma(false);
        let resolved = config.resolve("/* @jsx m */");

        assert!(matches!(resolved, Cow::Borrowed(_)));
        assert_eq!(resolved.element, "h");
    }

    #[test]
    fn loads_from_toml() {
        let config = Config::from_toml_str(
            r#"
element = "createElement"
text = "text"
mode = "strict"
"#,
        )
        .unwrap();

        assert_eq!(config.element, "createElement");
        assert_eq!(config.component, "h");
        assert_eq!(config.text_factory(), Some("text"));
        assert_eq!(config.mode, ParseMode::Strict);
        assert!(config.pragma);
    }

    #[test]
    fn loads_from_table_section() {
        let file: toml::Table = "[jsx]\ncomponent = \"React.createElement\"\npragma = false\n"
            .parse()
            .unwrap();
        let Some(toml::Value::Table(section)) = file.get("jsx").cloned() else {
            panic!("missing [jsx] table");
        };

        let config = Config::from_toml_table(section).unwrap();

        assert_eq!(config.component, "React.createElement");
        assert_eq!(config.element, "h");
        assert!(!config.pragma);
    }

    #[test]
    fn rejects_mistyped_table_values() {
        let mut table = toml::Table::new();
        table.insert("mode".into(), toml::Value::String("loose".into()));

        let err = Config::from_toml_table(table).unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = Config::from_toml_str("element = [");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
