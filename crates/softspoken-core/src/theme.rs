//! Style themes: semantic output roles mapped to style names.
//!
//! A [`Theme`] is built once, validated eagerly, and never changes afterwards.
//! Overrides are normalized on the way in:
//!
//! - a single name becomes a one-element list
//! - a falsy entry (`null`, `false`, `""`, `[]`) falls back to `["dim"]`
//! - an unknown style name is rejected with [`SoftSpokenError::UnknownStyle`]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SoftSpokenError};
use crate::style::StyleSet;

/// Style used for roles whose override is falsy.
pub const FALLBACK_STYLE: &str = "dim";

/// Semantic output roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Log,
    Success,
    Caption,
    Notice,
    Error,
    Debug,
    PropertyKey,
    PropertyValue,
    DefinitionKey,
    DefinitionValue,
    TableHeader,
    SpinnerSpinning,
    SpinnerDone,
    ListItemBullet,
    ListItemValue,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 15] = [
        Role::Log,
        Role::Success,
        Role::Caption,
        Role::Notice,
        Role::Error,
        Role::Debug,
        Role::PropertyKey,
        Role::PropertyValue,
        Role::DefinitionKey,
        Role::DefinitionValue,
        Role::TableHeader,
        Role::SpinnerSpinning,
        Role::SpinnerDone,
        Role::ListItemBullet,
        Role::ListItemValue,
    ];

    /// The camelCase name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Success => "success",
            Self::Caption => "caption",
            Self::Notice => "notice",
            Self::Error => "error",
            Self::Debug => "debug",
            Self::PropertyKey => "propertyKey",
            Self::PropertyValue => "propertyValue",
            Self::DefinitionKey => "definitionKey",
            Self::DefinitionValue => "definitionValue",
            Self::TableHeader => "tableHeader",
            Self::SpinnerSpinning => "spinnerSpinning",
            Self::SpinnerDone => "spinnerDone",
            Self::ListItemBullet => "listItemBullet",
            Self::ListItemValue => "listItemValue",
        }
    }

    fn default_styles(self) -> &'static [&'static str] {
        match self {
            Self::Log => &["reset"],
            Self::Success => &["bold"],
            Self::Caption => &["underline"],
            Self::Notice => &["yellow"],
            Self::Error => &["red"],
            Self::Debug => &["dim"],
            Self::PropertyKey => &["dim"],
            Self::PropertyValue => &["reset"],
            Self::DefinitionKey => &["reset"],
            Self::DefinitionValue => &["dim"],
            Self::TableHeader => &["dim"],
            Self::SpinnerSpinning => &["dim"],
            Self::SpinnerDone => &["dim"],
            Self::ListItemBullet => &["dim"],
            Self::ListItemValue => &["reset"],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SoftSpokenError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| SoftSpokenError::InvalidTheme(format!("unknown role `{s}`")))
    }
}

/// A raw theme entry as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleSpec {
    /// `"yellow"`
    One(String),
    /// `["white", "bgRed"]`
    Many(Vec<String>),
    /// `false` (or `true`, which is rejected)
    Flag(bool),
}

impl RoleSpec {
    /// Normalize to a non-empty list of names.
    fn normalize(spec: Option<&RoleSpec>, role: Role) -> Result<Vec<String>> {
        let names = match spec {
            None | Some(RoleSpec::Flag(false)) => vec![],
            Some(RoleSpec::Flag(true)) => {
                return Err(SoftSpokenError::InvalidTheme(format!(
                    "role `{role}` must be a style name or a list of style names, not `true`"
                )));
            }
            Some(RoleSpec::One(name)) if name.is_empty() => vec![],
            Some(RoleSpec::One(name)) => vec![name.clone()],
            Some(RoleSpec::Many(names)) => names.clone(),
        };

        if names.is_empty() {
            Ok(vec![FALLBACK_STYLE.to_string()])
        } else {
            Ok(names)
        }
    }
}

impl From<&str> for RoleSpec {
    fn from(name: &str) -> Self {
        Self::One(name.to_string())
    }
}

impl From<Vec<&str>> for RoleSpec {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_string).collect())
    }
}

/// Partial theme override: `role -> entry`. A `null` entry is kept as `None`
/// so it can fall back like any other falsy value.
pub type ThemeOverrides = BTreeMap<Role, Option<RoleSpec>>;

/// A fully normalized, validated theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    styles: Vec<StyleSet>,
}

impl Theme {
    /// Apply overrides on top of the default theme.
    ///
    /// Fails on the first unknown style name or malformed entry.
    pub fn with_overrides(overrides: &ThemeOverrides) -> Result<Self> {
        let styles = Role::ALL
            .into_iter()
            .map(|role| {
                let names = match overrides.get(&role) {
                    Some(spec) => RoleSpec::normalize(spec.as_ref(), role)?,
                    None => role
                        .default_styles()
                        .iter()
                        .map(|name| (*name).to_string())
                        .collect(),
                };
                StyleSet::parse(&names)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { styles })
    }

    /// Parse overrides from JSON, e.g. `{"notice": "yellow", "error": ["white", "bgRed"]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: ThemeOverrides = serde_json::from_str(json)
            .map_err(|e| SoftSpokenError::InvalidTheme(e.to_string()))?;
        Self::with_overrides(&overrides)
    }

    /// Styles for a role. Always non-empty.
    pub fn styles(&self, role: Role) -> &StyleSet {
        &self.styles[role.index()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::with_overrides(&ThemeOverrides::new()).expect("default theme styles are valid")
    }
}

/// A theme paired with the decision whether to emit escape codes at all.
#[derive(Debug, Clone)]
pub struct Painter {
    theme: Theme,
    enabled: bool,
}

impl Painter {
    pub fn new(theme: Theme, enabled: bool) -> Self {
        Self { theme, enabled }
    }

    /// Style `text` for `role`, or return it untouched when colors are off.
    pub fn paint(&self, role: Role, text: &str) -> String {
        if self.enabled {
            self.theme.styles(role).apply(text)
        } else {
            text.to_string()
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn colors_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AnsiColor, StyleName};

    #[test]
    fn test_default_theme_roles_non_empty() {
        let theme = Theme::default();
        for role in Role::ALL {
            assert!(!theme.styles(role).is_empty(), "role {role} is empty");
        }
        assert_eq!(
            theme.styles(Role::Notice).names(),
            &[StyleName::Fg(AnsiColor::Yellow)]
        );
        assert!(theme.styles(Role::Log).is_plain());
    }

    #[test]
    fn test_overrides_normalize_scalars_and_falsy() {
        let mut overrides = ThemeOverrides::new();
        overrides.insert(Role::Notice, Some("yellow".into()));
        overrides.insert(Role::Error, Some(vec!["white", "bgRed"].into()));
        overrides.insert(Role::Success, None);
        overrides.insert(Role::Caption, Some(RoleSpec::Flag(false)));
        overrides.insert(Role::Log, Some(RoleSpec::One(String::new())));

        let theme = Theme::with_overrides(&overrides).unwrap();
        assert_eq!(theme.styles(Role::Error).names().len(), 2);
        assert_eq!(theme.styles(Role::Success).names(), &[StyleName::Dim]);
        assert_eq!(theme.styles(Role::Caption).names(), &[StyleName::Dim]);
        assert_eq!(theme.styles(Role::Log).names(), &[StyleName::Dim]);
        // Untouched roles keep their defaults.
        assert_eq!(theme.styles(Role::TableHeader).names(), &[StyleName::Dim]);
    }

    #[test]
    fn test_unknown_style_fails_fast() {
        let mut overrides = ThemeOverrides::new();
        overrides.insert(Role::Notice, Some("sparkly".into()));
        let err = Theme::with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, SoftSpokenError::UnknownStyle(ref n) if n == "sparkly"));
    }

    #[test]
    fn test_true_is_rejected() {
        let mut overrides = ThemeOverrides::new();
        overrides.insert(Role::Notice, Some(RoleSpec::Flag(true)));
        assert!(matches!(
            Theme::with_overrides(&overrides),
            Err(SoftSpokenError::InvalidTheme(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let theme = Theme::from_json(
            r#"{"notice": "yellow", "error": ["white", "bgRed"], "spinnerDone": null}"#,
        )
        .unwrap();
        assert_eq!(theme.styles(Role::Error).names().len(), 2);
        assert_eq!(theme.styles(Role::SpinnerDone).names(), &[StyleName::Dim]);

        assert!(Theme::from_json(r#"{"nonsense": "bold"}"#).is_err());
        assert!(Theme::from_json(r#"{"log": 42}"#).is_err());
    }

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("tableheader".parse::<Role>().is_err());
    }

    #[test]
    fn test_painter_respects_enabled() {
        let painter = Painter::new(Theme::default(), false);
        assert_eq!(painter.paint(Role::Error, "boom"), "boom");

        let painter = Painter::new(Theme::default(), true);
        assert_ne!(painter.paint(Role::Error, "boom"), "boom");
        assert_eq!(painter.paint(Role::Log, "calm"), "calm");
    }
}
