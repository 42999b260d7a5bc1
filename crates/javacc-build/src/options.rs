//! Scalar generator options.
//!
//! Every option is optional. Boolean-like options are stored as [`Flag`]s so
//! that "not set" stays distinguishable from "set to false": the generators
//! only see an option when the user actually supplied it.

use std::fmt;

use bon::Builder;
use serde::Deserialize;

/// Default value of the JJTree `NODE_PREFIX` option.
pub const DEFAULT_NODE_PREFIX: &str = "AST";

/// A three-valued boolean option.
///
/// The raw text is kept as supplied. A blank value means unset; any other
/// value reads as `true` only if it equals `"true"` ignoring ASCII case, so
/// `"yes"` or `"1"` read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Flag(String);

impl Flag {
    pub const fn unset() -> Self {
        Flag(String::new())
    }

    /// The text this flag was set from.
    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn is_set(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// `None` when unset, otherwise the coerced boolean.
    pub fn value(&self) -> Option<bool> {
        self.is_set().then(|| self.0.eq_ignore_ascii_case("true"))
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag(value.to_string())
    }
}

impl From<Option<bool>> for Flag {
    fn from(value: Option<bool>) -> Self {
        value.map(Flag::from).unwrap_or_default()
    }
}

impl From<&str> for Flag {
    fn from(value: &str) -> Self {
        Flag(value.to_owned())
    }
}

impl From<String> for Flag {
    fn from(value: String) -> Self {
        Flag(value)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(value) => Flag::from(value),
            Raw::Text(text) => Flag(text),
        })
    }
}

/// Integer options accept a number or its decimal text. Blank text means unset.
fn integer_option<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(Some(value)),
        Raw::Text(text) if text.trim().is_empty() => Ok(None),
        Raw::Text(text) => text.trim().parse().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("invalid integer option value `{text}`"))
        }),
    }
}

/// Options of the main JavaCC pass.
///
/// Build with [`JavaccOptions::builder`] or start from `Default` and assign
/// fields directly:
/// ```
/// use javacc_build::JavaccOptions;
///
/// let options = JavaccOptions::builder()
///     .static_param(false)
///     .lookahead(2)
///     .jdk_version("1.8")
///     .build();
/// assert_eq!(options.lookahead, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct JavaccOptions {
    #[builder(default, into)]
    #[serde(rename = "static")]
    pub static_param: Flag,
    #[builder(default, into)]
    pub support_class_visibility_public: Flag,
    #[builder(default, into)]
    pub debug_parser: Flag,
    #[builder(default, into)]
    pub debug_lookahead: Flag,
    #[builder(default, into)]
    pub debug_token_manager: Flag,
    #[builder(default, into)]
    pub error_reporting: Flag,
    #[builder(default, into)]
    pub java_unicode_escape: Flag,
    #[builder(default, into)]
    pub unicode_input: Flag,
    #[builder(default, into)]
    pub ignore_case: Flag,
    #[builder(default, into)]
    pub common_token_action: Flag,
    #[builder(default, into)]
    pub user_token_manager: Flag,
    #[builder(default, into)]
    pub user_char_stream: Flag,
    #[builder(default, into)]
    pub build_parser: Flag,
    #[builder(default, into)]
    pub build_token_manager: Flag,
    #[builder(default, into)]
    pub token_manager_uses_parser: Flag,
    #[builder(default, into)]
    pub sanity_check: Flag,
    #[builder(default, into)]
    pub force_la_check: Flag,
    #[builder(default, into)]
    pub cache_tokens: Flag,
    #[builder(default, into)]
    pub keep_line_column: Flag,

    #[serde(deserialize_with = "integer_option")]
    pub choice_ambiguity_check: Option<i32>,
    #[serde(deserialize_with = "integer_option")]
    pub other_ambiguity_check: Option<i32>,
    #[serde(deserialize_with = "integer_option")]
    pub lookahead: Option<i32>,

    #[builder(into)]
    pub token_extends: Option<String>,
    #[builder(into)]
    pub token_factory: Option<String>,
    /// Target JDK of the generated code. Passed to JJTree as well.
    #[builder(into)]
    pub jdk_version: Option<String>,
}

/// Options of the JJTree pre-pass.
///
/// Only take effect once attached with
/// [`GenerationConfig::set_jjtree`](crate::GenerationConfig::set_jjtree),
/// which marks them configured.
#[derive(Debug, Clone, PartialEq, Builder, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct JjTreeOptions {
    #[builder(skip)]
    #[serde(skip)]
    configured: bool,

    #[builder(default, into)]
    pub build_node_files: Flag,
    #[builder(default, into)]
    pub multi: Flag,
    #[builder(default, into)]
    pub node_default_void: Flag,
    #[builder(default, into)]
    pub node_scope_hook: Flag,
    #[builder(default, into)]
    pub node_uses_parser: Flag,
    #[builder(default, into)]
    pub track_tokens: Flag,
    #[builder(default, into)]
    pub visitor: Flag,
    #[builder(default, into)]
    #[serde(rename = "static")]
    pub static_param: Flag,

    #[builder(into)]
    pub node_class: Option<String>,
    #[builder(default = DEFAULT_NODE_PREFIX.to_owned(), into)]
    pub node_prefix: String,
    #[builder(into)]
    pub node_extends: Option<String>,
    #[builder(into)]
    pub node_package: Option<String>,
    #[builder(into)]
    pub node_factory: Option<String>,
    #[builder(into)]
    pub visitor_data_type: Option<String>,
    #[builder(into)]
    pub visitor_return_type: Option<String>,
    #[builder(into)]
    pub visitor_exception: Option<String>,

    #[builder(default)]
    pub args: Vec<String>,
}

impl Default for JjTreeOptions {
    fn default() -> Self {
        Self {
            configured: false,
            build_node_files: Flag::unset(),
            multi: Flag::unset(),
            node_default_void: Flag::unset(),
            node_scope_hook: Flag::unset(),
            node_uses_parser: Flag::unset(),
            track_tokens: Flag::unset(),
            visitor: Flag::unset(),
            static_param: Flag::unset(),
            node_class: None,
            node_prefix: DEFAULT_NODE_PREFIX.to_owned(),
            node_extends: None,
            node_package: None,
            node_factory: None,
            visitor_data_type: None,
            visitor_return_type: None,
            visitor_exception: None,
            args: Vec::new(),
        }
    }
}

impl JjTreeOptions {
    /// Whether the JJTree pre-pass runs.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub(crate) fn mark_configured(&mut self) {
        self.configured = true;
    }

    pub fn add_arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    pub fn add_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
    }
}
