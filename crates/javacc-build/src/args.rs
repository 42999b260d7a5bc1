//! Translation of options into generator arguments.
//!
//! Both generators read options as `-NAME=value` tokens, and a later token
//! overrides an earlier one with the same name, so the emission order below is
//! fixed: scalar options first, in declaration order, extra arguments last.

use crate::config::GenerationConfig;
use crate::options::{Flag, JavaccOptions, JjTreeOptions};

pub const OUTPUT_DIRECTORY: &str = "OUTPUT_DIRECTORY";

/// Append `-NAME=true|false` if the flag is set.
pub fn push_flag(args: &mut Vec<String>, name: &str, flag: &Flag) {
    if let Some(value) = flag.value() {
        args.push(format!("-{name}={value}"));
    }
}

/// Append `-NAME=<n>` if a value is present.
pub fn push_integer(args: &mut Vec<String>, name: &str, value: Option<i32>) {
    if let Some(value) = value {
        args.push(format!("-{name}={value}"));
    }
}

/// Append `-NAME=<value>` if a value is present, including the empty string.
pub fn push_string(args: &mut Vec<String>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        args.push(format!("-{name}={value}"));
    }
}

/// Arguments of the main JavaCC pass, without output directory and grammar.
pub fn javacc_args(config: &GenerationConfig) -> Vec<String> {
    let mut args = javacc_options(&config.options);
    args.extend(config.args.iter().cloned());
    args
}

fn javacc_options(o: &JavaccOptions) -> Vec<String> {
    let mut args = Vec::new();

    push_flag(&mut args, "STATIC", &o.static_param);
    push_flag(&mut args, "SUPPORT_CLASS_VISIBILITY_PUBLIC", &o.support_class_visibility_public);
    push_flag(&mut args, "DEBUG_PARSER", &o.debug_parser);
    push_flag(&mut args, "DEBUG_LOOKAHEAD", &o.debug_lookahead);
    push_flag(&mut args, "DEBUG_TOKEN_MANAGER", &o.debug_token_manager);
    push_flag(&mut args, "ERROR_REPORTING", &o.error_reporting);
    push_flag(&mut args, "JAVA_UNICODE_ESCAPE", &o.java_unicode_escape);
    push_flag(&mut args, "UNICODE_INPUT", &o.unicode_input);
    push_flag(&mut args, "IGNORE_CASE", &o.ignore_case);
    push_flag(&mut args, "COMMON_TOKEN_ACTION", &o.common_token_action);
    push_flag(&mut args, "USER_TOKEN_MANAGER", &o.user_token_manager);
    push_flag(&mut args, "USER_CHAR_STREAM", &o.user_char_stream);
    push_flag(&mut args, "BUILD_PARSER", &o.build_parser);
    push_flag(&mut args, "BUILD_TOKEN_MANAGER", &o.build_token_manager);
    push_flag(&mut args, "TOKEN_MANAGER_USES_PARSER", &o.token_manager_uses_parser);
    push_flag(&mut args, "SANITY_CHECK", &o.sanity_check);
    push_flag(&mut args, "FORCE_LA_CHECK", &o.force_la_check);
    push_flag(&mut args, "CACHE_TOKENS", &o.cache_tokens);
    push_flag(&mut args, "KEEP_LINE_COLUMN", &o.keep_line_column);

    push_integer(&mut args, "CHOICE_AMBIGUITY_CHECK", o.choice_ambiguity_check);
    push_integer(&mut args, "OTHER_AMBIGUITY_CHECK", o.other_ambiguity_check);
    push_integer(&mut args, "LOOKAHEAD", o.lookahead);

    push_string(&mut args, "TOKEN_EXTENDS", o.token_extends.as_deref());
    push_string(&mut args, "TOKEN_FACTORY", o.token_factory.as_deref());
    push_string(&mut args, "JDK_VERSION", o.jdk_version.as_deref());

    args
}

/// Arguments of the JJTree pre-pass, or `None` if JJTree is not configured.
pub fn jjtree_args(config: &GenerationConfig) -> Option<Vec<String>> {
    let tree = config.jjtree();
    if !tree.is_configured() {
        return None;
    }

    let mut args = jjtree_options(tree);
    push_string(&mut args, "JDK_VERSION", config.options.jdk_version.as_deref());
    args.extend(tree.args.iter().cloned());
    Some(args)
}

fn jjtree_options(t: &JjTreeOptions) -> Vec<String> {
    let mut args = Vec::new();

    push_flag(&mut args, "BUILD_NODE_FILES", &t.build_node_files);
    push_flag(&mut args, "MULTI", &t.multi);
    push_flag(&mut args, "NODE_DEFAULT_VOID", &t.node_default_void);
    push_flag(&mut args, "NODE_SCOPE_HOOK", &t.node_scope_hook);
    push_flag(&mut args, "NODE_USES_PARSER", &t.node_uses_parser);
    push_flag(&mut args, "TRACK_TOKENS", &t.track_tokens);
    push_flag(&mut args, "VISITOR", &t.visitor);
    push_flag(&mut args, "STATIC", &t.static_param);

    push_string(&mut args, "NODE_CLASS", t.node_class.as_deref());
    push_string(&mut args, "NODE_PREFIX", Some(&t.node_prefix));
    push_string(&mut args, "NODE_EXTENDS", t.node_extends.as_deref());
    push_string(&mut args, "NODE_PACKAGE", t.node_package.as_deref());
    push_string(&mut args, "NODE_FACTORY", t.node_factory.as_deref());
    push_string(&mut args, "VISITOR_DATA_TYPE", t.visitor_data_type.as_deref());
    push_string(&mut args, "VISITOR_RETURN_TYPE", t.visitor_return_type.as_deref());
    push_string(&mut args, "VISITOR_EXCEPTION", t.visitor_exception.as_deref());

    args
}
