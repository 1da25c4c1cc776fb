//! Fixed support sources: the opt-in attribute and the generic marker stubs
//! that fail loudly when no wrapper was synthesized.

use crate::classify::{TASKS_NAMESPACE, TaskKind};
use crate::emit::{Fragment, SourceWriter, namespace_prefix};
use crate::runtime::MarkerMisuse;

pub const GENERATOR_NAME: &str = "tasksynth.support";

/// Attribute class name for an opt-in identifier (`ExtendTpl` → `ExtendTplAttribute`).
#[must_use]
pub fn attribute_class_name(opt_in: &str) -> String {
    if opt_in.ends_with("Attribute") {
        opt_in.to_string()
    } else {
        format!("{opt_in}Attribute")
    }
}

/// Dotted full name of the opt-in attribute.
#[must_use]
pub fn attribute_full_name(runtime_namespace: &str, opt_in: &str) -> String {
    let class_name = attribute_class_name(opt_in);
    if runtime_namespace.is_empty() {
        class_name
    } else {
        format!("{runtime_namespace}.{class_name}")
    }
}

fn support_id(runtime_namespace: &str, name: &str) -> String {
    let prefix = namespace_prefix(Some(runtime_namespace));
    if prefix.is_empty() {
        format!("{name}.g.cs")
    } else {
        format!("{prefix}_{name}.g.cs")
    }
}

fn open_support_file(runtime_namespace: &str, indent: usize) -> SourceWriter {
    let mut writer = SourceWriter::new(indent);
    writer.header(GENERATOR_NAME);
    if !runtime_namespace.is_empty() {
        writer
            .line(&format!("namespace {runtime_namespace};"))
            .blank_line();
    }
    writer
}

/// Declaration of the opt-in attribute.
#[must_use]
pub fn attribute_fragment(runtime_namespace: &str, opt_in: &str, indent: usize) -> Fragment {
    let class_name = attribute_class_name(opt_in);
    let mut writer = open_support_file(runtime_namespace, indent);
    writer.line(
        "[global::System.AttributeUsage(global::System.AttributeTargets.Class | \
         global::System.AttributeTargets.Struct | global::System.AttributeTargets.Interface, \
         AllowMultiple = false, Inherited = false)]",
    );
    writer.open_block(&format!(
        "internal sealed partial class {class_name} : global::System.Attribute"
    ));
    Fragment::new(support_id(runtime_namespace, &class_name), writer.finish())
}

/// Generic marker stubs for `Task<T>` and `ValueTask<T>`.
#[must_use]
pub fn marker_stubs_fragment(
    runtime_namespace: &str,
    marker: &str,
    opt_in: &str,
    indent: usize,
) -> Fragment {
    let attribute = attribute_full_name(runtime_namespace, opt_in);
    let mut writer = open_support_file(runtime_namespace, indent);
    writer.open_block("internal static partial class TaskExtensions");
    for (index, kind) in [TaskKind::Task, TaskKind::ValueTask].into_iter().enumerate() {
        if index > 0 {
            writer.blank_line();
        }
        let misuse = MarkerMisuse::new(kind, marker, attribute.as_str());
        writer.line(&format!(
            "public static T {marker}<T>(this global::{TASKS_NAMESPACE}.{}<T> task) =>",
            kind.name()
        ));
        writer.line(&format!(
            "    throw new global::System.InvalidOperationException({});",
            string_literal(&misuse.to_string())
        ));
    }
    Fragment::new(
        support_id(runtime_namespace, "TaskExtensions.Markers"),
        writer.finish(),
    )
}

/// Both support fragments, attribute first.
#[must_use]
pub fn support_fragments(
    runtime_namespace: &str,
    marker: &str,
    opt_in: &str,
    indent: usize,
) -> Vec<Fragment> {
    vec![
        attribute_fragment(runtime_namespace, opt_in, indent),
        marker_stubs_fragment(runtime_namespace, marker, opt_in, indent),
    ]
}

fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for ch in text.chars() {
        match ch {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            other => literal.push(other),
        }
    }
    literal.push('"');
    literal
}
