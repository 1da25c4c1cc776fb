use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};
use crate::classify::TASKS_NAMESPACE;
use crate::emit::{Fragment, SourceWriter};

use super::model::AwaitExtensionModel;

pub const GENERATOR_NAME: &str = "tasksynth.postfix";

const INLINE_ATTRIBUTE: &str = "[global::System.Runtime.CompilerServices.MethodImpl(\
global::System.Runtime.CompilerServices.MethodImplOptions.AggressiveInlining)]";
const PRIORITY_ATTRIBUTE: &str =
    "[global::System.Runtime.CompilerServices.OverloadResolutionPriority(1)]";

/// Render the wrapper struct and its marker overload for one container.
pub fn emit_wrapper(
    extension: &AwaitExtensionModel,
    marker: &str,
    indent: usize,
    token: &CancellationToken,
) -> Result<Fragment, CancellationError> {
    check_cancellation(token, "postfix.emit")?;

    let wrapped = &extension.wrapped;
    let wrapper = &extension.wrapper_name;
    let container = &extension.container;

    let mut writer = SourceWriter::new(indent);
    writer.header(GENERATOR_NAME);
    if let Some(namespace) = &wrapped.namespace {
        writer.line(&format!("namespace {namespace};")).blank_line();
    }

    let accessibility = wrapped.accessibility.keyword();
    let struct_header = if accessibility.is_empty() {
        format!("readonly struct {wrapper}")
    } else {
        format!("{accessibility} readonly struct {wrapper}")
    };
    writer.open_block(&struct_header);
    writer.line(&format!("public {wrapper}({container} task) => _task = task;"));
    writer.line(&format!("private readonly {container} _task;"));
    for property in &wrapped.properties {
        check_cancellation(token, "postfix.emit.property")?;
        let name = &property.name;
        let accessor_type = format!("global::{TASKS_NAMESPACE}.ValueTask<{}>", property.ty);
        writer.blank_line();
        writer.line(&format!("public {accessor_type} {name} => __Get{name}();"));
        writer.line(INLINE_ATTRIBUTE);
        writer.line(&format!(
            "private async {accessor_type} __Get{name}() => (await _task).{name};"
        ));
    }
    writer.close_block();
    writer.blank_line();

    writer.open_block("internal static partial class TaskExtensions");
    writer.line(PRIORITY_ATTRIBUTE);
    writer.line(&format!(
        "public static {wrapper} {marker}(this {container} task) => new(task);"
    ));

    Ok(Fragment::new(extension.fragment_id(), writer.finish()))
}
