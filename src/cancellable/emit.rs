use std::collections::HashMap;

use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};
use crate::emit::{Fragment, SourceWriter};

use super::model::{CancellableMethodModel, ContainingTypeDescriptor, push_type_parameters};

pub const GENERATOR_NAME: &str = "tasksynth.cancellable";

/// Group models by containing type, preserving first-seen order of types and
/// the relative order of methods within each type.
#[must_use]
pub fn group_by_containing_type(
    models: Vec<CancellableMethodModel>,
) -> Vec<Vec<CancellableMethodModel>> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<CancellableMethodModel>> = Vec::new();
    for model in models {
        let key = model.containing_type.display();
        match positions.get(&key) {
            Some(&position) => groups[position].push(model),
            None => {
                positions.insert(key, groups.len());
                groups.push(vec![model]);
            }
        }
    }
    groups
}

/// Render one fragment holding the overloads for a single containing type.
pub fn emit_group(
    group: &[CancellableMethodModel],
    indent: usize,
    token: &CancellationToken,
) -> Result<Option<Fragment>, CancellationError> {
    check_cancellation(token, "cancellable.emit")?;
    let Some(first) = group.first() else {
        return Ok(None);
    };
    let containing = &first.containing_type;

    let mut writer = SourceWriter::new(indent);
    writer.header(GENERATOR_NAME);
    if let Some(namespace) = &containing.namespace {
        writer.line(&format!("namespace {namespace};")).blank_line();
    }
    for outer in &containing.outer_types {
        let mut header = format!("partial {} {}", outer.kind.keyword(), outer.name);
        push_type_parameters(&mut header, &outer.type_parameters);
        writer.open_block(&header);
    }
    writer.open_block(&type_header(containing));

    for (index, model) in group.iter().enumerate() {
        check_cancellation(token, "cancellable.emit.method")?;
        if index > 0 {
            writer.blank_line();
        }
        append_method(&mut writer, model);
    }

    let source = writer.finish();
    Ok(Some(Fragment::new(containing.fragment_id(), source)))
}

fn type_header(containing: &ContainingTypeDescriptor) -> String {
    let mut header = format!("partial {} {}", containing.kind.keyword(), containing.name);
    push_type_parameters(&mut header, &containing.type_parameters);
    header
}

fn append_method(writer: &mut SourceWriter, model: &CancellableMethodModel) {
    let mut signature = String::new();
    let accessibility = model.accessibility.keyword();
    if !accessibility.is_empty() {
        signature.push_str(accessibility);
        signature.push(' ');
    }
    if model.is_static {
        signature.push_str("static ");
    }
    let parameters = model
        .parameters
        .iter()
        .map(|parameter| parameter.syntax.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    signature.push_str(&format!(
        "{} {}({parameters})",
        model.return_type,
        model.generic_name()
    ));

    let mut arguments: Vec<String> = model
        .parameters
        .iter()
        .map(super::model::ParameterDescriptor::forwarding_argument)
        .collect();
    arguments.push(format!("{}: __ct", model.cancellation_parameter.name));

    writer.open_block(&signature);
    writer.line("var __cts = new global::System.Threading.CancellationTokenSource();");
    writer.line("var __ct = __cts.Token;");
    writer.line(&format!(
        "var __task = {}({});",
        model.generic_name(),
        arguments.join(", ")
    ));
    writer.line(&format!(
        "var __result = new {}(__task, __cts);",
        model.return_type
    ));
    writer.line("return __result;");
    writer.close_block();
}
