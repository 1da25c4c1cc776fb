use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};
use crate::classify::generic_container;
use crate::host::{Operation, SemanticModel, TypeDeclaration, TypeRef};

use super::model::{AwaitInvocationModel, WrappedTypeModel};

/// Receiver of a zero-argument `receiver.<marker>()` call.
#[must_use]
pub fn marker_receiver<'a>(operation: &'a Operation, marker: &str) -> Option<&'a Operation> {
    let Operation::Invocation {
        callee, arguments, ..
    } = operation
    else {
        return None;
    };
    if !arguments.is_empty() {
        return None;
    }
    match callee.as_ref() {
        Operation::MemberAccess { receiver, name, .. } if name == marker => Some(receiver),
        _ => None,
    }
}

/// Walk every method body of `declaration` and resolve each marker call.
///
/// Receivers typed `Task<T>` / `ValueTask<T>` with a named `T` are stub
/// usages. Any other named receiver is taken to be the payload of a
/// generated wrapper accessor. Unresolved and non-named receivers are
/// skipped.
pub fn scan_declaration<M: SemanticModel + ?Sized>(
    declaration: &TypeDeclaration,
    semantic: &M,
    marker: &str,
    token: &CancellationToken,
) -> Result<Vec<AwaitInvocationModel>, CancellationError> {
    let mut invocations = Vec::new();
    for method in declaration.methods() {
        check_cancellation(token, "postfix.scan.member")?;
        let Some(body) = &method.body else {
            continue;
        };
        for operation in body.descendants() {
            check_cancellation(token, "postfix.scan.operation")?;
            let Some(receiver) = marker_receiver(operation, marker) else {
                continue;
            };
            let Some(receiver_type) = semantic.type_of(receiver) else {
                tracing::trace!(
                    target: "pipeline",
                    stage = "postfix.scan",
                    declaration = %declaration.name,
                    method = %method.name,
                    "skipping marker call with unresolved receiver"
                );
                continue;
            };
            if let Some(invocation) = classify_receiver(&receiver_type, semantic, token)? {
                invocations.push(invocation);
            }
        }
    }
    Ok(invocations)
}

/// Interpret a marker call receiver typed `receiver_type`.
pub fn classify_receiver<M: SemanticModel + ?Sized>(
    receiver_type: &TypeRef,
    semantic: &M,
    token: &CancellationToken,
) -> Result<Option<AwaitInvocationModel>, CancellationError> {
    let Some(named) = receiver_type.as_named() else {
        return Ok(None);
    };
    let stub = generic_container(receiver_type)
        .and_then(|(kind, argument)| argument.as_named().map(|payload| (kind, payload)));
    if let Some((kind, payload)) = stub {
        let wrapped = WrappedTypeModel::create(payload, semantic, token)?;
        return Ok(Some(AwaitInvocationModel::stub(receiver_type, kind, wrapped)));
    }
    let wrapped = WrappedTypeModel::create(named, semantic, token)?;
    Ok(Some(AwaitInvocationModel::chained(wrapped)))
}
