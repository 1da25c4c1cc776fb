use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};
use crate::host::{MethodSymbol, Snapshot, TypeDeclaration, TypeKind};

/// A method declared inside a type that can receive generated members.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub declaration: &'a TypeDeclaration,
    pub method: &'a MethodSymbol,
}

/// Enumerate non-`void` methods of `partial` class, struct and record
/// declarations, in snapshot order.
pub fn scan_candidates<'a>(
    snapshot: &'a Snapshot,
    token: &CancellationToken,
) -> Result<Vec<Candidate<'a>>, CancellationError> {
    let mut candidates = Vec::new();
    for declaration in snapshot.declarations() {
        check_cancellation(token, "cancellable.scan")?;
        if !accepts_generated_members(declaration) {
            tracing::trace!(
                target: "pipeline",
                stage = "cancellable.scan",
                declaration = %declaration.name,
                "skipping declaration that cannot be extended"
            );
            continue;
        }
        for method in declaration.methods() {
            check_cancellation(token, "cancellable.scan.member")?;
            if method.return_type.is_some() {
                candidates.push(Candidate {
                    declaration,
                    method,
                });
            }
        }
    }
    Ok(candidates)
}

fn accepts_generated_members(declaration: &TypeDeclaration) -> bool {
    declaration.is_partial
        && matches!(
            declaration.kind,
            TypeKind::Class | TypeKind::Struct | TypeKind::Record | TypeKind::RecordStruct
        )
}
