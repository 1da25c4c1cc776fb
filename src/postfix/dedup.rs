use std::collections::{HashMap, HashSet};

use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};

use super::model::{AwaitExtensionModel, AwaitInvocationModel};

/// Collapse invocations to one extension per container identity.
/// The first occurrence wins and first-seen order is kept. A later
/// container whose wrapper would reuse an earlier fragment id gets a
/// digest-suffixed wrapper name instead.
pub fn deduplicate(
    invocations: Vec<AwaitInvocationModel>,
    token: &CancellationToken,
) -> Result<Vec<AwaitExtensionModel>, CancellationError> {
    let mut seen = HashSet::new();
    let mut claimed: HashMap<String, String> = HashMap::new();
    let mut extensions = Vec::new();
    for invocation in invocations {
        check_cancellation(token, "postfix.dedup")?;
        if !seen.insert(invocation.container.clone()) {
            continue;
        }
        let mut extension = AwaitExtensionModel::from_invocation(invocation);
        if let Some(owner) = claimed.get(&extension.fragment_id()) {
            tracing::debug!(
                target: "pipeline",
                stage = "postfix.dedup",
                wrapper = %extension.wrapper_name,
                container = %extension.container,
                owner = %owner,
                "wrapper name taken by another container"
            );
            extension.disambiguate();
        }
        claimed.insert(extension.fragment_id(), extension.container.clone());
        extensions.push(extension);
    }
    Ok(extensions)
}
