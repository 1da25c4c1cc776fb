//! Resolved operation trees for member bodies.

use serde::{Deserialize, Serialize};

use super::types::TypeRef;

/// A node of a member body, annotated with the static type the host resolved
/// for it (statements carry none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Block {
        #[serde(default)]
        statements: Vec<Operation>,
    },
    Return {
        #[serde(default)]
        value: Option<Box<Operation>>,
    },
    ExpressionStatement {
        expression: Box<Operation>,
    },
    LocalDeclaration {
        name: String,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
        #[serde(default)]
        initializer: Option<Box<Operation>>,
    },
    Invocation {
        callee: Box<Operation>,
        #[serde(default)]
        arguments: Vec<Operation>,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
    },
    /// Simple member access `receiver.name`.
    MemberAccess {
        receiver: Box<Operation>,
        name: String,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
    },
    /// Null-conditional access `receiver?.name`.
    ConditionalAccess {
        receiver: Box<Operation>,
        name: String,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
    },
    Identifier {
        name: String,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
    },
    Literal {
        #[serde(default)]
        text: String,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
    },
    Await {
        operand: Box<Operation>,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
    },
    Lambda {
        #[serde(default)]
        parameters: Vec<String>,
        body: Box<Operation>,
    },
    Other {
        #[serde(default)]
        children: Vec<Operation>,
        #[serde(default, rename = "type")]
        ty: Option<TypeRef>,
    },
}

impl Operation {
    #[must_use]
    pub fn identifier(name: &str, ty: Option<TypeRef>) -> Self {
        Operation::Identifier {
            name: name.to_string(),
            ty,
        }
    }

    #[must_use]
    pub fn member(receiver: Operation, name: &str, ty: Option<TypeRef>) -> Self {
        Operation::MemberAccess {
            receiver: Box::new(receiver),
            name: name.to_string(),
            ty,
        }
    }

    #[must_use]
    pub fn call(callee: Operation, arguments: Vec<Operation>, ty: Option<TypeRef>) -> Self {
        Operation::Invocation {
            callee: Box::new(callee),
            arguments,
            ty,
        }
    }

    #[must_use]
    pub fn block(statements: Vec<Operation>) -> Self {
        Operation::Block { statements }
    }

    #[must_use]
    pub fn expression(expression: Operation) -> Self {
        Operation::ExpressionStatement {
            expression: Box::new(expression),
        }
    }

    /// Static type resolved by the host, if the node is an expression.
    #[must_use]
    pub fn static_type(&self) -> Option<&TypeRef> {
        match self {
            Operation::Invocation { ty, .. }
            | Operation::MemberAccess { ty, .. }
            | Operation::ConditionalAccess { ty, .. }
            | Operation::Identifier { ty, .. }
            | Operation::Literal { ty, .. }
            | Operation::Await { ty, .. }
            | Operation::Other { ty, .. } => ty.as_ref(),
            Operation::Block { .. }
            | Operation::Return { .. }
            | Operation::ExpressionStatement { .. }
            | Operation::LocalDeclaration { .. }
            | Operation::Lambda { .. } => None,
        }
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self) -> Vec<&Operation> {
        match self {
            Operation::Block { statements } => statements.iter().collect(),
            Operation::Return { value } => value.iter().map(AsRef::as_ref).collect(),
            Operation::ExpressionStatement { expression } => vec![expression.as_ref()],
            Operation::LocalDeclaration { initializer, .. } => {
                initializer.iter().map(AsRef::as_ref).collect()
            }
            Operation::Invocation {
                callee, arguments, ..
            } => std::iter::once(callee.as_ref()).chain(arguments).collect(),
            Operation::MemberAccess { receiver, .. }
            | Operation::ConditionalAccess { receiver, .. } => vec![receiver.as_ref()],
            Operation::Await { operand, .. } => vec![operand.as_ref()],
            Operation::Lambda { body, .. } => vec![body.as_ref()],
            Operation::Other { children, .. } => children.iter().collect(),
            Operation::Identifier { .. } | Operation::Literal { .. } => Vec::new(),
        }
    }

    /// Every node below `self`, depth-first pre-order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack = self.children();
        stack.reverse();
        Descendants { stack }
    }
}

/// Pre-order iterator over an operation subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a Operation>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Operation;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children = node.children();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}
