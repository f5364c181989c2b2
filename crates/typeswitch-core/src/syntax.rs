//! Resolved syntax of one compilation unit.
//!
//! Only the statement shapes the analysis cares about are modelled; any
//! other statement a front-end meets becomes a [`Stmt::Block`] of its
//! nested statements or a [`Stmt::Other`] leaf. Static types are folded
//! into [`Expr`] nodes, so the tree carries its own type information.

use serde::{Deserialize, Serialize};

use crate::types::{Position, Type};

/// One source file of the package under analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    /// Whether the file carries a `Code generated ... DO NOT EDIT.` header.
    #[serde(default)]
    pub generated: bool,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stmt")]
pub enum Stmt {
    /// Any statement list: function bodies, blocks, branches of `if`/`for`.
    Block { stmts: Vec<Stmt> },
    /// A bare expression statement.
    Expr { expr: Expr },
    /// An assignment or short variable declaration.
    Assign(AssignStmt),
    TypeSwitch(TypeSwitchStmt),
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignStmt {
    pub lhs: Vec<String>,
    pub rhs: Vec<Expr>,
    /// `:=` rather than `=`.
    pub define: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSwitchStmt {
    /// Position of the `switch` keyword.
    pub pos: Position,
    /// The introducing guard: `x.(type)` or `v := x.(type)`.
    pub guard: Box<Stmt>,
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseClause {
    pub pos: Position,
    /// Listed types; `None` marks the default clause.
    pub list: Option<Vec<Expr>>,
    pub body: Vec<Stmt>,
}

/// An expression together with its static type, when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "expr")]
pub enum ExprKind {
    /// `operand.(T)`; `asserted` is `None` for the `.(type)` of a switch guard.
    TypeAssert {
        operand: Box<Expr>,
        asserted: Option<Type>,
    },
    Ident { name: String },
    /// A type used in expression position, e.g. a case clause entry.
    Type,
    Other { text: String },
}

impl Stmt {
    pub fn block(stmts: Vec<Stmt>) -> Self {
        Stmt::Block { stmts }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Option<Type>) -> Self {
        Self { kind, ty }
    }

    pub fn ident(name: &str, ty: Option<Type>) -> Self {
        Self::new(ExprKind::Ident { name: name.to_string() }, ty)
    }

    /// A type expression; its static type is the type itself.
    pub fn type_expr(ty: Type) -> Self {
        Self::new(ExprKind::Type, Some(ty))
    }

    /// The `x.(type)` guard expression around `operand`.
    pub fn type_switch_guard(operand: Expr) -> Self {
        Self::new(
            ExprKind::TypeAssert {
                operand: Box::new(operand),
                asserted: None,
            },
            None,
        )
    }
}

impl CaseClause {
    pub fn is_default(&self) -> bool {
        self.list.is_none()
    }
}
