//! Closed operator sets.
//!
//! Every operator family is a closed enum, so the De Morgan dual table, the
//! comparison inverse table and the display forms are total by construction - a
//! missing case is a compile error, not a latent runtime defect.

use strum::{Display, EnumIter};

use crate::analysis::ir::precedence::Precedence;

/// Binary boolean combination operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BoolOp {
    /// Logical and, short-circuiting
    #[strum(serialize = "&&")]
    And,
    /// Logical or, short-circuiting
    #[strum(serialize = "||")]
    Or,
}

impl BoolOp {
    /// Returns the display glyph.
    #[must_use]
    pub const fn show_as(self) -> &'static str {
        match self {
            BoolOp::And => "&&",
            BoolOp::Or => "||",
        }
    }

    /// Returns the De Morgan dual operator.
    ///
    /// Total over the closed set; pushing a negation through a combination swaps the
    /// operator for its dual. The dual of the dual is the operator itself.
    #[must_use]
    pub const fn demorgan_dual(self) -> BoolOp {
        match self {
            BoolOp::And => BoolOp::Or,
            BoolOp::Or => BoolOp::And,
        }
    }

    /// Returns the precedence this operator renders at.
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            BoolOp::And => Precedence::LogicalAnd,
            BoolOp::Or => Precedence::LogicalOr,
        }
    }
}

/// Atomic comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum CompOp {
    /// `==`
    #[strum(serialize = "==")]
    Eq,
    /// `!=`
    #[strum(serialize = "!=")]
    Ne,
    /// `<`
    #[strum(serialize = "<")]
    Lt,
    /// `<=`
    #[strum(serialize = "<=")]
    Le,
    /// `>`
    #[strum(serialize = ">")]
    Gt,
    /// `>=`
    #[strum(serialize = ">=")]
    Ge,
}

impl CompOp {
    /// Returns the display glyph.
    #[must_use]
    pub const fn show_as(self) -> &'static str {
        match self {
            CompOp::Eq => "==",
            CompOp::Ne => "!=",
            CompOp::Lt => "<",
            CompOp::Le => "<=",
            CompOp::Gt => ">",
            CompOp::Ge => ">=",
        }
    }

    /// Returns the logically inverted operator.
    ///
    /// Involutive: `op.inverse().inverse() == op`. Comparisons negate by operator
    /// inversion rather than by wrapping in a NOT node, which keeps negation cheap
    /// and keeps De Morgan application structurally involutive.
    #[must_use]
    pub const fn inverse(self) -> CompOp {
        match self {
            CompOp::Eq => CompOp::Ne,
            CompOp::Ne => CompOp::Eq,
            CompOp::Lt => CompOp::Ge,
            CompOp::Le => CompOp::Gt,
            CompOp::Gt => CompOp::Le,
            CompOp::Ge => CompOp::Lt,
        }
    }

    /// Returns the precedence this operator renders at.
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            CompOp::Eq | CompOp::Ne => Precedence::Equality,
            _ => Precedence::Relational,
        }
    }
}

/// Binary arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ArithOp {
    /// `+`
    #[strum(serialize = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    Sub,
    /// `*`
    #[strum(serialize = "*")]
    Mul,
    /// `/`
    #[strum(serialize = "/")]
    Div,
    /// `%`
    #[strum(serialize = "%")]
    Rem,
    /// `&`
    #[strum(serialize = "&")]
    BitAnd,
    /// `|`
    #[strum(serialize = "|")]
    BitOr,
    /// `^`
    #[strum(serialize = "^")]
    BitXor,
    /// `<<`
    #[strum(serialize = "<<")]
    Shl,
    /// `>>`
    #[strum(serialize = ">>")]
    Shr,
    /// `>>>`
    #[strum(serialize = ">>>")]
    Ushr,
}

impl ArithOp {
    /// Returns the display glyph.
    #[must_use]
    pub const fn show_as(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
            ArithOp::BitAnd => "&",
            ArithOp::BitOr => "|",
            ArithOp::BitXor => "^",
            ArithOp::Shl => "<<",
            ArithOp::Shr => ">>",
            ArithOp::Ushr => ">>>",
        }
    }

    /// Returns the precedence this operator renders at.
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            ArithOp::Add | ArithOp::Sub => Precedence::Additive,
            ArithOp::Mul | ArithOp::Div | ArithOp::Rem => Precedence::Multiplicative,
            ArithOp::BitAnd => Precedence::BitwiseAnd,
            ArithOp::BitOr => Precedence::BitwiseOr,
            ArithOp::BitXor => Precedence::BitwiseXor,
            ArithOp::Shl | ArithOp::Shr | ArithOp::Ushr => Precedence::Shift,
        }
    }
}

/// Unary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum UnaryArithOp {
    /// Arithmetic negation `-`
    #[strum(serialize = "-")]
    Neg,
    /// Bitwise complement `~`
    #[strum(serialize = "~")]
    BitNot,
}

impl UnaryArithOp {
    /// Returns the display glyph.
    #[must_use]
    pub const fn show_as(self) -> &'static str {
        match self {
            UnaryArithOp::Neg => "-",
            UnaryArithOp::BitNot => "~",
        }
    }
}
