//! Operator precedence for emission.
//!
//! Precedence is only consulted when a node renders a child: the child decides its
//! own parenthesization from the level passed down. The binary boolean combination
//! node ignores this machinery and parenthesizes unconditionally; a later formatting
//! pass may strip redundant parentheses.

/// Precedence levels, weakest binding first.
///
/// A child whose own level is *weaker* than the context it is rendered in wraps
/// itself in parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Weakest; a child rendered here never needs parentheses
    Weakest,
    /// The ternary conditional `?:`
    Ternary,
    /// Logical or `||`
    LogicalOr,
    /// Logical and `&&`
    LogicalAnd,
    /// Bitwise or `|`
    BitwiseOr,
    /// Bitwise xor `^`
    BitwiseXor,
    /// Bitwise and `&`
    BitwiseAnd,
    /// Equality `==` `!=`
    Equality,
    /// Relational `<` `<=` `>` `>=`
    Relational,
    /// Shifts `<<` `>>` `>>>`
    Shift,
    /// Additive `+` `-`
    Additive,
    /// Multiplicative `*` `/` `%`
    Multiplicative,
    /// Unary prefix operators and casts
    Unary,
    /// Member selection, indexing, and other postfix forms
    ParenSubMember,
    /// Atoms: literals and simple names
    Strongest,
}

impl Precedence {
    /// Returns `true` if a node at this level must parenthesize itself when rendered
    /// in a context of `outer` strength.
    #[must_use]
    pub fn needs_parens_inside(self, outer: Precedence) -> bool {
        self < outer
    }
}
