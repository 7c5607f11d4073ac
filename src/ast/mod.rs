/*
    This module holds the abstract syntax tree built while parsing.

    Every node is owned by exactly one parent and the whole tree is released
    together with its `Program`.
*/

mod display;
pub mod teardown;

use crate::collections::murmur::murmur3;
use crate::collections::{DynamicArray, HashingSet, SetElement};

/// The name of a grammar, a set or a language binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id(String);

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the identifier in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Id(id)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Id(id.to_owned())
    }
}

/// A terminal or nonterminal, compared by exact content and byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Symbol {
    fn from(symbol: String) -> Self {
        Symbol(symbol)
    }
}

impl From<&str> for Symbol {
    fn from(symbol: &str) -> Self {
        Symbol(symbol.to_owned())
    }
}

impl SetElement for Symbol {
    fn element_hash(&self) -> u32 {
        murmur3(&[self.as_bytes()])
    }

    fn element_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.as_bytes() == other.as_bytes()
    }
}

pub type SymbolSet = HashingSet<Symbol>;
pub type ProductionSet = HashingSet<Production>;
pub type ProductionRhsRuleSet = HashingSet<ProductionRhsRule>;
pub type SentenceArray = DynamicArray<Sentence>;

#[derive(Debug)]
pub struct Program {
    pub sentences: SentenceArray,
}

// A top level statement
#[derive(Debug)]
pub enum Sentence {
    GrammarDefinition(GrammarDefinition),
    SymbolSetBinding(SymbolSetBinding),
    ProductionSetBinding(ProductionSetBinding),
    LanguageBinding(LanguageBinding),
}

/// `Grammar id = (terminals, non_terminals, productions, initial_symbol);`
///
/// Only names are stored, they are resolved by a later phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarDefinition {
    pub id: Id,
    pub terminal_set_id: Id,
    pub non_terminal_set_id: Id,
    pub production_set_id: Id,
    pub initial_symbol_id: Id,
}

#[derive(Debug)]
pub struct SymbolSetBinding {
    pub id: Id,
    pub symbols: SymbolSet,
}

#[derive(Debug)]
pub struct ProductionSetBinding {
    pub id: Id,
    pub productions: ProductionSet,
}

/// A nonterminal together with every right-hand side written for it.
///
/// Membership in a `ProductionSet` only looks at `lhs`, which is what lets
/// two productions for the same nonterminal merge instead of coexisting.
#[derive(Debug)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: ProductionRhsRuleSet,
}

impl SetElement for Production {
    fn element_hash(&self) -> u32 {
        self.lhs.element_hash()
    }

    fn element_eq(&self, other: &Self) -> bool {
        self.lhs.element_eq(&other.lhs)
    }
}

// One alternative on the right-hand side of a production
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductionRhsRule {
    SymbolSymbol(Symbol, Symbol),
    Symbol(Symbol),
    Lambda,
}

impl ProductionRhsRule {
    fn tag(&self) -> u32 {
        match self {
            ProductionRhsRule::SymbolSymbol(_, _) => 0,
            ProductionRhsRule::Symbol(_) => 1,
            ProductionRhsRule::Lambda => 2,
        }
    }
}

impl SetElement for ProductionRhsRule {
    fn element_hash(&self) -> u32 {
        let tag = self.tag().to_le_bytes();
        match self {
            ProductionRhsRule::SymbolSymbol(left, right) => {
                murmur3(&[&tag, left.as_bytes(), right.as_bytes()])
            }
            ProductionRhsRule::Symbol(symbol) => murmur3(&[&tag, symbol.as_bytes()]),
            ProductionRhsRule::Lambda => murmur3(&[&tag]),
        }
    }

    fn element_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ProductionRhsRule::SymbolSymbol(left, right),
                ProductionRhsRule::SymbolSymbol(other_left, other_right),
            ) => left.element_eq(other_left) && right.element_eq(other_right),
            (ProductionRhsRule::Symbol(symbol), ProductionRhsRule::Symbol(other_symbol)) => {
                symbol.element_eq(other_symbol)
            }
            (ProductionRhsRule::Lambda, ProductionRhsRule::Lambda) => true,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct LanguageBinding {
    pub id: Id,
    pub expression: LanguageExpression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Union,
    Intersect,
    Minus,
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Reverse,
    Complement,
}

/// An algebraic expression over languages. Children are owned, so this is
/// always a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageExpression {
    Language(Language),
    Union(Box<LanguageExpression>, Box<LanguageExpression>),
    Intersect(Box<LanguageExpression>, Box<LanguageExpression>),
    Minus(Box<LanguageExpression>, Box<LanguageExpression>),
    Concat(Box<LanguageExpression>, Box<LanguageExpression>),
    Reverse(Box<LanguageExpression>),
    Complement(Box<LanguageExpression>),
}

impl LanguageExpression {
    pub fn binary(
        left: LanguageExpression,
        right: LanguageExpression,
        operator: BinaryOperator,
    ) -> Self {
        let (left, right) = (Box::new(left), Box::new(right));
        match operator {
            BinaryOperator::Union => LanguageExpression::Union(left, right),
            BinaryOperator::Intersect => LanguageExpression::Intersect(left, right),
            BinaryOperator::Minus => LanguageExpression::Minus(left, right),
            BinaryOperator::Concat => LanguageExpression::Concat(left, right),
        }
    }

    pub fn unary(operand: LanguageExpression, operator: UnaryOperator) -> Self {
        let operand = Box::new(operand);
        match operator {
            UnaryOperator::Reverse => LanguageExpression::Reverse(operand),
            UnaryOperator::Complement => LanguageExpression::Complement(operand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageKind {
    // `L(g)`, the language generated by grammar `g`
    Grammar,
    // a previously bound language
    Language,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: Id,
    pub kind: LanguageKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> SymbolSet {
        names.iter().map(|&name| Symbol::from(name)).collect()
    }

    fn production(lhs: &str, rules: Vec<ProductionRhsRule>) -> Production {
        Production {
            lhs: lhs.into(),
            rhs: rules.into_iter().collect(),
        }
    }

    #[test]
    fn symbols_compare_by_content() {
        let a = Symbol::from("a".to_string());
        let b = Symbol::from("a");

        assert!(a.element_eq(&b));
        assert_eq!(a.element_hash(), b.element_hash());
        assert!(!a.element_eq(&Symbol::from("a\0")));
        assert_eq!(symbols(&["a", "b", "a"]).len(), 2);
    }

    #[test]
    fn rhs_rules_compare_per_variant() {
        let a = ProductionRhsRule::Symbol("a".into());
        let also_a = ProductionRhsRule::Symbol("a".into());
        assert!(a.element_eq(&also_a));
        assert_eq!(a.element_hash(), also_a.element_hash());

        let pair = ProductionRhsRule::SymbolSymbol("a".into(), "B".into());
        let swapped = ProductionRhsRule::SymbolSymbol("B".into(), "a".into());
        assert!(pair.element_eq(&ProductionRhsRule::SymbolSymbol("a".into(), "B".into())));
        assert!(!pair.element_eq(&swapped));
        assert!(!pair.element_eq(&a));

        assert!(ProductionRhsRule::Lambda.element_eq(&ProductionRhsRule::Lambda));
        assert_eq!(ProductionRhsRule::Lambda.element_hash(), murmur3(&[&2u32.to_le_bytes()]));
        assert!(!ProductionRhsRule::Lambda.element_eq(&a));
    }

    #[test]
    fn productions_compare_by_lhs_only() {
        let first = production("A", vec![ProductionRhsRule::Symbol("x".into())]);
        let second = production("A", vec![ProductionRhsRule::Lambda]);
        let other = production("B", vec![ProductionRhsRule::Symbol("x".into())]);

        assert!(first.element_eq(&second));
        assert_eq!(first.element_hash(), second.element_hash());
        assert!(!first.element_eq(&other));
    }

    #[test]
    fn builds_expressions_from_operators() {
        let leaf = |id: &str| {
            LanguageExpression::Language(Language {
                id: id.into(),
                kind: LanguageKind::Grammar,
            })
        };

        let union = LanguageExpression::binary(leaf("g"), leaf("h"), BinaryOperator::Union);
        assert_eq!(
            union,
            LanguageExpression::Union(Box::new(leaf("g")), Box::new(leaf("h")))
        );

        let complement = LanguageExpression::unary(leaf("g"), UnaryOperator::Complement);
        assert_eq!(complement, LanguageExpression::Complement(Box::new(leaf("g"))));
    }
}
