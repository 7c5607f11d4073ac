use std::fmt::{self, Display};

use super::*;

// Used with `{:#}`
const RESET_COLOR: &str = "\x1b[0m";
const GREEN_COLOR: &str = "\x1b[0;32m";
const BLUE_COLOR: &str = "\x1b[0;34m";

// Writes `value` keeping the alternate flag of the enclosing formatter
fn forward<T: Display + ?Sized>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    if f.alternate() {
        write!(f, "{:#}", value)
    } else {
        write!(f, "{}", value)
    }
}

fn colorized(f: &mut fmt::Formatter<'_>, color: &str, text: &str) -> fmt::Result {
    if f.alternate() {
        write!(f, "{}{}{}", color, text, RESET_COLOR)
    } else {
        write!(f, "{}", text)
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        colorized(f, BLUE_COLOR, self.as_str())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        colorized(f, GREEN_COLOR, self.as_str())
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program{{ sentences: ")?;
        forward(f, &self.sentences)?;
        write!(f, " }}")
    }
}

impl Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::GrammarDefinition(definition) => forward(f, definition),
            Sentence::SymbolSetBinding(binding) => forward(f, binding),
            Sentence::ProductionSetBinding(binding) => forward(f, binding),
            Sentence::LanguageBinding(binding) => forward(f, binding),
        }
    }
}

impl Display for GrammarDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrammarDefinition{{ id: ")?;
        forward(f, &self.id)?;
        write!(f, ", terminals: ")?;
        forward(f, &self.terminal_set_id)?;
        write!(f, ", non_terminals: ")?;
        forward(f, &self.non_terminal_set_id)?;
        write!(f, ", productions: ")?;
        forward(f, &self.production_set_id)?;
        write!(f, ", initial_symbol: ")?;
        forward(f, &self.initial_symbol_id)?;
        write!(f, " }}")
    }
}

impl Display for SymbolSetBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolSetBinding{{ id: ")?;
        forward(f, &self.id)?;
        write!(f, ", symbols: ")?;
        forward(f, &self.symbols)?;
        write!(f, " }}")
    }
}

impl Display for ProductionSetBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductionSetBinding{{ id: ")?;
        forward(f, &self.id)?;
        write!(f, ", productions: ")?;
        forward(f, &self.productions)?;
        write!(f, " }}")
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        forward(f, &self.lhs)?;
        write!(f, " -> ")?;
        forward(f, &self.rhs)
    }
}

impl Display for ProductionRhsRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        match self {
            ProductionRhsRule::SymbolSymbol(left, right) => {
                forward(f, left)?;
                write!(f, ", ")?;
                forward(f, right)?;
            }
            ProductionRhsRule::Symbol(symbol) => forward(f, symbol)?,
            ProductionRhsRule::Lambda => colorized(f, GREEN_COLOR, "λ")?,
        }
        write!(f, " ]")
    }
}

impl Display for LanguageBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageBinding{{ id: ")?;
        forward(f, &self.id)?;
        write!(f, ", expression: ")?;
        forward(f, &self.expression)?;
        write!(f, " }}")
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            BinaryOperator::Union => "|",
            BinaryOperator::Intersect => "&",
            BinaryOperator::Minus => "-",
            BinaryOperator::Concat => ".",
        };
        write!(f, "{}", operator)
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Reverse => write!(f, "^"),
            UnaryOperator::Complement => write!(f, "~"),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LanguageKind::Grammar => {
                write!(f, "L(")?;
                forward(f, &self.id)?;
                write!(f, ")")
            }
            LanguageKind::Language => forward(f, &self.id),
        }
    }
}

// Binary expressions are always parenthesized so the rendering reads back
// as the same tree
impl Display for LanguageExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right, operator) = match self {
            LanguageExpression::Language(language) => return forward(f, language),
            LanguageExpression::Reverse(operand) => {
                write!(f, "{}", UnaryOperator::Reverse)?;
                return forward(f, operand.as_ref());
            }
            LanguageExpression::Complement(operand) => {
                write!(f, "{}", UnaryOperator::Complement)?;
                return forward(f, operand.as_ref());
            }
            LanguageExpression::Union(left, right) => (left, right, BinaryOperator::Union),
            LanguageExpression::Intersect(left, right) => (left, right, BinaryOperator::Intersect),
            LanguageExpression::Minus(left, right) => (left, right, BinaryOperator::Minus),
            LanguageExpression::Concat(left, right) => (left, right, BinaryOperator::Concat),
        };

        write!(f, "(")?;
        forward(f, left.as_ref())?;
        write!(f, " {} ", operator)?;
        forward(f, right.as_ref())?;
        write!(f, ")")
    }
}
