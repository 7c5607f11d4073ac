/*
    Releases a program bottom-up, children before parents, logging every
    destructor on the way.

    Dropping a `Program` frees the same memory; going through here instead
    leaves a trace of the release and counts what was freed.
*/

use log::trace;

use super::*;

/// Tally of the nodes freed by `release_program`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Released {
    pub sentences: usize,
    pub ids: usize,
    pub symbols: usize,
    pub productions: usize,
    pub rhs_rules: usize,
    pub expressions: usize,
}

pub fn release_program(program: Program) -> Released {
    trace!("Executing destructor: Program");
    let mut released = Released::default();
    for sentence in program.sentences {
        release_sentence(sentence, &mut released);
    }
    return released;
}

fn release_sentence(sentence: Sentence, released: &mut Released) {
    trace!("Executing destructor: Sentence");
    match sentence {
        Sentence::GrammarDefinition(definition) => release_grammar_definition(definition, released),
        Sentence::SymbolSetBinding(binding) => release_symbol_set_binding(binding, released),
        Sentence::ProductionSetBinding(binding) => {
            release_production_set_binding(binding, released)
        }
        Sentence::LanguageBinding(binding) => release_language_binding(binding, released),
    }
    released.sentences += 1;
}

fn release_id(id: Id, released: &mut Released) {
    drop(id);
    released.ids += 1;
}

fn release_symbol(symbol: Symbol, released: &mut Released) {
    drop(symbol);
    released.symbols += 1;
}

fn release_grammar_definition(definition: GrammarDefinition, released: &mut Released) {
    trace!("Executing destructor: GrammarDefinition");
    let GrammarDefinition {
        id,
        terminal_set_id,
        non_terminal_set_id,
        production_set_id,
        initial_symbol_id,
    } = definition;

    for id in [id, terminal_set_id, non_terminal_set_id, production_set_id, initial_symbol_id] {
        release_id(id, released);
    }
}

fn release_symbol_set_binding(binding: SymbolSetBinding, released: &mut Released) {
    trace!("Executing destructor: SymbolSetBinding");
    for symbol in binding.symbols {
        release_symbol(symbol, released);
    }
    release_id(binding.id, released);
}

fn release_production_set_binding(binding: ProductionSetBinding, released: &mut Released) {
    trace!("Executing destructor: ProductionSetBinding");
    for production in binding.productions {
        release_production(production, released);
    }
    release_id(binding.id, released);
}

fn release_production(production: Production, released: &mut Released) {
    trace!("Executing destructor: Production");
    for rule in production.rhs {
        release_rhs_rule(rule, released);
    }
    release_symbol(production.lhs, released);
    released.productions += 1;
}

fn release_rhs_rule(rule: ProductionRhsRule, released: &mut Released) {
    match rule {
        ProductionRhsRule::SymbolSymbol(left, right) => {
            trace!("Executing destructor: ProductionRhsRule [ {}, {} ]", left, right);
            release_symbol(left, released);
            release_symbol(right, released);
        }
        ProductionRhsRule::Symbol(symbol) => {
            trace!("Executing destructor: ProductionRhsRule [ {} ]", symbol);
            release_symbol(symbol, released);
        }
        ProductionRhsRule::Lambda => trace!("Executing destructor: ProductionRhsRule [ λ ]"),
    }
    released.rhs_rules += 1;
}

fn release_language_binding(binding: LanguageBinding, released: &mut Released) {
    trace!("Executing destructor: LanguageBinding");
    release_language_expression(binding.expression, released);
    release_id(binding.id, released);
}

// Uses an explicit stack so deeply nested expressions can't exhaust the
// call stack
fn release_language_expression(expression: LanguageExpression, released: &mut Released) {
    let mut pending = vec![expression];
    while let Some(expression) = pending.pop() {
        trace!("Executing destructor: LanguageExpression");
        match expression {
            LanguageExpression::Language(language) => release_id(language.id, released),
            LanguageExpression::Union(left, right)
            | LanguageExpression::Intersect(left, right)
            | LanguageExpression::Minus(left, right)
            | LanguageExpression::Concat(left, right) => {
                pending.push(*right);
                pending.push(*left);
            }
            LanguageExpression::Reverse(operand) | LanguageExpression::Complement(operand) => {
                pending.push(*operand);
            }
        }
        released.expressions += 1;
    }
}
