/*
    Semantic actions, run by the parser each time it recognizes a rule.

    Every action takes ownership of the values of its right-hand side and
    returns the node for its left-hand side, so a partially built tree is
    always owned by exactly one place.
*/

use log::{debug, error};

use super::lexer::Context;
use crate::ast::*;
use crate::compiler::CompilerState;

const INITIAL_SENTENCE_CAPACITY: usize = 8;

fn log_action(name: &str) {
    debug!("{}", name);
}

/// Stores the finished program. The analysis only succeeds when the scanner
/// ended back in its default context.
pub fn program(state: &mut CompilerState, sentences: SentenceArray, final_context: Context) {
    log_action("program");
    state.ast = Some(Program { sentences });

    if final_context == Context::Default {
        state.succeed = true;
    } else {
        error!(
            "The final context is not the default one: {}. \
             The input ends inside an unclosed construct.",
            final_context
        );
        state.succeed = false;
    }
}

pub fn sentence_array_new(sentence: Sentence) -> SentenceArray {
    log_action("sentence_array_new");
    let mut sentences = SentenceArray::new(INITIAL_SENTENCE_CAPACITY);
    sentences.push(sentence);
    sentences
}

pub fn sentence_array_push(mut sentences: SentenceArray, sentence: Sentence) -> SentenceArray {
    debug!("sentence_array_push: {}", sentence);
    sentences.push(sentence);
    sentences
}

pub fn grammar_definition_sentence(definition: GrammarDefinition) -> Sentence {
    log_action("grammar_definition_sentence");
    Sentence::GrammarDefinition(definition)
}

pub fn symbol_set_binding_sentence(binding: SymbolSetBinding) -> Sentence {
    log_action("symbol_set_binding_sentence");
    Sentence::SymbolSetBinding(binding)
}

pub fn production_set_binding_sentence(binding: ProductionSetBinding) -> Sentence {
    log_action("production_set_binding_sentence");
    Sentence::ProductionSetBinding(binding)
}

pub fn language_binding_sentence(binding: LanguageBinding) -> Sentence {
    log_action("language_binding_sentence");
    Sentence::LanguageBinding(binding)
}

pub fn grammar_definition(
    grammar: Id,
    terminals: Id,
    non_terminals: Id,
    productions: Id,
    initial_symbol: Id,
) -> GrammarDefinition {
    log_action("grammar_definition");
    GrammarDefinition {
        id: grammar,
        terminal_set_id: terminals,
        non_terminal_set_id: non_terminals,
        production_set_id: productions,
        initial_symbol_id: initial_symbol,
    }
}

pub fn symbol_set_binding(id: Id, symbols: SymbolSet) -> SymbolSetBinding {
    log_action("symbol_set_binding");
    SymbolSetBinding { id, symbols }
}

pub fn symbol_set_new(symbol: Symbol) -> SymbolSet {
    log_action("symbol_set_new");
    let mut symbols = SymbolSet::new();
    symbols.add(symbol);
    symbols
}

pub fn symbol_set_add(mut symbols: SymbolSet, symbol: Symbol) -> SymbolSet {
    debug!("symbol_set_add: {}", symbol);
    symbols.add(symbol);
    symbols
}

pub fn symbol_set_union(mut left: SymbolSet, right: SymbolSet) -> SymbolSet {
    log_action("symbol_set_union");
    left.union(right);
    left
}

pub fn production_set_binding(id: Id, productions: ProductionSet) -> ProductionSetBinding {
    log_action("production_set_binding");
    ProductionSetBinding { id, productions }
}

pub fn production_set_new(production: Production) -> ProductionSet {
    log_action("production_set_new");
    let mut productions = ProductionSet::new();
    productions.add(production);
    productions
}

/// Adds `production` to the set. When the set already has a production with
/// the same left-hand side, the right-hand sides are merged into the stored
/// one instead.
pub fn production_set_add(mut productions: ProductionSet, production: Production) -> ProductionSet {
    debug!("production_set_add: {}", production);
    match productions.find_mut(&production) {
        Some(existing) => existing.rhs.union(production.rhs),
        None => {
            productions.add(production);
        }
    }
    productions
}

// Goes through `production_set_add` so that productions sharing a
// left-hand side merge across the two sets
pub fn production_set_union(left: ProductionSet, right: ProductionSet) -> ProductionSet {
    log_action("production_set_union");
    right.into_iter().fold(left, production_set_add)
}

pub fn production(lhs: Symbol, rhs: ProductionRhsRuleSet) -> Production {
    log_action("production");
    Production { lhs, rhs }
}

pub fn rhs_rule_set_new(rule: ProductionRhsRule) -> ProductionRhsRuleSet {
    log_action("rhs_rule_set_new");
    let mut rules = ProductionRhsRuleSet::new();
    rules.add(rule);
    rules
}

pub fn rhs_rule_set_add(
    mut rules: ProductionRhsRuleSet,
    rule: ProductionRhsRule,
) -> ProductionRhsRuleSet {
    debug!("rhs_rule_set_add: {}", rule);
    rules.add(rule);
    rules
}

pub fn rhs_rule_symbol_symbol(left: Symbol, right: Symbol) -> ProductionRhsRule {
    log_action("rhs_rule_symbol_symbol");
    ProductionRhsRule::SymbolSymbol(left, right)
}

pub fn rhs_rule_symbol(symbol: Symbol) -> ProductionRhsRule {
    log_action("rhs_rule_symbol");
    ProductionRhsRule::Symbol(symbol)
}

pub fn rhs_rule_lambda() -> ProductionRhsRule {
    log_action("rhs_rule_lambda");
    ProductionRhsRule::Lambda
}

pub fn language(id: Id, kind: LanguageKind) -> Language {
    log_action("language");
    Language { id, kind }
}

pub fn simple_language_expression(language: Language) -> LanguageExpression {
    log_action("simple_language_expression");
    LanguageExpression::Language(language)
}

pub fn binary_language_expression(
    left: LanguageExpression,
    right: LanguageExpression,
    operator: BinaryOperator,
) -> LanguageExpression {
    debug!("binary_language_expression: {}", operator);
    LanguageExpression::binary(left, right, operator)
}

pub fn unary_language_expression(
    operand: LanguageExpression,
    operator: UnaryOperator,
) -> LanguageExpression {
    debug!("unary_language_expression: {}", operator);
    LanguageExpression::unary(operand, operator)
}

pub fn language_binding(id: Id, expression: LanguageExpression) -> LanguageBinding {
    log_action("language_binding");
    LanguageBinding { id, expression }
}
