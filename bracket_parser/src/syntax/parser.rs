//! Table-driven LL(1) engine
//!
//! The derivation runs on an explicit stack of [`GrammarSymbol`]s, so nesting
//! depth is bounded by memory rather than the call stack.

use super::error::{SyntaxError, SyntaxResult};
use crate::config::compile_time::syntax::MAX_TRACE_STEPS;
use crate::config::runtime::ParserPreferences;
use crate::grammar::{
    rule, GrammarSymbol, Nonterminal, ParseTable, RuleId, SemanticRoutine, TableEntry,
    PARSE_TABLE,
};
use crate::log_debug;
use crate::semantics::{self, LineMap, ParseState};
use crate::tokens::{SpannedTerminal, Terminal, TokenStream};
use serde::Serialize;
use std::fmt;

/// Counters for one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseMetrics {
    /// Symbols popped, epsilon included
    pub steps: usize,
    pub matched_terminals: usize,
    pub expansions: usize,
    pub routines_executed: usize,
    pub max_stack_depth: usize,
}

/// Successful parse result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acceptance {
    pub bracket_count: usize,
    /// Every line of the input, including lines without brackets
    pub lines: LineMap,
    pub metrics: ParseMetrics,
}

impl Acceptance {
    /// Line numbers that hold at least one bracket, ascending
    pub fn lines_with_brackets(&self) -> Vec<u32> {
        self.lines
            .iter()
            .filter(|(_, brackets)| !brackets.is_empty())
            .map(|(line, _)| *line)
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// One derivation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceStep {
    SkipEpsilon,
    Match {
        terminal: Terminal,
        position: usize,
    },
    Expand {
        nonterminal: Nonterminal,
        lookahead: Terminal,
        rule: RuleId,
    },
    Execute {
        routine: SemanticRoutine,
        token: Terminal,
    },
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceStep::SkipEpsilon => f.write_str("skip ε"),
            TraceStep::Match { terminal, position } => {
                write!(f, "match {} at token {}", terminal, position)
            }
            TraceStep::Expand {
                nonterminal,
                lookahead,
                rule: id,
            } => match rule(*id) {
                Some(production) => write!(f, "expand {} on {} by {}: {}", nonterminal, lookahead, id, production),
                None => write!(f, "expand {} on {} by {}", nonterminal, lookahead, id),
            },
            TraceStep::Execute { routine, token } => write!(f, "run {} with {}", routine, token),
        }
    }
}

/// Bounded record of derivation steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationTrace {
    steps: Vec<TraceStep>,
    limit: usize,
    truncated: bool,
}

impl DerivationTrace {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            steps: Vec::new(),
            limit,
            truncated: false,
        }
    }

    fn record(&mut self, step: TraceStep) {
        if self.steps.len() < self.limit {
            self.steps.push(step);
        } else {
            self.truncated = true;
        }
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// One numbered line per step
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("{:>6}  {}\n", index + 1, step));
        }
        if self.truncated {
            out.push_str(&format!("        ... truncated after {} steps\n", self.limit));
        }
        out
    }
}

impl Default for DerivationTrace {
    fn default() -> Self {
        Self::with_limit(MAX_TRACE_STEPS)
    }
}

/// Predictive parser over a [`ParseTable`].
///
/// Holds no per-input state: every call to [`LlParser::parse`] builds its own
/// [`ParseState`], so one parser may be reused across inputs.
pub struct LlParser<'t> {
    table: &'t ParseTable,
    preferences: ParserPreferences,
    trace_limit: usize,
    trace: Option<DerivationTrace>,
}

impl LlParser<'static> {
    pub fn new() -> Self {
        Self::with_preferences(ParserPreferences::default())
    }

    pub fn with_preferences(preferences: ParserPreferences) -> Self {
        LlParser::with_table(&PARSE_TABLE, preferences)
    }
}

impl Default for LlParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> LlParser<'t> {
    pub fn with_table(table: &'t ParseTable, preferences: ParserPreferences) -> Self {
        Self {
            table,
            preferences,
            trace_limit: MAX_TRACE_STEPS,
            trace: None,
        }
    }

    /// Cap on recorded trace steps
    pub fn with_trace_limit(mut self, limit: usize) -> Self {
        self.trace_limit = limit;
        self
    }

    pub fn preferences(&self) -> &ParserPreferences {
        &self.preferences
    }

    /// Trace of the most recent parse, if tracing is on
    pub fn trace(&self) -> Option<&DerivationTrace> {
        self.trace.as_ref()
    }

    pub fn take_trace(&mut self) -> Option<DerivationTrace> {
        self.trace.take()
    }

    /// Run the derivation over `tokens`, which must end with the end-of-stream sentinel
    pub fn parse(&mut self, tokens: &TokenStream) -> SyntaxResult<Acceptance> {
        let limit = self.trace_limit;
        self.trace = self
            .preferences
            .record_trace
            .then(|| DerivationTrace::with_limit(limit));

        if !tokens.ends_with_end_of_stream() {
            return Err(SyntaxError::MissingEndOfStream);
        }

        let mut state = ParseState::new();
        match self.derive(tokens, &mut state) {
            Ok(metrics) => {
                let (bracket_count, lines) = state.into_parts();
                Ok(Acceptance {
                    bracket_count,
                    lines,
                    metrics,
                })
            }
            Err(err) => {
                state.clear();
                Err(err)
            }
        }
    }

    fn derive(&mut self, tokens: &TokenStream, state: &mut ParseState) -> SyntaxResult<ParseMetrics> {
        let mut stack: Vec<GrammarSymbol> = vec![
            GrammarSymbol::Terminal(Terminal::EndOfStream),
            GrammarSymbol::Nonterminal(Nonterminal::Sequence),
        ];
        let mut position = 0usize;
        let mut metrics = ParseMetrics {
            max_stack_depth: stack.len(),
            ..ParseMetrics::default()
        };

        while let Some(symbol) = stack.pop() {
            metrics.steps += 1;

            if symbol.is_epsilon() {
                self.record(TraceStep::SkipEpsilon);
                continue;
            }

            let lookahead = tokens
                .get(position)
                .ok_or(SyntaxError::MissingEndOfStream)?;

            match symbol {
                GrammarSymbol::Terminal(expected) => {
                    if expected != lookahead.value {
                        return Err(mismatch(expected, lookahead, state));
                    }
                    self.record(TraceStep::Match {
                        terminal: expected,
                        position,
                    });
                    position += 1;
                    metrics.matched_terminals += 1;

                    if expected == Terminal::EndOfStream {
                        return Ok(metrics);
                    }
                }

                GrammarSymbol::Nonterminal(nonterminal) => {
                    let no_rule = SyntaxError::NoRule {
                        nonterminal,
                        lookahead: lookahead.value,
                        position,
                    };
                    let production = match self.table.lookup(nonterminal, lookahead.value) {
                        TableEntry::Rule(id) => rule(id).ok_or(no_rule)?,
                        TableEntry::NoRule => return Err(no_rule),
                    };

                    self.record(TraceStep::Expand {
                        nonterminal,
                        lookahead: lookahead.value,
                        rule: production.id,
                    });
                    stack.extend(production.rhs.iter().rev().copied());
                    metrics.expansions += 1;
                    metrics.max_stack_depth = metrics.max_stack_depth.max(stack.len());
                }

                GrammarSymbol::Routine(routine) => {
                    let token = position
                        .checked_sub(1)
                        .and_then(|previous| tokens.get(previous))
                        .ok_or(SyntaxError::NoConsumedToken { routine })?;

                    semantics::execute(routine, token, state)?;
                    self.record(TraceStep::Execute {
                        routine,
                        token: token.value,
                    });
                    metrics.routines_executed += 1;
                }
            }
        }

        Err(SyntaxError::StackExhausted { position })
    }

    fn record(&mut self, step: TraceStep) {
        if self.preferences.log_derivation_steps {
            log_debug!("Derivation step", "step" => step);
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.record(step);
        }
    }
}

/// Error for a terminal that does not match the lookahead
fn mismatch(expected: Terminal, lookahead: &SpannedTerminal, state: &ParseState) -> SyntaxError {
    match state.innermost_scope() {
        Some(scope) => SyntaxError::UnmatchedBracket {
            bracket: scope.bracket,
            line: scope.line,
            depth: scope.depth,
            expected,
            found: lookahead.value,
            span: lookahead.span,
        },
        None => SyntaxError::NoOpenScope {
            expected,
            found: lookahead.value,
            line: lookahead.span.line(),
            span: lookahead.span,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::classify_source;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> SyntaxResult<Acceptance> {
        LlParser::new().parse(&classify_source(source))
    }

    fn tracing() -> ParserPreferences {
        ParserPreferences {
            record_trace: true,
            log_derivation_steps: false,
        }
    }

    #[test]
    fn test_nested_brackets_on_one_line() {
        let accepted = parse("(a[b]c)").unwrap();
        assert_eq!(accepted.bracket_count, 4);
        assert_eq!(accepted.lines_with_brackets(), vec![1]);
        assert_eq!(
            accepted.lines.get(&1),
            Some(&vec![
                Terminal::LeftParen,
                Terminal::LeftBracket,
                Terminal::RightBracket,
                Terminal::RightParen,
            ])
        );
    }

    #[test]
    fn test_crossed_brackets_report_innermost_scope() {
        assert_matches!(
            parse("(a\n[b)c]"),
            Err(SyntaxError::UnmatchedBracket {
                bracket: Terminal::LeftBracket,
                line: 2,
                depth: 2,
                expected: Terminal::RightBracket,
                found: Terminal::RightParen,
                ..
            })
        );
    }

    #[test]
    fn test_empty_input() {
        let accepted = parse("").unwrap();
        assert_eq!(accepted.bracket_count, 0);
        assert!(accepted.lines_with_brackets().is_empty());
        assert_eq!(accepted.line_count(), 1);
        assert_eq!(accepted.metrics.matched_terminals, 1);
    }

    #[test]
    fn test_lines_without_brackets_are_kept() {
        let accepted = parse("a\nb\nc").unwrap();
        assert_eq!(accepted.lines.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(accepted.lines.values().all(Vec::is_empty));
        assert!(accepted.lines_with_brackets().is_empty());
    }

    #[test]
    fn test_balanced_inputs_count_two_per_pair() {
        for (source, pairs) in [
            ("()", 1),
            ("x{y}z", 1),
            ("([]{})", 3),
            ("{\n[(a)]\n}\n[]", 4),
            ("((((x))))", 4),
        ] {
            let accepted = parse(source).unwrap();
            assert_eq!(accepted.bracket_count, 2 * pairs, "input {:?}", source);
        }

        for source in ["plain text", "a\n\nb", " \t;"] {
            let accepted = parse(source).unwrap();
            assert_eq!(accepted.bracket_count, 0);
            assert!(accepted.lines_with_brackets().is_empty());
        }
    }

    #[test]
    fn test_wrong_closer_reports_its_opener() {
        assert_matches!(
            parse("(]"),
            Err(SyntaxError::UnmatchedBracket {
                bracket: Terminal::LeftParen,
                line: 1,
                depth: 1,
                ..
            })
        );
    }

    #[test]
    fn test_brackets_over_several_lines() {
        let accepted = parse("{\n\n}\n()").unwrap();
        assert_eq!(accepted.bracket_count, 4);
        assert_eq!(accepted.lines_with_brackets(), vec![1, 3, 4]);
        assert_eq!(accepted.lines.get(&2), Some(&Vec::new()));
    }

    #[test]
    fn test_stray_closer_has_no_open_scope() {
        let err = parse("a)").unwrap_err();
        assert_matches!(
            err,
            SyntaxError::NoOpenScope {
                expected: Terminal::EndOfStream,
                found: Terminal::RightParen,
                line: 1,
                ..
            }
        );
        assert!(!err.is_internal());
    }

    #[test]
    fn test_unclosed_opener_at_end_of_input() {
        assert_matches!(
            parse("("),
            Err(SyntaxError::UnmatchedBracket {
                bracket: Terminal::LeftParen,
                line: 1,
                depth: 1,
                found: Terminal::EndOfStream,
                ..
            })
        );
    }

    #[test]
    fn test_unclosed_opener_reported_on_its_own_line() {
        assert_matches!(
            parse("x\n  {\n\n"),
            Err(SyntaxError::UnmatchedBracket {
                bracket: Terminal::LeftBrace,
                line: 2,
                depth: 1,
                ..
            })
        );
    }

    #[test]
    fn test_parser_reuse_is_independent() {
        let mut parser = LlParser::new();
        let stream = classify_source("[x]\n{}");

        let first = parser.parse(&stream).unwrap();
        assert!(parser.parse(&classify_source("(")).is_err());
        let second = parser.parse(&stream).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.bracket_count, 4);
    }

    #[test]
    fn test_every_token_matched_on_success() {
        for source in ["", "abc", "(\n[{}]\n)", "x(y)z\n\n[]"] {
            let stream = classify_source(source);
            let accepted = LlParser::new().parse(&stream).unwrap();
            assert_eq!(accepted.metrics.matched_terminals, stream.len(), "{:?}", source);
        }
    }

    #[test]
    fn test_metrics() {
        let accepted = parse("(a)").unwrap();
        let metrics = accepted.metrics;
        // Sequence, Scope, Sequence (inner, any), Sequence (inner, ε), Sequence (outer, ε)
        assert_eq!(metrics.expansions, 5);
        assert_eq!(metrics.routines_executed, 2);
        assert_eq!(metrics.matched_terminals, 4);
        assert!(metrics.max_stack_depth >= 5);
        assert!(metrics.steps > metrics.matched_terminals + metrics.expansions);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 5_000;
        let source = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        let accepted = parse(&source).unwrap();
        assert_eq!(accepted.bracket_count, depth * 2);
        assert!(accepted.metrics.max_stack_depth > depth);
    }

    #[test]
    fn test_missing_end_of_stream() {
        let stream = TokenStream::from_tokens(Vec::new());
        assert_matches!(LlParser::new().parse(&stream), Err(SyntaxError::MissingEndOfStream));
    }

    #[test]
    fn test_empty_table_is_an_internal_error() {
        let table = ParseTable::empty();
        let mut parser = LlParser::with_table(&table, ParserPreferences::default());
        let err = parser.parse(&classify_source("a")).unwrap_err();

        assert_matches!(
            err,
            SyntaxError::NoRule {
                nonterminal: Nonterminal::Sequence,
                lookahead: Terminal::AnyChar,
                position: 0,
            }
        );
        assert!(err.is_internal());
    }

    #[test]
    fn test_trace_records_steps() {
        let mut parser = LlParser::with_preferences(tracing());
        parser.parse(&classify_source("()")).unwrap();
        let trace = parser.take_trace().unwrap();

        assert!(!trace.is_truncated());
        assert_eq!(
            trace.steps()[0],
            TraceStep::Expand {
                nonterminal: Nonterminal::Sequence,
                lookahead: Terminal::LeftParen,
                rule: RuleId(0),
            }
        );
        assert_eq!(
            trace.steps().last(),
            Some(&TraceStep::Match {
                terminal: Terminal::EndOfStream,
                position: 2,
            })
        );
        assert!(trace.render().contains("expand Scope on ( by R4: Scope → ( [enter-scope] Sequence ) [exit-scope]"));
        assert!(parser.trace().is_none());
    }

    #[test]
    fn test_trace_is_bounded() {
        let mut parser = LlParser::with_preferences(tracing()).with_trace_limit(3);
        parser.parse(&classify_source("[[[]]]")).unwrap();
        let trace = parser.trace().unwrap();

        assert_eq!(trace.len(), 3);
        assert!(trace.is_truncated());
        assert!(trace.render().ends_with("truncated after 3 steps\n"));
    }

    #[test]
    fn test_trace_off_by_default() {
        let mut parser = LlParser::with_preferences(ParserPreferences {
            record_trace: false,
            log_derivation_steps: false,
        });
        parser.parse(&classify_source("()")).unwrap();
        assert!(parser.trace().is_none());
    }
}
