//! Grammar alphabet and the string-rewriting engine.
//!
//! A [`SymbolString`] is rewritten by an [`ExpandRules`] table for a fixed number of
//! passes. Each pass is a single left-to-right sweep: symbols produced during a pass are
//! only eligible for rewriting in the following pass.

use crate::turtle::DrawOp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A single grammar symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// Save the turtle state (`[`).
    Push,
    /// Restore the most recently saved turtle state (`]`).
    Pop,
    /// Plain stem segment (`D`).
    Internode,
    /// Growing bud, draws a segment (`B`).
    Bud,
    /// Growing shoot, draws a segment (`S`).
    Shoot,
    /// Random reorientation (`+`).
    Turn,
    /// Flower ornament (`F`).
    Flower,
    /// Any other character. Copied through expansion, ignored when drawing.
    Literal(char),
}

impl Symbol {
    pub fn from_char(c: char) -> Self {
        match c {
            '[' => Symbol::Push,
            ']' => Symbol::Pop,
            'D' => Symbol::Internode,
            'B' => Symbol::Bud,
            'S' => Symbol::Shoot,
            '+' => Symbol::Turn,
            'F' => Symbol::Flower,
            other => Symbol::Literal(other),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Push => '[',
            Symbol::Pop => ']',
            Symbol::Internode => 'D',
            Symbol::Bud => 'B',
            Symbol::Shoot => 'S',
            Symbol::Turn => '+',
            Symbol::Flower => 'F',
            Symbol::Literal(c) => c,
        }
    }

    /// The fixed draw table: what the turtle does when it reads this symbol.
    pub fn draw_op(self) -> DrawOp {
        match self {
            Symbol::Push => DrawOp::Push,
            Symbol::Pop => DrawOp::Pop,
            Symbol::Internode | Symbol::Bud | Symbol::Shoot => DrawOp::Branch,
            Symbol::Turn => DrawOp::Turn,
            Symbol::Flower => DrawOp::Flower,
            Symbol::Literal(_) => DrawOp::Ignore,
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::from_char(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An ordered sequence of grammar symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolString(Vec<Symbol>);

impl SymbolString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.0.iter()
    }

    /// Number of occurrences of `symbol`.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.0.iter().filter(|&&s| s == symbol).count()
    }
}

impl From<Vec<Symbol>> for SymbolString {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }
}

impl From<&str> for SymbolString {
    /// Whitespace is skipped, every other character becomes a [`Symbol`].
    fn from(s: &str) -> Self {
        Self(
            s.chars()
                .filter(|c| !c.is_whitespace())
                .map(Symbol::from_char)
                .collect(),
        )
    }
}

impl FromStr for SymbolString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for SymbolString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sym in &self.0 {
            write!(f, "{sym}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SymbolString {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Rewrite table: symbol → replacement sequence.
///
/// Symbols without an entry are literals and copy forward unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandRules {
    #[serde(with = "rules_by_char")]
    rules: HashMap<Symbol, SymbolString>,
}

/// Rule tables serialize as `{ "B": "D[+B]", ... }`, keyed by character.
mod rules_by_char {
    use super::{Symbol, SymbolString};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::{BTreeMap, HashMap};

    pub fn serialize<S: Serializer>(
        rules: &HashMap<Symbol, SymbolString>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        rules
            .iter()
            .map(|(sym, replacement)| (sym.as_char(), replacement.to_string()))
            .collect::<BTreeMap<char, String>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Symbol, SymbolString>, D::Error> {
        let raw = BTreeMap::<char, String>::deserialize(deserializer)?;
        // Char by char: whitespace inside a replacement is a literal here.
        Ok(raw
            .into_iter()
            .map(|(key, replacement)| {
                let symbols: Vec<Symbol> = replacement.chars().map(Symbol::from_char).collect();
                (Symbol::from_char(key), SymbolString::from(symbols))
            })
            .collect())
    }
}

impl ExpandRules {
    /// An empty table. Every symbol is a fixed point.
    pub fn new() -> Self {
        Self::default()
    }

    /// The plant rules: `B → D[+B]` and `S → D[+BF][+S]+`.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(Symbol::Bud, "D[+B]")
            .with_rule(Symbol::Shoot, "D[+BF][+S]+")
    }

    /// Adds (or replaces) the rule for `symbol` (builder pattern).
    pub fn with_rule(mut self, symbol: Symbol, replacement: impl Into<SymbolString>) -> Self {
        self.rules.insert(symbol, replacement.into());
        self
    }

    pub fn get(&self, symbol: Symbol) -> Option<&SymbolString> {
        self.rules.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs a single rewriting pass over `input`.
    ///
    /// The cursor walks the source once; a rewritten symbol is replaced by its whole
    /// replacement and the cursor moves past it, so nothing inserted in this pass is
    /// rewritten again until the next one.
    pub fn expand_once(&self, input: &SymbolString) -> SymbolString {
        let mut out = Vec::with_capacity(input.len());
        for &sym in input {
            match self.rules.get(&sym) {
                Some(replacement) => out.extend_from_slice(replacement.symbols()),
                None => out.push(sym),
            }
        }
        SymbolString(out)
    }

    /// Rewrites `seed` for `iterations` passes.
    ///
    /// Output length can grow geometrically with `iterations`; nothing here caps it.
    /// Use [`predicted_len`](Self::predicted_len) to check the cost up front.
    pub fn expand(&self, seed: &SymbolString, iterations: u32) -> SymbolString {
        let mut current = seed.clone();
        for pass in 0..iterations {
            if current.is_empty() {
                break;
            }
            current = self.expand_once(&current);
            log::debug!("expansion pass {}: {} symbols", pass + 1, current.len());
        }
        current
    }

    /// Exact length of `expand(seed, iterations)`, computed without expanding.
    ///
    /// Saturates at `u64::MAX`.
    pub fn predicted_len(&self, seed: &SymbolString, iterations: u32) -> u64 {
        // lengths[s] = length of s after `n` passes; starts at 1 for every symbol.
        let mut lengths: HashMap<Symbol, u64> = HashMap::new();
        for _ in 0..iterations {
            let mut next = HashMap::with_capacity(self.rules.len());
            for (sym, replacement) in &self.rules {
                let len = replacement.iter().fold(0u64, |acc, s| {
                    acc.saturating_add(lengths.get(s).copied().unwrap_or(1))
                });
                next.insert(*sym, len);
            }
            if next == lengths {
                break;
            }
            lengths = next;
        }
        seed.iter().fold(0u64, |acc, s| {
            acc.saturating_add(lengths.get(s).copied().unwrap_or(1))
        })
    }
}

/// Rewrites `seed` with `rules` for `iterations` passes.
pub fn expand(seed: &SymbolString, rules: &ExpandRules, iterations: u32) -> SymbolString {
    rules.expand(seed, iterations)
}
