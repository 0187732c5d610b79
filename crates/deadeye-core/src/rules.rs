//! Ordered rule tables
//!
//! A rule table maps a dart plus game context to an outcome. Rules are
//! checked top-down and the first match wins, so the declaration order is
//! the game balance: "exact target" before "close enough" before "bull
//! fallback". When nothing matches, the table's fallback produces the
//! outcome (usually a zero-effect miss).

use std::fmt;

/// A single `(predicate, effect)` pair
pub struct Rule<C, O> {
    pub name: &'static str,
    pub when: fn(&C) -> bool,
    pub then: fn(&C) -> O,
}

impl<C, O> Clone for Rule<C, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            when: self.when,
            then: self.then,
        }
    }
}

/// Which rule fired and what it produced
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict<O> {
    pub rule: &'static str,
    pub outcome: O,
}

/// Name reported when the fallback fired
pub const FALLBACK_RULE: &str = "fallback";

/// An ordered set of rules with an explicit default
pub struct RuleTable<C, O> {
    rules: Vec<Rule<C, O>>,
    fallback: fn(&C) -> O,
}

impl<C, O> RuleTable<C, O> {
    /// Create an empty table with the outcome used when nothing matches
    pub fn new(fallback: fn(&C) -> O) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule (lower priority than everything added before it)
    pub fn rule(mut self, name: &'static str, when: fn(&C) -> bool, then: fn(&C) -> O) -> Self {
        self.rules.push(Rule { name, when, then });
        self
    }

    /// Evaluate top-down; never fails
    pub fn evaluate(&self, ctx: &C) -> Verdict<O> {
        for rule in &self.rules {
            if (rule.when)(ctx) {
                return Verdict {
                    rule: rule.name,
                    outcome: (rule.then)(ctx),
                };
            }
        }
        Verdict {
            rule: FALLBACK_RULE,
            outcome: (self.fallback)(ctx),
        }
    }

    /// Name of the rule that would fire, without producing the outcome
    pub fn matching(&self, ctx: &C) -> &'static str {
        self.rules
            .iter()
            .find(|rule| (rule.when)(ctx))
            .map(|rule| rule.name)
            .unwrap_or(FALLBACK_RULE)
    }

    /// Rule names in evaluation order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<C, O> Clone for RuleTable<C, O> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            fallback: self.fallback,
        }
    }
}

impl<C, O> fmt::Debug for RuleTable<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTable")
            .field("rules", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
