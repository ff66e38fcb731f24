//! # rule_parse.rs
//!
//! Parses the textual rule notation into `Rule` values.
//!
//! A rule is a chain of legs joined by `>`. A leg is either an atom or a
//! parenthesised rule, and an atom reads
//!
//! ```text
//! direction[steps][:collision][=schedule]
//! ```
//!
//! with steps written `[n]`, `[n..]`, `[n..m]` or `[..m]` (default `[1..]`),
//! collision one of `blocking`, `none`, `disabled`, `jumping`, `all` (default
//! `blocking`), and the schedule either a preset name or a comma separated
//! list of probabilities (default preset `default`).
//!
//! # Examples
//!
//! ```ignore
//! forward[1]=weak
//! (forward[2]:disabled>left[1])
//! diagonal_forward_left[2]:all=0.75,0.25
//! ```
//!
//! Several alternative rules for one piece are separated by `|`.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::moves::{
    catalog::Presets,
    direction::{Collision, Direction},
    rule::{Primitive, Rule, RuleError, Steps},
    schedule::Schedule,
};

lazy_static! {
    static ref ATOM_PATTERN: Regex = Regex::new(
        concat!(
            r"^([a-z_]+)",
            r"(?:\[(?:(\d+)|(\d+)\.\.(\d+)?|\.\.(\d+))\])?",
            r"(?::([a-z]+))?",
            r"(?:=([a-z_]+|[0-9.,]+))?$"
        )
    ).unwrap();
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NotationError {
    #[error("empty rule")]
    Empty,
    #[error("malformed atom `{0}`")]
    Atom(String),
    #[error("unknown direction `{0}`")]
    Direction(String),
    #[error("unknown collision policy `{0}`")]
    Collision(String),
    #[error("invalid probability schedule `{0}`")]
    Schedule(String),
    #[error("unbalanced or misplaced `{0}` in rule notation")]
    Structure(char),
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Parses one rule, which may be a chain of legs.
pub fn parse_rule(
    notation: &str,
    presets: &Presets,
) -> Result<Rule, NotationError> {
    let chars: Vec<char> =
        notation.chars().filter(|c| !c.is_whitespace()).collect();

    if chars.is_empty() {
        return Err(NotationError::Empty);
    }

    let mut groups: Vec<Vec<Rule>> = vec![Vec::new()];
    let mut expect_leg = true;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        match c {
            '(' => {
                if !expect_leg {
                    return Err(NotationError::Structure(c));
                }
                groups.push(Vec::new());
                i += 1;
            }                                                                   /* Open a nested chain                */
            ')' => {
                if expect_leg || groups.len() < 2 {
                    return Err(NotationError::Structure(c));
                }
                let legs = groups.pop().unwrap_or_default();
                let rule = close(legs)?;
                if let Some(parent) = groups.last_mut() {
                    parent.push(rule);
                }
                expect_leg = false;
                i += 1;
            }                                                                   /* Fold it into one leg               */
            '>' => {
                if expect_leg {
                    return Err(NotationError::Structure(c));
                }
                expect_leg = true;
                i += 1;
            }
            _ => {
                if !expect_leg {
                    return Err(NotationError::Structure(c));
                }
                let mut atom = String::new();
                while i < chars.len() && !"()>".contains(chars[i]) {
                    atom.push(chars[i]);
                    i += 1;
                }
                if let Some(group) = groups.last_mut() {
                    group.push(parse_atom(&atom, presets)?);
                }
                expect_leg = false;
            }
        }
    }

    if expect_leg {
        return Err(NotationError::Structure('>'));
    }

    if groups.len() != 1 {
        return Err(NotationError::Structure('('));
    }

    close(groups.pop().unwrap_or_default())
}

/// Parses `|` separated alternatives.
pub fn parse_rules(
    notation: &str,
    presets: &Presets,
) -> Result<Vec<Rule>, NotationError> {
    notation
        .split('|')
        .map(|rule| parse_rule(rule, presets))
        .collect()
}

fn close(mut legs: Vec<Rule>) -> Result<Rule, NotationError> {
    match legs.len() {
        0 => Err(NotationError::Empty),
        1 => Ok(legs.remove(0)),
        _ => Ok(Rule::compound(legs)?),
    }
}

fn parse_atom(atom: &str, presets: &Presets) -> Result<Rule, NotationError> {
    let cap = ATOM_PATTERN
        .captures(atom)
        .ok_or_else(|| NotationError::Atom(atom.to_string()))?;

    let direction: Direction =
        cap[1].parse().map_err(NotationError::Direction)?;

    let number = |index: usize| -> Result<Option<u32>, NotationError> {
        cap.get(index)
            .map(|m| m.as_str().parse())
            .transpose()
            .map_err(|_| NotationError::Atom(atom.to_string()))
    };

    let steps = match (number(2)?, number(3)?, number(4)?, number(5)?) {
        (Some(n), ..) => Steps::exactly(n)?,
        (None, Some(min), max, _) => Steps::new(min, max.unwrap_or(0))?,
        (None, None, _, Some(max)) => Steps::new(1, max)?,
        _ => Steps::default(),
    };

    let collision = match cap.get(6) {
        Some(m) => m.as_str().parse().map_err(NotationError::Collision)?,
        None => Collision::default(),
    };

    let schedule = match cap.get(7) {
        Some(m) => parse_schedule(m.as_str(), presets)?,
        None => presets.schedule("default").ok_or_else(|| {
            NotationError::Schedule("default".to_string())
        })?,
    };

    Ok(Rule::Primitive(Primitive::new(
        direction, steps, collision, schedule,
    )))
}

fn parse_schedule(
    text: &str,
    presets: &Presets,
) -> Result<Schedule, NotationError> {
    if let Some(schedule) = presets.schedule(text) {
        return Ok(schedule);
    }

    let values = text
        .split(',')
        .map(|value| value.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| NotationError::Schedule(text.to_string()))?;

    Schedule::new(values)
        .ok_or_else(|| NotationError::Schedule(text.to_string()))
}
