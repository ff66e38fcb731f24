//! # catalog.rs
//!
//! Implements the rule catalog: rules, promotions and royal types per piece
//! type.
//!
//! Rules of one type are alternatives. A destination is legal if any of them
//! validates it, and when several do, the first in declaration order is the
//! one whose walk and probabilities are used. Nothing here knows a fixed
//! piece set; types are plain names registered at runtime.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    constants::*,
    moves::{
        rule::Rule,
        rule_parse::{parse_rules, NotationError},
        schedule::Schedule,
        walk::Walk,
    },
    representations::{
        board::Board,
        piece::Piece,
        position::{Orientation, Position},
    },
};

/// Named probabilities usable in rule notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presets {
    pub strong: f64,
    pub weak: f64,
    pub default: f64,
}

impl Presets {
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "strong" => Some(self.strong),
            "weak" => Some(self.weak),
            "default" => Some(self.default),
            _ => None,
        }
    }

    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "strong" => &mut self.strong,
            "weak" => &mut self.weak,
            "default" => &mut self.default,
            _ => return false,
        };

        *slot = value;
        true
    }

    pub fn schedule(&self, name: &str) -> Option<Schedule> {
        self.get(name).and_then(Schedule::single)
    }
}

impl Default for Presets {
    fn default() -> Self {
        Presets {
            strong: STRONG_PROBABILITY,
            weak: WEAK_PROBABILITY,
            default: DEFAULT_PROBABILITY,
        }
    }
}

/// Promotion condition: reaching the side's promotion rank allows the piece
/// to become any of `into`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRule {
    pub ranks: [i32; 2],                                                        /* Indexed by orientation             */
    pub into: Vec<String>,
}

impl PromotionRule {
    pub fn matches(&self, orientation: Orientation, to: Position) -> bool {
        self.ranks[orientation.index()] == to.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub position: Position,
    pub probability: f64,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    presets: Presets,
    rules: HashMap<String, Vec<Rule>>,
    promotions: HashMap<String, Vec<PromotionRule>>,
    royals: HashSet<String>,
}

impl Catalog {
    pub fn new(presets: Presets) -> Self {
        Catalog {
            presets,
            rules: HashMap::new(),
            promotions: HashMap::new(),
            royals: HashSet::from([ROYAL_TYPE.to_string()]),
        }
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    /// Appends a rule to one piece type. Other types are left untouched.
    pub fn register(&mut self, piece_type: &str, rule: Rule) {
        self.rules
            .entry(piece_type.to_string())
            .or_default()
            .push(rule);
    }

    /// Parses `|` separated rules and registers all of them, or none if
    /// any fails to parse.
    pub fn register_notation(
        &mut self,
        piece_type: &str,
        notation: &str,
    ) -> Result<(), NotationError> {
        for rule in parse_rules(notation, &self.presets)? {
            self.register(piece_type, rule);
        }

        Ok(())
    }

    pub fn add_promotion(
        &mut self,
        piece_type: &str,
        promotion: PromotionRule,
    ) {
        self.promotions
            .entry(piece_type.to_string())
            .or_default()
            .push(promotion);
    }

    pub fn promotions(&self, piece_type: &str) -> &[PromotionRule] {
        self.promotions
            .get(piece_type)
            .map_or(&[], Vec::as_slice)
    }

    /// Replaces the set of types whose death decides the game.
    pub fn set_royals<'a>(&mut self, types: impl IntoIterator<Item = &'a str>) {
        self.royals = types.into_iter().map(str::to_string).collect();
    }

    pub fn is_royal(&self, piece_type: &str) -> bool {
        self.royals.contains(piece_type)
    }

    pub fn knows(&self, piece_type: &str) -> bool {
        self.rules.contains_key(piece_type)
    }

    pub fn piece_types(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Rules of a piece type in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if the type has no rules. Every piece on a board must have a
    /// registered type, so a miss means the catalog and board are out of
    /// sync.
    pub fn rules_for(&self, piece_type: &str) -> &[Rule] {
        match self.rules.get(piece_type) {
            Some(rules) if !rules.is_empty() => rules,
            _ => panic!("No rules registered for piece type `{piece_type}`"),
        }
    }

    /// First rule, in declaration order, that allows the move, together
    /// with its collision walk.
    pub fn matching_rule(
        &self,
        board: &Board,
        piece: &Piece,
        to: Position,
    ) -> Option<(&Rule, Walk)> {
        self.rules_for(&piece.piece_type)
            .iter()
            .find_map(|rule| Some((rule, rule.trace(board, piece, to)?)))
    }

    pub fn is_legal(&self, board: &Board, piece: &Piece, to: Position) -> bool {
        self.rules_for(&piece.piece_type)
            .iter()
            .any(|rule| rule.validate(board, piece, to))
    }

    /// Union of every rule's destinations, sorted by position. A tile that
    /// several rules reach carries the first rule's probability.
    pub fn legal_destinations(
        &self,
        board: &Board,
        piece: &Piece,
    ) -> Vec<Destination> {
        let mut destinations: BTreeMap<Position, f64> = BTreeMap::new();

        for rule in self.rules_for(&piece.piece_type) {
            for (position, probability) in rule.enumerate(board, piece) {
                destinations.entry(position).or_insert(probability);
            }
        }

        destinations
            .into_iter()
            .map(|(position, probability)| Destination {
                position,
                probability,
            })
            .collect()
    }

    /// Types a piece may promote into on arriving at `to`. Empty if no
    /// promotion condition matches.
    pub fn promotion_options(
        &self,
        piece_type: &str,
        orientation: Orientation,
        to: Position,
    ) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();

        let Some(promotions) = self.promotions.get(piece_type) else {
            return options;
        };

        for promotion in promotions {
            if !promotion.matches(orientation, to) {
                continue;
            }

            for into in &promotion.into {
                if !options.contains(into) {
                    options.push(into.clone());
                }
            }
        }

        options
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new(Presets::default())
    }
}
