//! # schedule.rs
//!
//! Defines the probability schedule of a rule.
//!
//! A schedule lists the attacker's chance of winning a combat on each
//! contested step, starting from 0. Steps past the end of the list reuse the
//! last entry, so `[0.75, 0.5, 0.25]` reads as 0.75, 0.5, 0.25, 0.25, ...
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule(Vec<f64>);

impl Schedule {
    /// Builds a schedule, or `None` if it is empty or any value lies outside
    /// `[0, 1]`.
    pub fn new(values: Vec<f64>) -> Option<Self> {
        if values.is_empty() || values.iter().any(|p| !(0.0..=1.0).contains(p))
        {
            return None;
        }

        Some(Schedule(values))
    }

    pub fn single(value: f64) -> Option<Self> {
        Schedule::new(vec![value])
    }

    #[inline(always)]
    pub fn at(&self, step: usize) -> f64 {
        match self.0.get(step) {
            Some(&p) => p,
            None => self.0[self.0.len() - 1],
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self
            .0
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{values}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_value_repeats() {
        let schedule = Schedule::new(vec![0.75, 0.5, 0.25]).unwrap();
        assert_eq!(schedule.at(0), 0.75);
        assert_eq!(schedule.at(2), 0.25);
        assert_eq!(schedule.at(9), 0.25);
        assert_eq!(schedule.to_string(), "0.75,0.5,0.25");
    }

    #[test]
    fn empty_and_out_of_range_schedules_are_refused() {
        assert!(Schedule::new(vec![]).is_none());
        assert!(Schedule::new(vec![0.5, 1.5]).is_none());
        assert!(Schedule::single(-0.1).is_none());
        assert!(Schedule::single(f64::NAN).is_none());
        assert!(Schedule::single(1.0).is_some());
    }
}
