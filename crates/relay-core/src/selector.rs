//! Best-Quote Selection
//!
//! Buying wants the lowest buy rate, selling wants the highest sell rate.
//! Quotes without a usable rate for the direction are skipped and ties go to
//! the earliest quote in input order.

use crate::model::{Direction, Quote};

/// Pick the optimal quote for `direction`, or `None` if no quote qualifies
pub fn select_best(quotes: &[Quote], direction: Direction) -> Option<&Quote> {
    quotes
        .iter()
        .filter_map(|quote| quote.rate(direction).map(|rate| (quote, rate)))
        .fold(None, |best, (quote, rate)| match best {
            Some((_, best_rate)) if !direction.improves(rate, best_rate) => best,
            _ => Some((quote, rate)),
        })
        .map(|(quote, _)| quote)
}
