/*
retry.rs

Copyright 2025 Hervé Quatremain

This file is part of Mazewise.

Mazewise is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Mazewise is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Mazewise. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Bounded generate-and-test loop.

/// Default number of candidates tried for one obstacle or one coin.
pub const MAX_ATTEMPTS: usize = 100;

/// Draw candidates with `generate` until `accept` returns true for one of them.
///
/// At most `max_attempts` candidates are drawn. Return the accepted candidate, or None when the
/// attempts are exhausted.
pub fn retry<T, G, P>(max_attempts: usize, mut generate: G, mut accept: P) -> Option<T>
where
    G: FnMut() -> T,
    P: FnMut(&T) -> bool,
{
    for _ in 0..max_attempts {
        let candidate: T = generate();
        if accept(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_accepted() {
        let mut calls: usize = 0;
        let res = retry(
            MAX_ATTEMPTS,
            || {
                calls += 1;
                calls
            },
            |_| true,
        );
        assert_eq!(res, Some(1));
    }

    #[test]
    fn test_accepted_after_rejections() {
        let mut next: usize = 0;
        let res = retry(
            10,
            || {
                next += 1;
                next
            },
            |v| *v == 7,
        );
        assert_eq!(res, Some(7));
    }

    #[test]
    fn test_exhausted_after_exact_attempts() {
        let mut calls: usize = 0;
        let res: Option<()> = retry(MAX_ATTEMPTS, || calls += 1, |_| false);
        assert_eq!(res, None);
        assert_eq!(calls, MAX_ATTEMPTS);
    }

    #[test]
    fn test_zero_attempts() {
        let res = retry(0, || 1, |_| true);
        assert_eq!(res, None);
    }
}
