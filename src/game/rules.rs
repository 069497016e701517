//! The combination-validity predicate.
//!
//! The dealer only ever talks to [`ComboValidator`]; the classic rule set
//! lives here so the engine works out of the box, and tests inject scripted
//! validators through the same seam.

use super::constants::{FEATURE_COUNT, FEATURE_VALUES};
use super::entities::Card;

/// Decides whether cards form a valid combination. Implementations must be
/// pure: the dealer calls them under its own serialization, from end-of-game
/// checks and from claim adjudication alike.
pub trait ComboValidator: Send + Sync {
    /// Whether these exact cards form a valid combination.
    fn is_valid_combination(&self, cards: &[Card]) -> bool;

    /// Whether `cards` contains at least `at_least` disjoint-agnostic valid
    /// combinations (counting every qualifying subset).
    fn exists_valid_combination(&self, cards: &[Card], at_least: usize) -> bool;
}

/// The classic rules: a card id encodes four base-3 features, and three
/// cards match iff every feature is all-equal or all-distinct across them.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicRules;

impl ClassicRules {
    fn features(card: Card) -> [u16; FEATURE_COUNT] {
        let mut id = card.0;
        let mut features = [0; FEATURE_COUNT];
        for feature in &mut features {
            *feature = id % FEATURE_VALUES;
            id /= FEATURE_VALUES;
        }
        features
    }

    fn is_match(a: Card, b: Card, c: Card) -> bool {
        let (fa, fb, fc) = (
            Self::features(a),
            Self::features(b),
            Self::features(c),
        );
        (0..FEATURE_COUNT).all(|i| {
            let all_equal = fa[i] == fb[i] && fb[i] == fc[i];
            let all_distinct = fa[i] != fb[i] && fb[i] != fc[i] && fa[i] != fc[i];
            all_equal || all_distinct
        })
    }
}

impl ComboValidator for ClassicRules {
    fn is_valid_combination(&self, cards: &[Card]) -> bool {
        match cards {
            [a, b, c] => Self::is_match(*a, *b, *c),
            _ => false,
        }
    }

    fn exists_valid_combination(&self, cards: &[Card], at_least: usize) -> bool {
        if at_least == 0 {
            return true;
        }
        let mut found = 0;
        for i in 0..cards.len() {
            for j in i + 1..cards.len() {
                for k in j + 1..cards.len() {
                    if Self::is_match(cards[i], cards[j], cards[k]) {
                        found += 1;
                        if found >= at_least {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::DEFAULT_DECK_SIZE;

    fn card(features: [u16; FEATURE_COUNT]) -> Card {
        let id = features
            .iter()
            .rev()
            .fold(0, |acc, &f| acc * FEATURE_VALUES + f);
        Card(id)
    }

    #[test]
    fn all_distinct_features_match() {
        // One feature varies, the rest agree.
        let cards = [Card(0), Card(1), Card(2)];
        assert!(ClassicRules.is_valid_combination(&cards));
    }

    #[test]
    fn mixed_feature_does_not_match() {
        // First feature takes values 0, 1, 0: neither equal nor distinct.
        let cards = [
            card([0, 0, 0, 0]),
            card([1, 0, 0, 0]),
            card([0, 1, 0, 0]),
        ];
        assert!(!ClassicRules.is_valid_combination(&cards));
    }

    #[test]
    fn fully_distinct_cards_match() {
        let cards = [
            card([0, 0, 0, 0]),
            card([1, 1, 1, 1]),
            card([2, 2, 2, 2]),
        ];
        assert!(ClassicRules.is_valid_combination(&cards));
    }

    #[test]
    fn wrong_arity_never_matches() {
        assert!(!ClassicRules.is_valid_combination(&[Card(0), Card(1)]));
        assert!(!ClassicRules.is_valid_combination(&[Card(0), Card(1), Card(2), Card(3)]));
    }

    #[test]
    fn full_deck_contains_combinations() {
        let deck: Vec<Card> = (0..DEFAULT_DECK_SIZE).map(|id| Card(id as u16)).collect();
        assert!(ClassicRules.exists_valid_combination(&deck, 1));
        // 81 cards hold 1080 valid triples; well past any realistic floor.
        assert!(ClassicRules.exists_valid_combination(&deck, 100));
    }

    #[test]
    fn a_dry_hand_has_no_combination() {
        let cards = [
            card([0, 0, 0, 0]),
            card([1, 0, 0, 0]),
            card([0, 1, 0, 0]),
        ];
        assert!(!ClassicRules.exists_valid_combination(&cards, 1));
        assert!(ClassicRules.exists_valid_combination(&cards, 0));
    }

    #[test]
    fn two_cards_always_extend_to_a_match() {
        // For any pair there is exactly one completing card; check a few.
        for (a, b) in [(0u16, 1), (5, 17), (3, 42), (80, 0)] {
            let (fa, fb) = (
                ClassicRules::features(Card(a)),
                ClassicRules::features(Card(b)),
            );
            let mut completion = [0u16; FEATURE_COUNT];
            for i in 0..FEATURE_COUNT {
                completion[i] = if fa[i] == fb[i] {
                    fa[i]
                } else {
                    FEATURE_VALUES - fa[i] - fb[i]
                };
            }
            let c = card(completion);
            assert!(
                ClassicRules.is_valid_combination(&[Card(a), Card(b), c]),
                "pair ({a}, {b}) not completed by {c}"
            );
        }
    }
}
