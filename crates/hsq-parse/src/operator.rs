//! Logical and proximity operators joining sibling clauses.

use std::fmt;

/// Largest accepted proximity distance.
///
/// Distances outside `1..=MAX_PROXIMITY` downgrade to [`LogicalOperator::And`]
/// at construction rather than failing.
pub const MAX_PROXIMITY: u8 = 15;

/// Direction of a proximity relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityKind {
    /// `N<k>`: the operands appear within `k` positions, in either order.
    Near,
    /// `W<k>`: the operands appear within `k` positions, left before right.
    Ordered,
}

impl ProximityKind {
    /// The operator letter in query syntax.
    pub fn letter(self) -> char {
        match self {
            Self::Near => 'N',
            Self::Ordered => 'W',
        }
    }
}

/// The join between a clause and its following sibling.
///
/// Immutable once constructed. `And` is the default when a clause has no
/// explicit trailing operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// Conjunction. The implicit default.
    And,
    /// Disjunction.
    Or,
    /// Proximity relation between the two adjacent clauses.
    Proximity {
        /// Whether operand order matters.
        kind: ProximityKind,
        /// Maximum positions between the operands, always in `1..=MAX_PROXIMITY`.
        distance: u8,
    },
}

impl LogicalOperator {
    /// Parses an operator token, case-insensitively.
    ///
    /// Returns `None` for tokens that are not operators at all. `N<k>`/`W<k>`
    /// tokens with `k` outside `1..=MAX_PROXIMITY` are recognized as
    /// operators but downgraded to `And`, matching the legacy products this
    /// grammar serves.
    pub fn parse(token: &str) -> Option<Self> {
        let upper = token.to_ascii_uppercase();
        match upper.as_str() {
            "AND" => return Some(Self::And),
            "OR" => return Some(Self::Or),
            _ => {}
        }

        let kind = match upper.as_bytes().first() {
            Some(b'N') => ProximityKind::Near,
            Some(b'W') => ProximityKind::Ordered,
            _ => return None,
        };
        let digits = &upper[1..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match digits.parse::<u8>() {
            Ok(distance) if (1..=MAX_PROXIMITY).contains(&distance) => {
                Some(Self::Proximity { kind, distance })
            }
            // Out-of-range distances (N0, N16, W99, ...) downgrade.
            _ => Some(Self::And),
        }
    }

    /// Checks whether `token` matches the operator grammar.
    pub fn is_operator(token: &str) -> bool {
        Self::parse(token).is_some()
    }

    /// True for `N`/`W` proximity relations.
    pub fn is_proximity(&self) -> bool {
        matches!(self, Self::Proximity { .. })
    }

    /// The operator family name: `AND`, `OR`, `N`, or `W`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Proximity {
                kind: ProximityKind::Near,
                ..
            } => "N",
            Self::Proximity {
                kind: ProximityKind::Ordered,
                ..
            } => "W",
        }
    }

    /// The join symbol in lexeme-expression syntax (`&` or `|`).
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "|",
            _ => "&",
        }
    }

    /// The join keyword in flat query-string syntax (`AND` or `OR`).
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            _ => "AND",
        }
    }
}

impl Default for LogicalOperator {
    fn default() -> Self {
        Self::And
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Proximity { kind, distance } => write!(f, "{}{}", kind.letter(), distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords() {
        assert_eq!(LogicalOperator::parse("AND"), Some(LogicalOperator::And));
        assert_eq!(LogicalOperator::parse("OR"), Some(LogicalOperator::Or));
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(LogicalOperator::parse("and"), Some(LogicalOperator::And));
        assert_eq!(LogicalOperator::parse("Or"), Some(LogicalOperator::Or));
        assert_eq!(
            LogicalOperator::parse("n5"),
            Some(LogicalOperator::Proximity {
                kind: ProximityKind::Near,
                distance: 5
            })
        );
    }

    #[test]
    fn parses_proximity() {
        assert_eq!(
            LogicalOperator::parse("N1"),
            Some(LogicalOperator::Proximity {
                kind: ProximityKind::Near,
                distance: 1
            })
        );
        assert_eq!(
            LogicalOperator::parse("W15"),
            Some(LogicalOperator::Proximity {
                kind: ProximityKind::Ordered,
                distance: 15
            })
        );
    }

    #[test]
    fn out_of_range_distance_downgrades_to_and() {
        assert_eq!(LogicalOperator::parse("N16"), Some(LogicalOperator::And));
        assert_eq!(LogicalOperator::parse("N0"), Some(LogicalOperator::And));
        assert_eq!(LogicalOperator::parse("W999"), Some(LogicalOperator::And));
    }

    #[test]
    fn non_operators_rejected() {
        assert_eq!(LogicalOperator::parse("Opel"), None);
        assert_eq!(LogicalOperator::parse("Nissan"), None);
        assert_eq!(LogicalOperator::parse("N"), None);
        assert_eq!(LogicalOperator::parse("W2x"), None);
        assert_eq!(LogicalOperator::parse(""), None);
    }

    #[test]
    fn symbols_and_keywords() {
        assert_eq!(LogicalOperator::And.symbol(), "&");
        assert_eq!(LogicalOperator::Or.symbol(), "|");
        assert_eq!(LogicalOperator::And.keyword(), "AND");
        assert_eq!(LogicalOperator::Or.keyword(), "OR");
    }

    #[test]
    fn display_round_trips_operator_names() {
        let op = LogicalOperator::Proximity {
            kind: ProximityKind::Ordered,
            distance: 3,
        };
        assert_eq!(op.to_string(), "W3");
        assert_eq!(LogicalOperator::parse(&op.to_string()), Some(op));
    }
}
