//! Flutter recognisers, layered over the Dart table for Flutter projects.
//!
//! Widget, `State<T>` and state-holder classes are recognised by their base
//! class. Anything else falls through to the plain Dart rules.

use super::dart::DART;
use super::patterns::{PatternStrategy, SymbolRule};
use crate::config::SymbolKind;

const FLUTTER_RULES: &[SymbolRule] = &[
    SymbolRule::new(
        SymbolKind::WidgetState,
        r"^\s*(?:(?:abstract|base|final|sealed)\s+)*class\s+(?P<name>\w+)(?:<[^>]*>)?\s+extends\s+State<\w+>",
    ),
    SymbolRule::new(
        SymbolKind::Widget,
        r"^\s*(?:(?:abstract|base|final|sealed)\s+)*class\s+(?P<name>\w+)(?:<[^>]*>)?\s+extends\s+(?:StatelessWidget|StatefulWidget|InheritedWidget|InheritedModel|InheritedNotifier|\w*RenderObjectWidget)\b",
    ),
    SymbolRule::new(
        SymbolKind::Notifier,
        r"^\s*(?:(?:abstract|base|final|sealed)\s+)*class\s+(?P<name>\w+)(?:<[^>]*>)?\s+(?:extends|with)\s+.*\b(?:ChangeNotifier|ValueNotifier|Cubit|Bloc|AsyncNotifier|Notifier|StateNotifier)\b",
    ),
];

/// The Dart strategy with Flutter recognisers tried first.
pub fn strategy() -> PatternStrategy {
    PatternStrategy::with_leading_rules(&DART, FLUTTER_RULES)
}
