//! Kotlin strategy.
//!
//! Several Kotlin declarations are a keyword pair around `class`. The pairs
//! come first in the rule table so `data class` is a struct, `enum class` an
//! enum and `annotation class` a decorator, never also a plain class.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

macro_rules! kotlin_decl {
    ($tail:literal) => {
        concat!(
            r"^\s*(?:@[\w.]+(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|internal|open|final|abstract|sealed|override|lateinit|inline|noinline|crossinline|suspend|infix|operator|tailrec|external|inner|actual|expect|companion|const|data|value|enum|annotation)\s+)*",
            $tail
        )
    };
}

pub static KOTLIN: PatternLanguage = PatternLanguage {
    name: "Kotlin",
    extensions: &["kt", "kts"],
    delimiters: Delimiters {
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        nested_comments: true,
        regex_literals: false,
        strings: &[
            StringRule::raw("\"\"\"", "\"\"\""),
            StringRule::plain("\"", "\""),
            StringRule::plain("'", "'"),
        ],
    },
    symbol_rules: &[
        SymbolRule::new(
            SymbolKind::Decorator,
            kotlin_decl!(r"annotation\s+class\s+(?P<name>\w+)"),
        ),
        SymbolRule::new(SymbolKind::Enum, kotlin_decl!(r"enum\s+class\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Struct, kotlin_decl!(r"data\s+class\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Struct, kotlin_decl!(r"value\s+class\s+(?P<name>\w+)")),
        SymbolRule::new(
            SymbolKind::Interface,
            kotlin_decl!(r"fun\s+interface\s+(?P<name>\w+)"),
        ),
        SymbolRule::new(SymbolKind::Interface, kotlin_decl!(r"interface\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Class, kotlin_decl!(r"class\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Class, kotlin_decl!(r"object\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::TypeAlias, kotlin_decl!(r"typealias\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Constant, kotlin_decl!(r"const\s+val\s+(?P<name>\w+)")),
        SymbolRule::new(
            SymbolKind::Function,
            kotlin_decl!(r"fun\s+(?:<[^>]*>\s*)?(?:[\w.<>?]+\.)?(?P<name>\w+)\s*\("),
        ),
    ],
    import_rules: &[ImportRule::Line(
        r"^\s*import\s+(?P<spec>[\w.]+(?:\.\*)?)",
    )],
    excluded_names: &["if", "for", "while", "when", "catch", "return", "throw", "try", "else"],
    import_syntax: ImportSyntax::Dotted,
    resolve_extensions: &["kt", "kts", "java"],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::patterns::PatternStrategy;
    use crate::languages::{ExtractBudget, Extraction, LanguageStrategy};

    fn extract(source: &str) -> Extraction {
        PatternStrategy::new(&KOTLIN)
            .extract(source, &ExtractBudget::unlimited())
            .unwrap()
    }

    fn found(ex: &Extraction) -> Vec<(SymbolKind, &str)> {
        ex.symbols.iter().map(|s| (s.kind, s.name.as_str())).collect()
    }

    #[test]
    fn keyword_pairs_map_to_one_kind() {
        let ex = extract(
            r#"
data class User(val id: Int, val name: String)
enum class Color { RED, GREEN }
annotation class Inject
@JvmInline value class Email(val raw: String)
fun interface Handler { fun handle() }
sealed interface Event
open class Base
internal object Registry
typealias Users = List<User>
const val MAX_USERS = 10
"#,
        );
        assert_eq!(
            found(&ex),
            vec![
                (SymbolKind::Struct, "User"),
                (SymbolKind::Enum, "Color"),
                (SymbolKind::Decorator, "Inject"),
                (SymbolKind::Struct, "Email"),
                (SymbolKind::Interface, "Handler"),
                (SymbolKind::Interface, "Event"),
                (SymbolKind::Class, "Base"),
                (SymbolKind::Class, "Registry"),
                (SymbolKind::TypeAlias, "Users"),
                (SymbolKind::Constant, "MAX_USERS"),
            ]
        );
    }

    #[test]
    fn functions_and_extensions() {
        let ex = extract(
            "class Repo {\n    suspend fun load(id: Int): User? = null\n    private fun <T> List<T>.second(): T = this[1]\n}\nfun String.shout() = uppercase()\n",
        );
        assert_eq!(
            found(&ex),
            vec![
                (SymbolKind::Class, "Repo"),
                (SymbolKind::Function, "load"),
                (SymbolKind::Function, "second"),
                (SymbolKind::Function, "shout"),
            ]
        );
    }

    #[test]
    fn raw_strings_hide_declarations() {
        let ex = extract("val sql = \"\"\"\nclass Fake\n\"\"\"\nclass Real\n");
        assert_eq!(found(&ex), vec![(SymbolKind::Class, "Real")]);
    }

    #[test]
    fn imports() {
        let ex = extract("package app\n\nimport com.example.model.User\nimport com.example.util.*\n");
        let specs: Vec<&str> = ex.imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(specs, vec!["com.example.model.User", "com.example.util.*"]);
    }
}
