//! Rule file integration tests.
//!
//! Loads rule sets from JSON and from the built-in presets and checks the
//! token streams the configured scanners produce.

use lexis_ruleset::{Ruleset, RulesetError};
use lexis_scanner::{RuleError, TokenValue};
use pretty_assertions::assert_eq;

/// Helper: scan all tokens and return (kind name, value text) pairs,
/// excluding the end token.
fn scan_all(ruleset: &Ruleset, source: &str) -> Vec<(String, String)> {
    let scanner = ruleset.build_scanner(source.as_bytes()).unwrap();
    scanner
        .map(|t| t.unwrap())
        .filter(|t| !t.is_end())
        .map(|t| (ruleset.kind_name(*t.kind()).to_string(), t.value().to_string()))
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const DEMO: &str = "#include<stdio.h>\n\
\n\
int main (int argc, char argv[]) {\n\
\x20   printf ('Hello, World!');//打印Hello, World!\n\
\x20   return 0;\n\
}\n\
\n\
/*\n\
\x20   int Sum (int a, int b) {\n\
\x20       return a + b;\n\
\x20   }\n\
*/\n";

#[test]
fn test_c_preset_demo_program() {
    let ruleset = Ruleset::preset("c").unwrap();
    let tokens = scan_all(&ruleset, DEMO);
    assert_eq!(
        tokens,
        pairs(&[
            ("NumberSign", "#"),
            ("Include", ""),
            ("LessThan", "<"),
            ("Unknown", "stdio.h"),
            ("GreaterThan", ">"),
            ("Int", ""),
            ("Unknown", "main"),
            ("LeftParenthesis", "("),
            ("Int", ""),
            ("Unknown", "argc"),
            ("Comma", ","),
            ("Char", ""),
            ("Unknown", "argv"),
            ("LeftBracket", "["),
            ("RightBracket", "]"),
            ("RightParenthesis", ")"),
            ("LeftBrace", "{"),
            ("Unknown", "printf"),
            ("LeftParenthesis", "("),
            ("String", "Hello, World!"),
            ("RightParenthesis", ")"),
            ("Semicolon", ";"),
            ("LineComment", "打印Hello, World!"),
            ("Return", ""),
            ("Integer", "0"),
            ("Semicolon", ";"),
            ("RightBrace", "}"),
            (
                "BlockComment",
                "\n    int Sum (int a, int b) {\n        return a + b;\n    }\n"
            ),
        ])
    );
}

#[test]
fn test_c_preset_positions() {
    let ruleset = Ruleset::preset("c").unwrap();
    let mut scanner = ruleset.build_scanner(DEMO.as_bytes()).unwrap();
    let ret = ruleset.kind("Return").unwrap();
    let token = loop {
        let token = scanner.next_token().unwrap();
        assert!(!token.is_end(), "no return keyword found");
        if *token.kind() == ret {
            break token;
        }
    };
    assert_eq!((token.line(), token.column(), token.length()), (5, 4, 6));
    assert!(!scanner.diagnostics().has_errors());
}

#[test]
fn test_c_preset_tail_plus() {
    let ruleset = Ruleset::preset("c").unwrap();
    assert_eq!(
        scan_all(&ruleset, "a + +1"),
        pairs(&[("Unknown", "a"), ("Plus", "+"), ("Integer", "1")])
    );
}

#[test]
fn test_custom_rules() {
    let ruleset = Ruleset::from_json_str(
        r#"{
            "caseInsensitive": true,
            "sentinels": { "unknown": "Ident" },
            "symbols": [
                { "text": ":=", "kind": "Assign" },
                { "text": "<>", "kind": "NotEqual", "value": "ne" }
            ],
            "keywords": [
                { "text": "begin", "kind": "Begin" },
                { "text": "true", "kind": "Bool", "value": 1 }
            ],
            "chars": { ";": "Semi" },
            "blocks": [{ "kind": "Comment", "start": "{", "end": "}" }]
        }"#,
    )
    .unwrap();

    assert_eq!(
        scan_all(&ruleset, "BEGIN x := TRUE; {note} x <> 2.5"),
        pairs(&[
            ("Begin", ""),
            ("Ident", "x"),
            ("Assign", ""),
            ("Bool", "1"),
            ("Semi", ";"),
            ("Comment", "note"),
            ("Ident", "x"),
            ("NotEqual", "ne"),
            ("Decimal", "2.5"),
        ])
    );
}

#[test]
fn test_toggles_and_char_sets() {
    let ruleset = Ruleset::from_json_str(
        r#"{
            "allowNumber": false,
            "stringStartChars": "`",
            "keywordBreakChars": "-",
            "ignoreChars": " "
        }"#,
    )
    .unwrap();
    assert_eq!(
        scan_all(&ruleset, "12-`a b` 'c'"),
        pairs(&[
            ("Unknown", "12"),
            ("Unknown", "-"),
            ("String", "a b"),
            ("Unknown", "'c'"),
        ])
    );
}

#[test]
fn test_fixed_value_types() {
    let ruleset = Ruleset::from_json_str(
        r#"{ "keywords": [{ "text": "half", "kind": "Const", "value": 2.75 }] }"#,
    )
    .unwrap();
    let mut scanner = ruleset.build_scanner("half".as_bytes()).unwrap();
    let token = scanner.next_token().unwrap();
    assert!((token.value().to_f64_or(0.0) - 2.75).abs() < 1e-12);
    assert!(matches!(token.value(), TokenValue::Decimal(_)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_preset() {
    let err = Ruleset::preset("cobol").unwrap_err();
    assert!(matches!(err, RulesetError::UnknownPreset(ref name) if name == "cobol"));
    assert_eq!(err.to_string(), "unknown preset 'cobol' (available: c)");
}

#[test]
fn test_invalid_char_key() {
    let err = Ruleset::from_json_str(r#"{ "chars": { "ab": "Bad" } }"#).unwrap_err();
    assert!(matches!(err, RulesetError::InvalidChar(ref key) if key == "ab"));
}

#[test]
fn test_duplicate_rule_is_reported_at_load() {
    let err = Ruleset::from_json_str(
        r#"{ "keywords": [
            { "text": "if", "kind": "If" },
            { "text": "if", "kind": "Other" }
        ] }"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RulesetError::Rule(RuleError::DuplicateKeyword(ref text)) if text == "if"
    ));
}

#[test]
fn test_empty_block_delimiter() {
    let err = Ruleset::from_json_str(r#"{ "blocks": [{ "kind": "C", "start": "", "end": "*/" }] }"#)
        .unwrap_err();
    assert!(matches!(err, RulesetError::Rule(RuleError::EmptyDelimiter(_))));
}

#[test]
fn test_malformed_json() {
    let err = Ruleset::from_json_str("{ \"chars\": ").unwrap_err();
    assert!(matches!(err, RulesetError::Json(_)));
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("lexis_rules_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "chars": { ";": "Semi" } }"#).unwrap();
    let ruleset = Ruleset::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(scan_all(&ruleset, ";"), pairs(&[("Semi", ";")]));

    let err = Ruleset::from_file(&path).unwrap_err();
    assert!(matches!(err, RulesetError::Io { .. }));
}
