//! English message catalog for domain error codes
//!
//! Templates use `$0`, `$1`, ... for the error's arguments. Callers that
//! localize should key off the code and args instead of parsing these.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static CATALOG: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("NoInputProcessed", "No input has been processed yet"),
        ("NonAsciiInMathMode", "Non-ASCII character \"$0\" is not allowed in math mode"),
        ("IllegalCharacter", "Illegal character $0 in input"),
        ("IllegalFinalBackslash", "Input must not end with a backslash"),
        ("TooManyTokens", "Input exceeds the limit of $0 tokens"),
        ("TooDeeplyNested", "Input nests deeper than the limit of $0 levels"),
        ("UnrecognisedCommand", "Unrecognised command \"$0\""),
        ("ReservedCommand", "The command \"$0\" is not allowed here"),
        ("UnmatchedOpenBrace", "Unmatched open brace \"{\""),
        ("UnmatchedCloseBrace", "Unmatched close brace \"}\""),
        ("MissingCloseBracket", "Missing \"]\" after the optional argument of \"$0\""),
        ("DoubleSuperscript", "More than one superscript on the same base"),
        ("DoubleSubscript", "More than one subscript on the same base"),
        ("MissingArgument", "Missing argument for \"$0\""),
        ("MisplacedLimits", "\"$0\" may only follow a large operator or function name"),
        ("UnmatchedLeft", "\"\\left\" without a matching \"\\right\""),
        ("UnmatchedRight", "\"\\right\" without a matching \"\\left\""),
        ("MissingDelimiter", "Missing delimiter after \"$0\""),
        ("IllegalDelimiter", "\"$0\" cannot be used as a delimiter"),
        ("IllegalAlignment", "Alignment \"$0\" is only allowed inside a table"),
    ])
});

/// Format `code` with `args`; unknown codes fall back to the code followed by its args
pub fn format_message(code: &str, args: &[String]) -> String {
    let Some(template) = CATALOG.get(code) else {
        if args.is_empty() {
            return code.to_string();
        }
        return format!("{} ({})", code, args.join(", "));
    };

    // One left-to-right pass, so argument text is never rescanned
    let mut message = String::with_capacity(template.len());
    let mut rest = *template;
    while let Some(dollar) = rest.find('$') {
        message.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        match after[..digits].parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => message.push_str(arg),
            None => message.push_str(&rest[dollar..dollar + 1 + digits]),
        }
        rest = &after[digits..];
    }
    message.push_str(rest);
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_known_code(code: &str) -> bool {
        CATALOG.contains_key(code)
    }

    #[test]
    fn test_substitutes_args() {
        assert_eq!(
            format_message("UnrecognisedCommand", &["\\foo".to_string()]),
            "Unrecognised command \"\\foo\""
        );
        assert_eq!(
            format_message("TooManyTokens", &["2500".to_string()]),
            "Input exceeds the limit of 2500 tokens"
        );
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(format_message("SomethingOdd", &[]), "SomethingOdd");
        assert_eq!(
            format_message("SomethingOdd", &["a".to_string(), "b".to_string()]),
            "SomethingOdd (a, b)"
        );
    }

    #[test]
    fn test_argument_text_is_not_rescanned() {
        assert_eq!(
            format_message("UnrecognisedCommand", &["$0$1".to_string()]),
            "Unrecognised command \"$0$1\""
        );
        assert_eq!(
            format_message("TooManyTokens", &[]),
            "Input exceeds the limit of $0 tokens"
        );
    }

    #[test]
    fn test_engine_codes_have_messages() {
        for code in [
            "NoInputProcessed",
            "UnrecognisedCommand",
            "MissingArgument",
            "UnmatchedLeft",
            "IllegalAlignment",
            "TooDeeplyNested",
        ] {
            assert!(is_known_code(code), "{} has no message", code);
        }
    }
}
