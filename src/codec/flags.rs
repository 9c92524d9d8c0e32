//! Flag tokens: `+b` allows flag `b`, `-T_` denies flag `T_`.

use serde_yaml::Value;

use crate::types::{FlagKey, FlagState, Flags};

/// Parse one token. Unrecognized shapes yield `None`.
fn parse_token(token: &str) -> Option<(FlagKey, FlagState)> {
    let chars: Vec<char> = token.chars().collect();
    let (sign, key) = match chars.as_slice() {
        [sign, key] if *key != '_' => (*sign, key.to_string()),
        [sign, a, b] if *a == '_' || *b == '_' => (*sign, [*a, *b].iter().collect()),
        _ => return None,
    };
    let state = match sign {
        '+' => FlagState::Allow,
        '-' => FlagState::Deny,
        _ => return None,
    };
    Some((FlagKey::new(&key)?, state))
}

/// Decode a list of flag tokens. Never fails: anything that is not a list of
/// well-formed tokens contributes nothing.
pub fn decode(value: Option<&Value>) -> Flags {
    let mut flags = Flags::new();
    let Some(tokens) = value.and_then(Value::as_sequence) else {
        return flags;
    };
    for (key, state) in tokens
        .iter()
        .filter_map(Value::as_str)
        .filter_map(parse_token)
    {
        flags.set(key, state);
    }
    flags
}

/// Encode every non-UNSET flag as a token, ordered by key.
pub fn encode(flags: &Flags) -> Value {
    let tokens = flags
        .iter()
        .filter_map(|(key, state)| match state {
            FlagState::Allow => Some(format!("+{key}")),
            FlagState::Deny => Some(format!("-{key}")),
            FlagState::Unset => None,
        })
        .map(Value::String)
        .collect();
    Value::Sequence(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn decode_tokens(tokens: &[&str]) -> Flags {
        let value = Value::Sequence(tokens.iter().map(|t| Value::String(t.to_string())).collect());
        decode(Some(&value))
    }

    #[parameterized(
        allow_single = { "+A", Some(("A", FlagState::Allow)) },
        deny_single = { "-b", Some(("b", FlagState::Deny)) },
        deny_trailing_underscore = { "-T_", Some(("T_", FlagState::Deny)) },
        allow_leading_underscore = { "+_c", Some(("_c", FlagState::Allow)) },
        lone_underscore = { "+_", None },
        two_letters = { "+AB", None },
        unknown_sign = { "*A", None },
        too_short = { "+", None },
        too_long = { "+A_B", None },
        empty = { "", None },
    )]
    fn test_parse_token(token: &str, expected: Option<(&str, FlagState)>) {
        let parsed = parse_token(token);
        let expected = expected.map(|(key, state)| (FlagKey::new(key).unwrap(), state));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_decode_ignores_garbage() {
        let flags = decode_tokens(&["+A", "-T_", "+_", "+AB", "junk"]);
        assert_eq!(flags.len(), 2);
        assert_eq!(flags.get("A"), FlagState::Allow);
        assert_eq!(flags.get("T_"), FlagState::Deny);
    }

    #[test]
    fn test_decode_later_token_wins() {
        let flags = decode_tokens(&["+p", "-p"]);
        assert_eq!(flags.get("p"), FlagState::Deny);
    }

    #[test]
    fn test_decode_absent_or_not_a_list() {
        assert!(decode(None).is_empty());
        assert!(decode(Some(&Value::String("+A".into()))).is_empty());
        let mixed: Value = serde_yaml::from_str("[1, true, '+b']").unwrap();
        assert_eq!(decode(Some(&mixed)).len(), 1);
    }

    #[test]
    fn test_encode() {
        let flags = decode_tokens(&["+p", "-T_", "+_c", "-b"]);
        let encoded: Vec<String> = serde_yaml::from_value(encode(&flags)).unwrap();
        insta::assert_json_snapshot!(encoded, @r#"
        [
          "-T_",
          "+_c",
          "-b",
          "+p"
        ]
        "#);
    }

    #[test]
    fn test_round_trip() {
        let mut flags = Flags::new();
        for (key, state) in [
            ("b", FlagState::Allow),
            ("p", FlagState::Deny),
            ("T_", FlagState::Allow),
            ("_x", FlagState::Deny),
        ] {
            flags.set(key.parse().unwrap(), state);
        }
        assert_eq!(decode(Some(&encode(&flags))), flags);
        assert_eq!(encode(&Flags::new()), Value::Sequence(vec![]));
    }
}
