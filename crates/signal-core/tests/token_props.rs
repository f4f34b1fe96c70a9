//! 시그널 토큰 속성 테스트
//!
//! 인코딩/디코딩 왕복과 잘못된 토큰 거부를 임의 입력으로 검증합니다.

use proptest::prelude::*;
use signal_core::{Direction, SignalError, SignalToken, TOKEN_SEPARATOR};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Up), Just(Direction::Down)]
}

proptest! {
    #[test]
    fn roundtrip_currency_pairs(base in "[A-Z]{3}", quote in "[A-Z]{3}", dir in direction()) {
        let token = SignalToken::new(format!("{base}/{quote}"), dir);
        prop_assert_eq!(SignalToken::decode(&token.encode()).unwrap(), token);
    }

    #[test]
    fn roundtrip_any_symbol_without_separator(symbol in "[^|]{1,40}", dir in direction()) {
        let token = SignalToken::new(symbol.clone(), dir);
        let encoded = token.encode();

        prop_assert_eq!(encoded.len(), SignalToken::encoded_len(&symbol, dir));
        prop_assert_eq!(SignalToken::decode(&encoded).unwrap(), token);
    }

    #[test]
    fn missing_separator_is_malformed(raw in "[^|]{0,40}") {
        let is_malformed = matches!(
            SignalToken::decode(&raw),
            Err(SignalError::MalformedToken { .. })
        );
        prop_assert!(is_malformed);
    }

    #[test]
    fn extra_separator_is_malformed(
        symbol in "[^|]{1,20}",
        middle in "[^|]{0,10}",
        dir in direction(),
    ) {
        let raw = format!("{symbol}{TOKEN_SEPARATOR}{middle}{TOKEN_SEPARATOR}{dir}");
        prop_assert!(SignalToken::decode(&raw).is_err());
    }

    #[test]
    fn unknown_direction_is_malformed(symbol in "[^|]{1,20}", literal in "[^|]{0,10}") {
        prop_assume!(literal != "UP" && literal != "DOWN");

        let raw = format!("{symbol}{TOKEN_SEPARATOR}{literal}");
        prop_assert!(SignalToken::decode(&raw).is_err());
    }
}

#[test]
fn test_lowercase_direction_never_decodes_to_a_pair() {
    for raw in ["EUR/USD|up", "EUR/USD|down", "EUR/USD|Up", "EUR/USD|dOWN"] {
        assert!(SignalToken::decode(raw).is_err(), "{raw} should be rejected");
    }
}
