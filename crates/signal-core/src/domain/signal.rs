//! 시그널 방향과 토큰.
//!
//! 버튼을 렌더링할 때 `(심볼, 방향)` 쌍을 토큰으로 인코딩해 콜백 데이터에
//! 싣고, 사용자가 버튼을 누르면 같은 토큰을 디코딩합니다. 렌더링과 클릭
//! 사이에 서버 측 세션이 없으므로 토큰 자체가 필요한 상태 전부입니다.
//!
//! 형식: `{symbol}|{UP|DOWN}` (예: `EUR/USD|UP`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SignalError, SignalResult};

/// 심볼과 방향을 구분하는 문자. 유효한 심볼에는 포함될 수 없습니다.
pub const TOKEN_SEPARATOR: char = '|';

/// 텔레그램 `callback_data` 최대 길이 (바이트).
pub const CALLBACK_DATA_LIMIT: usize = 64;

/// 시그널 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// 상승
    Up,
    /// 하락
    Down,
}

impl Direction {
    /// 토큰에 기록되는 리터럴.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }

    /// 알림 메시지용 화살표.
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "⬆️",
            Direction::Down => "⬇️",
        }
    }

    /// 버튼 라벨용 차트 이모지.
    pub fn chart_emoji(&self) -> &'static str {
        match self {
            Direction::Up => "📈",
            Direction::Down => "📉",
        }
    }

    /// 모든 방향 (버튼 렌더링 순서).
    pub fn all() -> [Direction; 2] {
        [Direction::Up, Direction::Down]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// 대소문자를 구분합니다. `up`이나 `Down`은 거부됩니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            other => Err(format!("알 수 없는 방향: {:?}", other)),
        }
    }
}

/// 사용자가 선택한 `(심볼, 방향)` 쌍.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalToken {
    pub symbol: String,
    pub direction: Direction,
}

impl SignalToken {
    /// 새 토큰을 생성합니다.
    ///
    /// 심볼에 구분자가 없다는 것은 호출자의 전제 조건입니다.
    /// (설정 로드 시 `BotConfig::validate`에서 보장)
    pub fn new(symbol: impl Into<String>, direction: Direction) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
        }
    }

    /// 토큰을 콜백 데이터 문자열로 인코딩합니다.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(Self::encoded_len(&self.symbol, self.direction));
        out.push_str(&self.symbol);
        out.push(TOKEN_SEPARATOR);
        out.push_str(self.direction.as_str());
        out
    }

    /// 인코딩 결과의 길이 (바이트).
    pub fn encoded_len(symbol: &str, direction: Direction) -> usize {
        symbol.len() + TOKEN_SEPARATOR.len_utf8() + direction.as_str().len()
    }

    /// 콜백 데이터 문자열을 디코딩합니다.
    ///
    /// 구분자가 정확히 하나가 아니거나, 심볼이 비어 있거나, 방향이
    /// `UP`/`DOWN`이 아니면 `MalformedToken`을 반환합니다.
    pub fn decode(token: &str) -> SignalResult<Self> {
        let Some((symbol, direction)) = token.split_once(TOKEN_SEPARATOR) else {
            return Err(SignalError::malformed(token, "구분자 없음"));
        };

        if direction.contains(TOKEN_SEPARATOR) {
            return Err(SignalError::malformed(token, "구분자 중복"));
        }

        if symbol.is_empty() {
            return Err(SignalError::malformed(token, "심볼이 비어 있음"));
        }

        let direction = direction
            .parse::<Direction>()
            .map_err(|reason| SignalError::malformed(token, reason))?;

        Ok(Self::new(symbol, direction))
    }
}

impl fmt::Display for SignalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for SignalToken {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        assert_eq!(SignalToken::new("EUR/USD", Direction::Up).encode(), "EUR/USD|UP");
        assert_eq!(
            SignalToken::new("USD/JPY", Direction::Down).encode(),
            "USD/JPY|DOWN"
        );
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        let token = SignalToken::new("GBP/NZD", Direction::Down);
        assert_eq!(
            token.encode().len(),
            SignalToken::encoded_len(&token.symbol, token.direction)
        );
    }

    #[test]
    fn test_decode_valid() {
        let token = SignalToken::decode("AUD/CAD|DOWN").unwrap();
        assert_eq!(token.symbol, "AUD/CAD");
        assert_eq!(token.direction, Direction::Down);
    }

    #[test]
    fn test_decode_missing_separator() {
        assert!(matches!(
            SignalToken::decode("EUR/USD UP"),
            Err(SignalError::MalformedToken { .. })
        ));
        assert!(SignalToken::decode("").is_err());
    }

    #[test]
    fn test_decode_multiple_separators() {
        assert!(matches!(
            SignalToken::decode("EUR|USD|UP"),
            Err(SignalError::MalformedToken { .. })
        ));
        assert!(SignalToken::decode("EUR/USD|UP|").is_err());
    }

    #[test]
    fn test_decode_direction_is_case_sensitive() {
        assert!(SignalToken::decode("EUR/USD|up").is_err());
        assert!(SignalToken::decode("EUR/USD|Down").is_err());
        assert!(SignalToken::decode("EUR/USD|SIDEWAYS").is_err());
        assert!(SignalToken::decode("EUR/USD|").is_err());
    }

    #[test]
    fn test_decode_empty_symbol() {
        assert!(SignalToken::decode("|UP").is_err());
    }

    #[test]
    fn test_direction_display_and_arrow() {
        assert_eq!(Direction::Up.to_string(), "UP");
        assert_eq!(Direction::Down.arrow(), "⬇️");
        assert_eq!(Direction::all(), [Direction::Up, Direction::Down]);
    }
}
