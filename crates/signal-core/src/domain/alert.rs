//! 시그널 알림 메시지 포맷.
//!
//! 알림 시각은 토큰 생성 시점이 아니라 포맷 시점(버튼 클릭 시점)에 결정됩니다.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::signal::{Direction, SignalToken};

/// 알림 시각 표기 (12시간제, 예: `03:07 PM`).
pub const SIGNAL_TIME_FORMAT: &str = "%I:%M %p";

/// 기본 타임프레임 라벨.
pub const DEFAULT_TIMEFRAME: &str = "1 Minute";

/// 시그널 알림 포맷터.
///
/// 설정값(타임프레임 라벨, 표시 시간대)만 보유하며 상태가 없습니다.
#[derive(Debug, Clone)]
pub struct AlertFormatter {
    timeframe: String,
    timezone: Tz,
}

impl Default for AlertFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEFRAME, Tz::UTC)
    }
}

impl AlertFormatter {
    /// 새 포맷터를 생성합니다.
    pub fn new(timeframe: impl Into<String>, timezone: Tz) -> Self {
        Self {
            timeframe: timeframe.into(),
            timezone,
        }
    }

    /// 표시 시간대.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// 알림 본문을 Markdown 형식으로 생성합니다.
    pub fn format(&self, signal: &SignalToken, at: DateTime<Utc>) -> String {
        format_alert(
            &signal.symbol,
            signal.direction,
            &self.timeframe,
            &at.with_timezone(&self.timezone),
        )
    }
}

/// 시그널 알림 템플릿.
pub fn format_alert<Z: TimeZone>(
    symbol: &str,
    direction: Direction,
    timeframe: &str,
    at: &DateTime<Z>,
) -> String
where
    Z::Offset: std::fmt::Display,
{
    let arrow = direction.arrow();
    let signal_time = at.format(SIGNAL_TIME_FORMAT);

    format!(
        "📊 *Premium OTC Signal Alert!*\n\n\
         📌 *Asset:* `{symbol} (OTC)`\n\
         🕐 *Timeframe:* {timeframe}\n\
         📈 *Direction:* {arrow} *{direction}*\n\n\
         📣 _Use proper entry strategy & risk management._\n\
         🔔 *Signal Time:* `{signal_time}`"
    )
}
