//! 인라인 키보드 렌더링.

use serde::Serialize;
use signal_core::{Direction, SignalToken};

/// 인라인 키보드 버튼.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

/// 인라인 키보드 (`reply_markup`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// 심볼마다 UP/DOWN 버튼 한 줄씩 생성합니다.
    ///
    /// 각 버튼의 콜백 데이터는 인코딩된 `SignalToken`입니다.
    pub fn signal_buttons<'a, I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let inline_keyboard = symbols
            .into_iter()
            .map(|symbol| {
                Direction::all()
                    .into_iter()
                    .map(|direction| signal_button(symbol, direction))
                    .collect()
            })
            .collect();

        Self { inline_keyboard }
    }

    /// 버튼 줄 수.
    pub fn rows(&self) -> usize {
        self.inline_keyboard.len()
    }

    /// 모든 버튼 (줄 순서).
    pub fn buttons(&self) -> impl Iterator<Item = &InlineKeyboardButton> {
        self.inline_keyboard.iter().flatten()
    }
}

fn signal_button(symbol: &str, direction: Direction) -> InlineKeyboardButton {
    InlineKeyboardButton {
        text: format!("{} {} (OTC) {}", direction.chart_emoji(), symbol, direction),
        callback_data: SignalToken::new(symbol, direction).encode(),
    }
}
