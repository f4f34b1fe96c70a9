//! 심볼 목록 출력.

use signal_core::{Direction, SignalToken, SymbolRoster};

/// 심볼 목록(또는 검색 결과)과 각 버튼의 콜백 데이터를 표 형태로 렌더링합니다.
pub fn render_symbols(roster: &SymbolRoster, search: Option<&str>) -> String {
    let symbols: Vec<&str> = match search {
        Some(keyword) => roster.filter(keyword),
        None => roster.symbols().iter().map(String::as_str).collect(),
    };

    if symbols.is_empty() {
        return format!("일치하는 심볼이 없습니다: {}\n", search.unwrap_or_default());
    }

    let mut out = format!("{:<4} {:<12} {:<16} {}\n", "#", "SYMBOL", "UP", "DOWN");
    for (idx, symbol) in symbols.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<12} {:<16} {}\n",
            idx + 1,
            symbol,
            SignalToken::new(*symbol, Direction::Up).encode(),
            SignalToken::new(*symbol, Direction::Down).encode(),
        ));
    }
    out
}
