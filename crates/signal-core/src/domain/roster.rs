//! 심볼 목록.

use serde::{Deserialize, Serialize};

/// 기본 OTC 통화쌍 목록.
pub const DEFAULT_SYMBOLS: &[&str] = &[
    "EUR/GBP", "EUR/USD", "USD/ARS", "USD/BDT", "USD/PKR", "EUR/CAD", "USD/IDR", "EUR/CHF",
    "EUR/NZD", "USD/COP", "USD/PHP", "AUD/USD", "NZD/CAD", "USD/CAD", "USD/CHF", "USD/NGN",
    "USD/TRY", "EUR/JPY", "USD/ZAR", "CAD/CHF", "CHF/JPY", "USD/JPY", "AUD/CAD", "AUD/CHF",
    "AUD/JPY", "GBP/AUD", "GBP/USD", "NZD/CHF", "NZD/JPY", "GBP/CAD", "USD/DZD", "EUR/AUD",
    "USD/EGP", "USD/MXN", "CAD/JPY", "NZD/USD", "GBP/NZD",
];

/// 버튼으로 노출할 고정 심볼 목록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolRoster {
    symbols: Vec<String>,
}

impl Default for SymbolRoster {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect())
    }
}

impl SymbolRoster {
    /// 새 목록을 생성합니다.
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    /// 전체 심볼 (설정 순서).
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// 키워드를 포함하는 심볼을 목록 순서대로 반환합니다 (대소문자 무시).
    pub fn filter(&self, keyword: &str) -> Vec<&str> {
        let needle = keyword.to_uppercase();
        self.symbols
            .iter()
            .filter(|symbol| symbol.to_uppercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(symbols: &[&str]) -> SymbolRoster {
        SymbolRoster::new(symbols.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_default_roster() {
        let roster = SymbolRoster::default();
        assert_eq!(roster.len(), 37);
        assert_eq!(roster.symbols()[0], "EUR/GBP");
    }

    #[test]
    fn test_filter_case_insensitive() {
        let roster = roster(&["USD/CAD", "EUR/GBP"]);
        assert_eq!(roster.filter("USD"), vec!["USD/CAD"]);
        assert_eq!(roster.filter("usd"), vec!["USD/CAD"]);
        assert_eq!(roster.filter("gBp"), vec!["EUR/GBP"]);
    }

    #[test]
    fn test_filter_preserves_roster_order() {
        let roster = SymbolRoster::default();
        let matches = roster.filter("jpy");

        assert_eq!(
            matches,
            vec!["EUR/JPY", "CHF/JPY", "USD/JPY", "AUD/JPY", "NZD/JPY", "CAD/JPY"]
        );
    }

    #[test]
    fn test_filter_no_match() {
        let roster = roster(&["USD/CAD", "EUR/GBP"]);
        assert!(roster.filter("BTC").is_empty());
    }
}
