// =============================================================================
// Ticker lookup by company name
// =============================================================================
//
// Fallback used when the user typed something that is not a listed symbol.
// A case-insensitive substring match against a small static table; the first
// entry in table order wins.

/// Known `(ticker, company name)` pairs, in match priority order.
const KNOWN_COMPANIES: &[(&str, &str)] = &[
    ("TSLA", "Tesla, Inc."),
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("O", "Realty Income Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com, Inc."),
];

/// Resolve `query` to a ticker when it is a substring of a known ticker or
/// company name.  Blank queries never match.
pub fn resolve_ticker(query: &str) -> Option<&'static str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    KNOWN_COMPANIES
        .iter()
        .find(|(ticker, company)| {
            ticker.to_lowercase().contains(&needle) || company.to_lowercase().contains(&needle)
        })
        .map(|(ticker, _)| *ticker)
}

/// Company name for a known ticker (exact, case-insensitive).
pub fn company_name(ticker: &str) -> Option<&'static str> {
    KNOWN_COMPANIES
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(ticker.trim()))
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_company_names() {
        assert_eq!(resolve_ticker("Tesla"), Some("TSLA"));
        assert_eq!(resolve_ticker("apple"), Some("AAPL"));
        assert_eq!(resolve_ticker("MICROSOFT"), Some("MSFT"));
        assert_eq!(resolve_ticker("alphabet"), Some("GOOGL"));
        assert_eq!(resolve_ticker("amazon"), Some("AMZN"));
        assert_eq!(resolve_ticker("realty"), Some("O"));
    }

    #[test]
    fn resolves_partial_tickers() {
        assert_eq!(resolve_ticker("googl"), Some("GOOGL"));
        assert_eq!(resolve_ticker("amz"), Some("AMZN"));
    }

    #[test]
    fn first_match_in_table_order_wins() {
        // "inc" appears in Tesla, Apple, Realty Income, Alphabet and Amazon.
        assert_eq!(resolve_ticker("inc"), Some("TSLA"));
    }

    #[test]
    fn unknown_or_blank_query() {
        assert_eq!(resolve_ticker("nvidia"), None);
        assert_eq!(resolve_ticker("   "), None);
        assert_eq!(resolve_ticker(""), None);
    }

    #[test]
    fn company_name_lookup() {
        assert_eq!(company_name("msft"), Some("Microsoft Corporation"));
        assert_eq!(company_name("NVDA"), None);
    }
}
