use market::price_history::PriceHistory;
use market::units::format_units;
use market::{MarketSnapshot, SwapQuote};

pub(crate) fn market_line(snapshot: &MarketSnapshot) -> String {
    format!(
        "[{}] fee {} | price {}",
        snapshot.observed_at.format("%H:%M:%S"),
        snapshot.fee_bps,
        snapshot.price
    )
}

pub(crate) fn history_line(history: &PriceHistory) -> String {
    let points: Vec<String> = history
        .iter()
        .map(|s| format!("{} {}", s.time_label(), s.price))
        .collect();

    match history.range() {
        Some((lo, hi)) => format!("history [{}] (min {lo}, max {hi})", points.join(", ")),
        None => "history []".to_string(),
    }
}

pub(crate) fn quote_line(quote: &SwapQuote, token_out_decimals: u8) -> String {
    format!(
        "in {} | fee {} | estimated out {} | min out {} ({} slippage)",
        quote.amount_in,
        quote.fee_bps,
        quote.estimated_out.to_plain_string(),
        format_units(quote.min_amount_out_raw, token_out_decimals),
        quote.slippage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use market::{FeeBps, OraclePrice, PriceSample, QuoteEngine};

    fn snapshot(secs: i64, price: &str) -> MarketSnapshot {
        MarketSnapshot {
            fee_bps: FeeBps::new(100).unwrap(),
            price: OraclePrice::new(price.parse().unwrap()).unwrap(),
            observed_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn market_line_shows_percent_fee_and_plain_price() {
        let line = market_line(&snapshot(3_723, "2000.50000000"));
        assert_eq!(line, "[01:02:03] fee 1.00% | price 2000.5");
    }

    #[test]
    fn history_line_lists_samples_and_bounds() {
        let mut history = PriceHistory::with_capacity(10);
        assert_eq!(history_line(&history), "history []");

        for (t, p) in [(0, "2000"), (10, "1990")] {
            let s = snapshot(t, p);
            history.push(PriceSample {
                at: s.observed_at,
                price: s.price,
            });
        }
        assert_eq!(
            history_line(&history),
            "history [00:00:00 2000, 00:00:10 1990] (min 1990, max 2000)"
        );
    }

    #[test]
    fn quote_line_formats_min_out_in_token_units() {
        let q = QuoteEngine::default()
            .quote("1.5", Some(&snapshot(0, "2000")))
            .unwrap();
        assert_eq!(
            quote_line(&q, 18),
            "in 1.5 | fee 1.00% | estimated out 2970.000000 | min out 2940.300000000000000000 (1.00% slippage)"
        );
    }
}
