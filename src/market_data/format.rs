//! Display formatting for prices, compact currency figures and ages.

/// Dollar price with precision that grows as the magnitude shrinks.
pub fn format_price(v: f64) -> String {
    let decimals = if v >= 1.0 {
        2
    } else if v >= 0.01 {
        4
    } else if v >= 0.0001 {
        6
    } else {
        10
    };
    format!("${:.*}", decimals, v)
}

/// `$1.23B` / `$4.56M` / `$7.89K` / `$999.00`; zero (or anything not a
/// positive finite number) renders as `$0`.
pub fn format_compact_currency(v: f64) -> String {
    if !v.is_finite() || v <= 0.0 {
        return "$0".to_string();
    }
    if v >= 1e9 {
        format!("${:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("${:.2}M", v / 1e6)
    } else if v >= 1e3 {
        format!("${:.2}K", v / 1e3)
    } else {
        format!("${:.2}", v)
    }
}

/// Largest whole unit of an elapsed duration: `3d`, `5h`, `12m`, `40s`.
pub fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d")
    } else if hours > 0 {
        format!("{hours}h")
    } else if mins > 0 {
        format!("{mins}m")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decimals(s: &str) -> usize {
        s.split('.').nth(1).map(|d| d.len()).unwrap_or(0)
    }

    #[test]
    fn test_price_precision_tiers() {
        assert_eq!(format_price(5.0), "$5.00");
        assert_eq!(format_price(0.5), "$0.5000");
        assert_eq!(format_price(0.005), "$0.005000");
        assert_eq!(format_price(0.000005), "$0.0000050000");

        assert_eq!(decimals(&format_price(5.0)), 2);
        assert_eq!(decimals(&format_price(0.5)), 4);
        assert_eq!(decimals(&format_price(0.000005)), 10);
    }

    #[test]
    fn test_price_tier_boundaries() {
        assert_eq!(format_price(1.0), "$1.00");
        assert_eq!(format_price(0.01), "$0.0100");
        assert_eq!(format_price(0.0001), "$0.000100");
    }

    #[test]
    fn test_compact_currency_boundaries() {
        assert_eq!(format_compact_currency(0.0), "$0");
        assert_eq!(format_compact_currency(999.0), "$999.00");
        assert_eq!(format_compact_currency(1_000.0), "$1.00K");
        assert_eq!(format_compact_currency(1_000_000.0), "$1.00M");
        assert_eq!(format_compact_currency(1_000_000_000.0), "$1.00B");
        assert_eq!(format_compact_currency(32_500_000_000.0), "$32.50B");
    }

    #[test]
    fn test_compact_currency_rejects_garbage() {
        assert_eq!(format_compact_currency(-5.0), "$0");
        assert_eq!(format_compact_currency(f64::NAN), "$0");
        assert_eq!(format_compact_currency(f64::INFINITY), "$0");
    }

    #[test]
    fn test_elapsed_picks_largest_unit() {
        assert_eq!(format_elapsed(0), "0s");
        assert_eq!(format_elapsed(59_999), "59s");
        assert_eq!(format_elapsed(60_000), "1m");
        assert_eq!(format_elapsed(3 * 3_600_000 + 59 * 60_000), "3h");
        assert_eq!(format_elapsed(49 * 3_600_000), "2d");
    }

    /// Re-expand a compact string into an approximate dollar amount.
    fn magnitude(s: &str) -> f64 {
        let body = s.trim_start_matches('$');
        let (num, mult) = match body.chars().last() {
            Some('B') => (&body[..body.len() - 1], 1e9),
            Some('M') => (&body[..body.len() - 1], 1e6),
            Some('K') => (&body[..body.len() - 1], 1e3),
            _ => (body, 1.0),
        };
        num.parse::<f64>().unwrap() * mult
    }

    proptest! {
        #[test]
        fn prop_compact_currency_monotonic(a in 0.0f64..5e12, b in 0.0f64..5e12) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (lo_mag, hi_mag) =
                (magnitude(&format_compact_currency(lo)), magnitude(&format_compact_currency(hi)));
            prop_assert!(lo_mag <= hi_mag);
        }

        #[test]
        fn prop_price_always_dollar_prefixed(v in 1e-12f64..1e7) {
            let s = format_price(v);
            prop_assert!(s.starts_with('$'));
            prop_assert!([2usize, 4, 6, 10].contains(&decimals(&s)));
        }
    }
}
