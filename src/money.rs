// money.rs
// Currency display: whole-unit amounts with thousands separators.

/// Placeholder shown for missing or zero amounts.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Decimals used when amounts are stored or scheduled (not displayed).
    pub decimals: u32,
}

const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$", decimals: 2 },
    Currency { code: "DOP", symbol: "RD$", decimals: 2 },
    Currency { code: "MXN", symbol: "MX$", decimals: 2 },
    Currency { code: "EUR", symbol: "€", decimals: 2 },
    Currency { code: "COP", symbol: "COL$", decimals: 2 },
    Currency { code: "CLP", symbol: "CLP$", decimals: 0 },
    Currency { code: "PEN", symbol: "S/", decimals: 2 },
];

/// Looks up a currency by ISO code (case-insensitive).
pub fn currency(code: &str) -> Option<Currency> {
    let code = code.trim();
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .copied()
}

/// Display decimals for scheduling; unknown codes fall back to cents.
pub fn decimals_for(code: &str) -> u32 {
    currency(code).map(|c| c.decimals).unwrap_or(2)
}

/// Formats `value` in `currency_code` with zero fractional digits.
///
/// `None`, zero and non-finite values render as [`PLACEHOLDER`].
/// Unknown currency codes are rendered as `"<CODE> 1,234"`.
pub fn format_money(value: Option<f64>, currency_code: &str) -> String {
    let value = match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => return PLACEHOLDER.to_string(),
    };

    let rounded = value.round();
    if rounded == 0.0 {
        // -0.4 rounds to a signed zero; show it unsigned.
        return prefixed(currency_code, "0");
    }

    let digits = group_thousands(rounded.abs() as u64);
    let body = prefixed(currency_code, &digits);
    if rounded < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

/// Formats a percentage with one decimal, e.g. `"99.5%"`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.1}%", value)
}

fn prefixed(currency_code: &str, digits: &str) -> String {
    match currency(currency_code) {
        Some(c) => format!("{}{}", c.symbol, digits),
        None => {
            let code = currency_code.trim().to_uppercase();
            if code.is_empty() {
                digits.to_string()
            } else {
                format!("{code} {digits}")
            }
        }
    }
}

fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rounds to `decimals` places (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
