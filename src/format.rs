// Formatting helpers for money, labels and colours

/// Format an A$ amount with adaptive units (B / M / K)
pub fn money_fmt(v: f64) -> String {
    if v >= 1_000_000_000.0 {
        format!("A${:.2}B", v / 1_000_000_000.0)
    } else if v >= 1_000_000.0 {
        format!("A${:.2}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("A${:.2}K", v / 1_000.0)
    } else {
        format!("A${}", with_thousands(v))
    }
}

/// Two decimals with comma thousand separators, e.g. `1,234,567.89`
pub fn with_thousands(v: f64) -> String {
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap_label(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in s.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Parse `#rrggbb` (or `rrggbb`) into an RGB triple
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_fmt_units() {
        assert_eq!(money_fmt(1_668_147_026.75), "A$1.67B");
        assert_eq!(money_fmt(409_657_215.48), "A$409.66M");
        assert_eq!(money_fmt(26_617.0), "A$26.62K");
        assert_eq!(money_fmt(999.5), "A$999.50");
        assert_eq!(money_fmt(0.0), "A$0.00");
    }

    #[test]
    fn test_with_thousands() {
        assert_eq!(with_thousands(1_234_567.891), "1,234,567.89");
        assert_eq!(with_thousands(100.0), "100.00");
        assert_eq!(with_thousands(-1500.0), "-1,500.00");
    }

    #[test]
    fn test_wrap_label() {
        let lines = wrap_label("Judgement Based Clause 28.11 Approach | Without FWO", 32);
        assert_eq!(lines, vec!["Judgement Based Clause 28.11", "Approach | Without FWO"]);
        assert!(wrap_label("", 10).is_empty());
        assert_eq!(wrap_label("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#10b981"), Some((0x10, 0xb9, 0x81)));
        assert_eq!(parse_hex_color("3b82f6"), Some((0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }
}
