//! Amount formatting for the invoice: round to a whole number and group the
//! digits with `.` the way Indonesian locales print rupiah.

use crate::models::Cell;

const GROUP_SEPARATOR: char = '.';

/// Formats an optional cell as an amount. Absent or empty cells become `""`,
/// text that does not read as a number passes through untouched.
pub fn format_amount(cell: Option<&Cell>) -> String {
    match cell {
        None => String::new(),
        Some(Cell::Number(n)) => group_digits(round_half_up(*n)),
        Some(Cell::Text(s)) if s.is_empty() => String::new(),
        Some(Cell::Text(s)) => match parse_numeric(s) {
            Some(n) => group_digits(round_half_up(n)),
            None => s.clone(),
        },
    }
}

/// Rounds .5 toward positive infinity. Values in `[-0.5, 0)` keep their sign
/// and come out as negative zero.
fn round_half_up(n: f64) -> f64 {
    let floor = n.floor();
    let rounded = if n - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded == 0.0 && n < 0.0 { -0.0 } else { rounded }
}

fn group_digits(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }
    let digits = format!("{:.0}", n.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n.is_sign_negative() {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Lenient numeric-literal parsing for text cells. Surrounding whitespace is
/// ignored and a blank string reads as zero.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return Some(0.0);
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(body) = s.strip_prefix(prefix) {
            if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return Some(body.chars().fold(0.0, |acc, c| {
                acc * radix as f64 + c.to_digit(radix).unwrap_or(0) as f64
            }));
        }
    }
    // f64::from_str also accepts "inf" and "nan", which are not numbers here.
    if !s.chars().any(|c| c.is_ascii_digit())
        || !s.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell { Cell::from(s) }

    #[test]
    fn rounds_and_groups_numbers() {
        assert_eq!(format_amount(Some(&Cell::Number(12345.6))), "12.346");
        assert_eq!(format_amount(Some(&Cell::Number(1_500_000.0))), "1.500.000");
        assert_eq!(format_amount(Some(&Cell::Number(999.0))), "999");
        assert_eq!(format_amount(Some(&Cell::Number(1000.0))), "1.000");
        assert_eq!(format_amount(Some(&Cell::Number(0.0))), "0");
        assert_eq!(format_amount(Some(&Cell::Number(2.5))), "3");
        assert_eq!(format_amount(Some(&Cell::Number(-2.5))), "-2");
        assert_eq!(format_amount(Some(&Cell::Number(-1234.7))), "-1.235");
        assert_eq!(format_amount(Some(&Cell::Number(-0.4))), "-0");
        assert_eq!(format_amount(Some(&Cell::Number(0.49999999999999994))), "0");
        assert_eq!(format_amount(Some(&Cell::Number(4_503_599_627_370_497.0))), "4.503.599.627.370.497");
        assert_eq!(format_amount(Some(&Cell::Number(f64::INFINITY))), "∞");
    }

    #[test]
    fn numeric_text_is_formatted() {
        assert_eq!(format_amount(Some(&text("12345.6"))), "12.346");
        assert_eq!(format_amount(Some(&text(" 250000 "))), "250.000");
        assert_eq!(format_amount(Some(&text("1e3"))), "1.000");
        assert_eq!(format_amount(Some(&text("0x10"))), "16");
        assert_eq!(format_amount(Some(&text("   "))), "0");
        assert_eq!(format_amount(Some(&text("Infinity"))), "∞");
    }

    #[test]
    fn other_text_passes_through() {
        assert_eq!(format_amount(Some(&text("ISI DISINI"))), "ISI DISINI");
        assert_eq!(format_amount(Some(&text("1,234"))), "1,234");
        assert_eq!(format_amount(Some(&text("inf"))), "inf");
        assert_eq!(format_amount(Some(&text("NaN"))), "NaN");
        assert_eq!(format_amount(Some(&text("1e"))), "1e");
    }

    #[test]
    fn absent_or_empty_is_blank() {
        assert_eq!(format_amount(None), "");
        assert_eq!(format_amount(Some(&text(""))), "");
    }
}
