//! Small formatting and calculation helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Total cost of a maintenance episode, missing amounts counted as zero
pub fn maintenance_total(labor: Option<Decimal>, parts: Option<Decimal>) -> Decimal {
    labor.unwrap_or_default() + parts.unwrap_or_default()
}

/// Format an amount in Brazilian reais, e.g. `R$ 1.234,56`
pub fn format_brl(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return "R$ 0,00".to_string();
    };

    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("R$ {}{},{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Some(dec("1234.56"))), "R$ 1.234,56");
        assert_eq!(format_brl(Some(dec("0"))), "R$ 0,00");
        assert_eq!(format_brl(Some(dec("999.999"))), "R$ 1.000,00");
        assert_eq!(format_brl(Some(dec("1234567.8"))), "R$ 1.234.567,80");
        assert_eq!(format_brl(Some(dec("12"))), "R$ 12,00");
        assert_eq!(format_brl(None), "R$ 0,00");
    }

    #[test]
    fn test_format_brl_negative() {
        assert_eq!(format_brl(Some(dec("-1500.5"))), "R$ -1.500,50");
        assert_eq!(format_brl(Some(dec("-0.001"))), "R$ 0,00");
    }

    #[test]
    fn test_maintenance_total() {
        assert_eq!(maintenance_total(Some(dec("150.00")), Some(dec("89.90"))), dec("239.90"));
        assert_eq!(maintenance_total(None, Some(dec("10"))), dec("10"));
        assert_eq!(maintenance_total(None, None), Decimal::ZERO);
    }
}
