//! Display helpers shared by feeds and the receipt generator.

use serde_json::Value;

/// Formats an amount in cents as euros under French conventions:
/// `12980` → `"129,80 €"`, `123456789` → `"1 234 567,89 €"`.
///
/// Thousands are grouped with U+202F and the currency sign is preceded by
/// U+00A0, as browsers do for `fr-FR`.
pub fn format_eur_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let digits = (abs / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202F}');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped},{:02}\u{a0}€", abs % 100)
}

/// Reads an amount in cents from a JSON value. Accepts integers, floats
/// (rounded) and numeric strings.
pub fn cents_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

/// First non-empty string among `keys` in a JSON object.
pub fn field<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| payload.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Masks a card number down to its last four digits.
pub fn mask_card(last4: &str) -> String {
    format!("**** **** **** {last4}")
}
