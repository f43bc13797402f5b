use chrono::NaiveDate;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

pub fn percent(val: f64) -> String {
    format!("{val:.1}%")
}

/// Per-book ROI cell. `None` is the costless-book-with-revenue case, where
/// the ratio is unbounded rather than an error.
pub fn roi(val: Option<f64>) -> String {
    match val {
        Some(v) => percent(v),
        None => "High".to_string(),
    }
}

/// "2024-03" as "March 2024". Unparseable keys print as-is.
pub fn month_label(month_key: &str) -> String {
    let iso = format!("{month_key}-01");
    match NaiveDate::parse_from_str(&iso, "%Y-%m-%d") {
        Ok(date) => date.format("%B %Y").to_string(),
        Err(_) => month_key.to_string(),
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
