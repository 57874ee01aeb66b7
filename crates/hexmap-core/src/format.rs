//! Column-driven value formatting.
//!
//! A formatter is created from a column's declared format string and value type and then used for
//! every cell of that column. Formatting never fails: unsupported or malformed format strings fall
//! back to general formatting, and null cells render as an empty string.

use crate::dataview::{DataViewColumn, PrimitiveValue, ValueTypeDescriptor};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

const DEFAULT_DATE_FORMAT: &str = "M/d/yyyy";

#[derive(Debug, Clone, PartialEq)]
pub struct ValueFormatter {
    kind: FormatterKind,
}

#[derive(Debug, Clone, PartialEq)]
enum FormatterKind {
    General,
    Number(NumberFormat),
    Date { strftime: String },
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self {
            kind: FormatterKind::General,
        }
    }
}

impl ValueFormatter {
    pub fn create(format: Option<&str>, value_type: Option<ValueTypeDescriptor>) -> Self {
        let format = format.map(str::trim).filter(|f| !f.is_empty());
        let is_date = value_type.is_some_and(|t| t.date_time);

        if is_date {
            let pattern = format.unwrap_or(DEFAULT_DATE_FORMAT);
            return Self {
                kind: FormatterKind::Date {
                    strftime: dotnet_date_to_strftime(pattern),
                },
            };
        }

        let Some(format) = format else {
            return Self::default();
        };
        match NumberFormat::parse(format) {
            Ok(NumberFormat::General) => Self::default(),
            Ok(number) => Self {
                kind: FormatterKind::Number(number),
            },
            Err(err) => {
                tracing::debug!(%err, "falling back to general formatting");
                Self::default()
            }
        }
    }

    /// Formatter for a column, using its own declared format string and value type.
    pub fn for_column(column: &DataViewColumn) -> Self {
        Self::create(column.format.as_deref(), column.value_type)
    }

    pub fn format(&self, value: &PrimitiveValue) -> String {
        match value {
            PrimitiveValue::Null => String::new(),
            PrimitiveValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            PrimitiveValue::Number(v) => match &self.kind {
                FormatterKind::Date { strftime } => DateTime::<Utc>::from_timestamp_millis(*v as i64)
                    .map(|dt| dt.format(strftime).to_string())
                    .unwrap_or_else(|| general_number(*v)),
                _ => self.format_number(*v),
            },
            PrimitiveValue::Text(s) => match &self.kind {
                FormatterKind::Date { strftime } => {
                    parse_date_text(s).map_or_else(|| s.clone(), |dt| dt.format(strftime).to_string())
                }
                _ => s.clone(),
            },
        }
    }

    pub fn format_number(&self, v: f64) -> String {
        match &self.kind {
            FormatterKind::Number(number) => number.apply(v),
            _ => general_number(v),
        }
    }
}

/// Shortest round-trip decimal, the way a JS host prints numbers.
fn general_number(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let mut b = ryu_js::Buffer::new();
    b.format_finite(v).to_string()
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn dotnet_date_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"'[^']*'|yyyy|yy|MMMM|MMM|MM|M|dddd|ddd|dd|d|HH|H|hh|h|mm|m|ss|s|tt|%")
            .expect("valid date token regex")
    })
}

fn dotnet_date_to_strftime(pattern: &str) -> String {
    dotnet_date_token_re()
        .replace_all(pattern, |caps: &regex::Captures<'_>| {
            let token = &caps[0];
            if let Some(literal) = token.strip_prefix('\'') {
                return literal.trim_end_matches('\'').replace('%', "%%");
            }
            match token {
                "yyyy" => "%Y",
                "yy" => "%y",
                "MMMM" => "%B",
                "MMM" => "%b",
                "MM" => "%m",
                "M" => "%-m",
                "dddd" => "%A",
                "ddd" => "%a",
                "dd" => "%d",
                "d" => "%-d",
                "HH" => "%H",
                "H" => "%-H",
                "hh" => "%I",
                "h" => "%-I",
                "mm" => "%M",
                "m" => "%-M",
                "ss" => "%S",
                "s" => "%-S",
                "tt" => "%p",
                _ => "%%",
            }
            .to_string()
        })
        .into_owned()
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberFormat {
    General,
    Standard { kind: StandardKind, precision: Option<usize> },
    Custom(Vec<NumberSection>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardKind {
    Number,
    Fixed,
    Percent,
    Currency,
    Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSection {
    prefix: String,
    suffix: String,
    int_min_digits: usize,
    frac_min_digits: usize,
    frac_max_digits: usize,
    grouping: bool,
    multiplier: f64,
    has_digits: bool,
}

impl NumberFormat {
    pub fn parse(format: &str) -> Result<Self> {
        let trimmed = format.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("general") || trimmed == "G" {
            return Ok(Self::General);
        }
        if let Some(standard) = parse_standard(trimmed) {
            return Ok(standard);
        }

        let sections = split_sections(format)?;
        let parsed = sections
            .iter()
            .map(|s| parse_section(format, s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Custom(parsed))
    }

    pub fn apply(&self, v: f64) -> String {
        if !v.is_finite() {
            return String::new();
        }
        match self {
            Self::General => general_number(v),
            Self::Standard { kind, precision } => apply_standard(*kind, *precision, v),
            Self::Custom(sections) => apply_custom(sections, v),
        }
    }
}

fn parse_standard(format: &str) -> Option<NumberFormat> {
    let mut chars = format.chars();
    let kind = match chars.next()?.to_ascii_uppercase() {
        'N' => StandardKind::Number,
        'F' => StandardKind::Fixed,
        'P' => StandardKind::Percent,
        'C' => StandardKind::Currency,
        'D' => StandardKind::Decimal,
        _ => return None,
    };
    let rest = chars.as_str();
    if rest.len() > 2 || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let precision = if rest.is_empty() {
        None
    } else {
        rest.parse::<usize>().ok()
    };
    Some(NumberFormat::Standard { kind, precision })
}

fn apply_standard(kind: StandardKind, precision: Option<usize>, v: f64) -> String {
    let (scaled, digits, grouping, prefix, suffix) = match kind {
        StandardKind::Number => (v, precision.unwrap_or(2), true, "", ""),
        StandardKind::Fixed => (v, precision.unwrap_or(2), false, "", ""),
        StandardKind::Percent => (v * 100.0, precision.unwrap_or(2), true, "", "%"),
        StandardKind::Currency => (v, precision.unwrap_or(2), true, "$", ""),
        StandardKind::Decimal => {
            let rounded = v.round();
            let body = format_digits(rounded.abs(), precision.unwrap_or(1), 0, 0, false);
            return with_sign(rounded < 0.0, &body);
        }
    };
    let body = format_digits(scaled.abs(), 1, digits, digits, grouping);
    let negative = scaled < 0.0 && !is_all_zero(&body);
    with_sign(negative, &format!("{prefix}{body}{suffix}"))
}

fn with_sign(negative: bool, body: &str) -> String {
    if negative {
        format!("-{body}")
    } else {
        body.to_string()
    }
}

fn is_all_zero(body: &str) -> bool {
    !body.chars().any(|c| c.is_ascii_digit() && c != '0')
}

fn split_sections(format: &str) -> Result<Vec<String>> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' | '\'' => {
                current.push(ch);
                let mut closed = false;
                for inner in chars.by_ref() {
                    current.push(inner);
                    if inner == ch {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(Error::InvalidFormat {
                        format: format.to_string(),
                        message: "unterminated quoted literal".to_string(),
                    });
                }
            }
            '\\' => {
                current.push(ch);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ';' if sections.len() < 2 => sections.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    sections.push(current);
    Ok(sections)
}

fn parse_section(format: &str, section: &str) -> Result<NumberSection> {
    let mut out = NumberSection {
        multiplier: 1.0,
        ..Default::default()
    };
    let mut seen_dot = false;
    let mut pending_commas = 0usize;
    let mut chars = section.chars().peekable();

    let push_literal = |out: &mut NumberSection, text: &str| {
        if out.has_digits {
            out.suffix.push_str(text);
        } else {
            out.prefix.push_str(text);
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            '0' | '#' => {
                if pending_commas > 0 && !seen_dot {
                    out.grouping = true;
                    pending_commas = 0;
                }
                out.has_digits = true;
                match (seen_dot, ch) {
                    (false, '0') => out.int_min_digits += 1,
                    (true, '0') => {
                        out.frac_min_digits += 1;
                        out.frac_max_digits += 1;
                    }
                    (true, _) => out.frac_max_digits += 1,
                    _ => {}
                }
            }
            ',' if out.has_digits && !seen_dot => pending_commas += 1,
            '.' if !seen_dot => {
                out.multiplier /= 1000f64.powi(pending_commas as i32);
                pending_commas = 0;
                seen_dot = true;
                out.has_digits = true;
            }
            '%' => {
                out.multiplier *= 100.0;
                push_literal(&mut out, "%");
            }
            '"' | '\'' => {
                let mut literal = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ch {
                        closed = true;
                        break;
                    }
                    literal.push(inner);
                }
                if !closed {
                    return Err(Error::InvalidFormat {
                        format: format.to_string(),
                        message: "unterminated quoted literal".to_string(),
                    });
                }
                push_literal(&mut out, &literal);
            }
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut out, &escaped.to_string());
                }
            }
            other => {
                if pending_commas > 0 {
                    out.multiplier /= 1000f64.powi(pending_commas as i32);
                    pending_commas = 0;
                }
                push_literal(&mut out, &other.to_string());
            }
        }
    }
    if pending_commas > 0 {
        out.multiplier /= 1000f64.powi(pending_commas as i32);
    }
    Ok(out)
}

fn apply_custom(sections: &[NumberSection], v: f64) -> String {
    let (section, value, explicit_negative) = match sections {
        [only] => (only, v, false),
        [pos, neg] | [pos, neg, _] if v < 0.0 => (if neg.is_empty() { pos } else { neg }, v, true),
        [_, _, zero] if v == 0.0 => (zero, v, false),
        [pos, ..] => (pos, v, false),
        [] => return general_number(v),
    };

    let scaled = value * section.multiplier;
    if !section.has_digits {
        return format!("{}{}", section.prefix, section.suffix);
    }
    let body = format_digits(
        scaled.abs(),
        section.int_min_digits,
        section.frac_min_digits,
        section.frac_max_digits,
        section.grouping,
    );
    let negative = scaled < 0.0 && !explicit_negative && !is_all_zero(&body);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{}{body}{}", section.prefix, section.suffix)
}

impl NumberSection {
    fn is_empty(&self) -> bool {
        !self.has_digits && self.prefix.is_empty() && self.suffix.is_empty()
    }
}

const MAX_FRACTION_DIGITS: usize = 15;

/// Fixed-point rendering of a non-negative value.
fn format_digits(
    abs: f64,
    int_min: usize,
    frac_min: usize,
    frac_max: usize,
    grouping: bool,
) -> String {
    // f64 carries no more than 15 significant fraction digits.
    let frac_max = frac_max.min(MAX_FRACTION_DIGITS);
    let frac_min = frac_min.min(frac_max);
    // Round half away from zero; `format!` alone rounds ties to even.
    let factor = 10f64.powi(frac_max as i32);
    let scaled = abs * factor;
    let rounded = if scaled.is_finite() {
        scaled.round() / factor
    } else {
        abs
    };
    let fixed = format!("{rounded:.frac_max$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (fixed, String::new()),
    };

    let mut frac = frac_part;
    while frac.len() > frac_min && frac.ends_with('0') {
        frac.pop();
    }

    let mut int_digits = int_part.trim_start_matches('0').to_string();
    while int_digits.len() < int_min {
        int_digits.insert(0, '0');
    }
    if grouping {
        int_digits = group_thousands(&int_digits);
    }

    if frac.is_empty() {
        int_digits
    } else {
        format!("{int_digits}.{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
