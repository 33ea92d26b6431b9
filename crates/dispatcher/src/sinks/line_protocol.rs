//! InfluxDB line protocol encoding
//!
//! `measurement,tag=v,tag=v field=value`

use contracts::{DataPoint, FieldValue};

/// Encode one point as a single-field record.
///
/// Returns `None` when the point has no storable value (absent, composite,
/// or a non-finite float) or when an identifier contains a line break.
pub fn encode_point(measurement: &str, point: &DataPoint) -> Option<String> {
    let value = encode_field_value(point.value.as_ref()?)?;

    // Line breaks terminate records and cannot be escaped in identifiers
    let breaks_line = |s: &str| s.contains(['\n', '\r']);
    if breaks_line(measurement)
        || breaks_line(&point.field)
        || point
            .tags
            .iter()
            .any(|(key, value)| breaks_line(key) || breaks_line(value))
    {
        return None;
    }

    let mut line = escape_measurement(measurement);
    for (key, tag_value) in &point.tags {
        if key.is_empty() || tag_value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(tag_value));
    }
    line.push(' ');
    line.push_str(&escape_key(&point.field));
    line.push('=');
    line.push_str(&value);
    Some(line)
}

fn encode_field_value(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Int(i) => Some(format!("{i}i")),
        FieldValue::UInt(u) => Some(format!("{u}u")),
        FieldValue::Float(f) if f.is_finite() => Some(f.to_string()),
        FieldValue::Float(_) => None,
        FieldValue::Bool(b) => Some(b.to_string()),
        FieldValue::Str(s) => Some(format!("\"{}\"", escape_string(s))),
        FieldValue::List(_) => None,
    }
}

fn escape_measurement(s: &str) -> String {
    escape_chars(s, &[',', ' '])
}

/// Tag keys, tag values, and field keys
fn escape_key(s: &str) -> String {
    escape_chars(s, &[',', '=', ' '])
}

fn escape_string(s: &str) -> String {
    escape_chars(s, &['"', '\\'])
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn escape_chars(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Tags;
    use serde_json::json;

    fn point(tags: &[&str], field: &str, value: Option<FieldValue>) -> DataPoint {
        let tags: Tags = tags
            .iter()
            .map(|t| (t.to_string(), "1".to_string()))
            .collect();
        DataPoint::new(tags, field, value)
    }

    #[test]
    fn test_encode_integer_with_tags() {
        let p = point(&["pos"], "x", Some(FieldValue::Int(1)));
        assert_eq!(
            encode_point("move_in", &p).unwrap(),
            "move_in,pos=1 x=1i"
        );
    }

    #[test]
    fn test_encode_scalar_kinds() {
        let cases = [
            (FieldValue::UInt(7), "v=7u"),
            (FieldValue::Float(1.5), "v=1.5"),
            (FieldValue::Bool(true), "v=true"),
            (FieldValue::Str("say \"hi\"".into()), r#"v="say \"hi\"""#),
        ];
        for (value, expected) in cases {
            let line = encode_point("m", &point(&[], "v", Some(value))).unwrap();
            assert_eq!(line, format!("m {expected}"));
        }
    }

    #[test]
    fn test_escaping() {
        let p = point(&["a b", "c,d"], "e=f", Some(FieldValue::Int(0)));
        assert_eq!(
            encode_point("my measure,x", &p).unwrap(),
            r"my\ measure\,x,a\ b=1,c\,d=1 e\=f=0i"
        );
    }

    #[test]
    fn test_line_breaks() {
        // String values keep one record per line
        let p = point(&[], "v", Some(FieldValue::Str("a\nb\r".into())));
        let line = encode_point("m", &p).unwrap();
        assert_eq!(line, r#"m v="a\nb\r""#);
        assert!(!line.contains('\n'));

        // Identifiers with line breaks are not storable
        assert!(encode_point("m", &point(&["po\ns"], "x", Some(FieldValue::Int(1)))).is_none());
        assert!(encode_point("m", &point(&[], "x\ny", Some(FieldValue::Int(1)))).is_none());
        assert!(encode_point("m\r", &point(&[], "x", Some(FieldValue::Int(1)))).is_none());

        let mut tags = Tags::new();
        tags.insert("pos".to_string(), "1\n2".to_string());
        let p = DataPoint::new(tags, "x", Some(FieldValue::Int(1)));
        assert!(encode_point("m", &p).is_none());
    }

    #[test]
    fn test_unstorable_values() {
        assert!(encode_point("m", &point(&[], "v", None)).is_none());
        let list = FieldValue::from_json(&json!([1, 2]));
        assert!(encode_point("m", &point(&[], "v", list)).is_none());
        assert!(encode_point("m", &point(&[], "v", Some(FieldValue::Float(f64::NAN)))).is_none());
    }
}
