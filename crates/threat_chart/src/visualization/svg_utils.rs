/// HTMLエンコード（SVGテキスト用）
pub fn html_encode(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Tick label without a trailing `.0` for whole numbers
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", (v * 1e6).round() / 1e6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_encode() {
        assert_eq!(
            html_encode(r#"Côte d'Ivoire <"A&B">"#),
            "Côte d&#x27;Ivoire &lt;&quot;A&amp;B&quot;&gt;"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(0.2), "0.2");
        assert_eq!(format_number(0.30000000000000004), "0.3");
    }
}
