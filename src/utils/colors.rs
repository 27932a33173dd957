//! 资料页配色

/// 资料页默认背景色
pub const DEFAULT_BACKGROUND: &str = "#15202B";
/// 资料页默认文字色
pub const DEFAULT_TEXT: &str = "#FFFFFF";
/// 按钮默认底色
pub const DEFAULT_BUTTON: &str = "#8899ac";
/// 按钮默认文字色
pub const DEFAULT_BUTTON_TEXT: &str = "#FFFFFF";

/// 校验 `#RGB` 或 `#RRGGBB` 格式
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// 取已保存的颜色，未设置时回退到默认值
pub fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#15202B"));
        assert!(is_hex_color("#fff"));
        assert!(!is_hex_color("15202B"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color("red"));
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(None, DEFAULT_BUTTON), "#8899ac");
        assert_eq!(or_default(Some(""), DEFAULT_TEXT), "#FFFFFF");
        assert_eq!(or_default(Some("#000"), DEFAULT_TEXT), "#000");
    }
}
