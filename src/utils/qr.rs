//! 扫码地址的 SVG 二维码

use qrcode::QrCode;
use qrcode::render::svg;

use crate::errors::{Result, TappioError};

/// 渲染二维码 SVG
pub fn render_svg(data: &str) -> Result<String> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| TappioError::export(format!("无法生成二维码: {}", e)))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_svg() {
        let svg = render_svg("https://tap.example.com/c/AB12CD").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
    }
}
