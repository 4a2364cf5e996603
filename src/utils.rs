use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::QrCode;

/// QR code of a payload as an SVG document.
pub fn render_svg(payload: &str) -> Result<String, QrError> {
    let code = QrCode::new(payload)?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// QR code of a payload for display in a terminal.
pub fn render_text(payload: &str) -> Result<String, QrError> {
    let code = QrCode::new(payload)?;

    Ok(code
        .render::<char>()
        .quiet_zone(false)
        .module_dimensions(2, 1)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = "00020126350014br.gov.bcb.pix0113teste@pix.com5204000053039865802BR5911Maria Doula6009Sao Paulo62070503***63049A2E";

    #[test]
    fn svg_is_deterministic() {
        let svg = render_svg(PAYLOAD).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
        assert_eq!(render_svg(PAYLOAD).unwrap(), svg);
    }

    #[test]
    fn text_has_one_row_per_module() {
        let text = render_text(PAYLOAD).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert!(!rows.is_empty());
        // two characters per module horizontally
        assert!(rows.iter().all(|row| row.chars().count() == rows.len() * 2));
    }
}
