use crate::Chart;
use crate::render::HeadlessError;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("SVG has no usable viewBox")]
    MissingViewBox,
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color: {0}")]
    InvalidBackground(String),
    #[error("JPG output requires an opaque background color (e.g. white)")]
    JpegOpaqueBackgroundRequired,
    #[error("failed to encode JPG")]
    JpegEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// CSS-like color (`white`, `#fff`, `#rrggbbaa`); transparent when unset.
    pub background: Option<String>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
        }
    }
}

impl Chart {
    pub fn draw_png(&self, options: &RasterOptions) -> Result<Vec<u8>> {
        svg_to_png(&self.draw_svg()?, options)
    }

    pub fn draw_jpeg(&self, options: &RasterOptions) -> Result<Vec<u8>> {
        svg_to_jpeg(&self.draw_svg()?, options)
    }
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let background = options
        .background
        .as_deref()
        .map(|bg| parse_tiny_skia_color(bg).ok_or_else(|| RasterError::InvalidBackground(bg.to_string())))
        .transpose()?;
    let pixmap = svg_to_pixmap(svg, options.scale, background)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let bg = options.background.as_deref().unwrap_or("white");
    let color =
        parse_tiny_skia_color(bg).ok_or_else(|| RasterError::InvalidBackground(bg.to_string()))?;
    if color.alpha() != 1.0 {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }

    let pixmap = svg_to_pixmap(svg, options.scale, Some(color))?;
    // The background is opaque, so dropping alpha loses nothing.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality)
        .encode(&rgb, pixmap.width(), pixmap.height(), image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

/// Width and height of the root `viewBox="minX minY w h"`.
fn viewbox_size(svg: &str) -> Option<(f32, f32)> {
    let start = svg.find("viewBox=\"")? + "viewBox=\"".len();
    let rest = &svg[start..];
    let raw = &rest[..rest.find('"')?];
    let nums: Vec<f32> = raw
        .split_whitespace()
        .map(|n| n.parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match nums[..] {
        [_, _, w, h] if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => Some((w, h)),
        _ => None,
    }
}

fn svg_to_pixmap(
    svg: &str,
    scale: f32,
    background: Option<tiny_skia::Color>,
) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;
    // usvg already maps the viewBox origin to (0, 0).
    let (w, h) = viewbox_size(svg).ok_or(RasterError::MissingViewBox)?;
    let width = (w * scale).ceil().max(1.0) as u32;
    let height = (h * scale).ceil().max(1.0) as u32;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;
    if let Some(color) = background {
        pixmap.fill(color);
    }
    tracing::debug!(width, height, "rasterizing chart");
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    let rgba = match s.as_str() {
        "transparent" => [0, 0, 0, 0],
        "white" => [255, 255, 255, 255],
        "black" => [0, 0, 0, 255],
        _ => {
            let hex = s.strip_prefix('#')?;
            let digits = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<Vec<u8>>>()?;
            match digits[..] {
                [r, g, b] => [r * 17, g * 17, b * 17, 255],
                [r, g, b, a] => [r * 17, g * 17, b * 17, a * 17],
                [r1, r0, g1, g0, b1, b0] => [r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, 255],
                [r1, r0, g1, g0, b1, b0, a1, a0] => {
                    [r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, a1 << 4 | a0]
                }
                _ => return None,
            }
        }
    };
    Some(tiny_skia::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-5 -5 10 10"><rect x="-5" y="-5" width="10" height="10" fill="black"/></svg>"#;

    #[test]
    fn png_has_signature_and_scaled_size() {
        let bytes = svg_to_png(
            SQUARE,
            &RasterOptions {
                scale: 2.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        // IHDR width/height
        assert_eq!(&bytes[16..24], &[0, 0, 0, 20, 0, 0, 0, 20]);
    }

    #[test]
    fn jpeg_needs_an_opaque_background() {
        let bytes = svg_to_jpeg(SQUARE, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(&[0xff, 0xd8]));
        let err = svg_to_jpeg(
            SQUARE,
            &RasterOptions {
                background: Some("transparent".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, RasterError::JpegOpaqueBackgroundRequired));
    }

    #[test]
    fn colors_parse_from_names_and_hex() {
        assert_eq!(
            parse_tiny_skia_color("#fff"),
            Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255))
        );
        assert_eq!(
            parse_tiny_skia_color("#11223380"),
            Some(tiny_skia::Color::from_rgba8(0x11, 0x22, 0x33, 0x80))
        );
        assert!(parse_tiny_skia_color("#12").is_none());
        assert!(parse_tiny_skia_color("teal").is_none());
    }
}
