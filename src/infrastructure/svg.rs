// SVG output for rendered drawings
use crate::domain::charts::{Drawing, Paint, Shape, Style, TextAnchor};
use crate::domain::geometry::{Point, fmt_num};
use crate::domain::theme::Theme;
use std::fmt::Write;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn paint(paint: &Paint, theme: &Theme) -> String {
    match paint {
        Paint::None => "none".to_string(),
        Paint::Token(token) => theme.color(*token).to_string(),
        Paint::Fixed(color) => escape(color),
    }
}

fn style_attrs(style: &Style, theme: &Theme) -> String {
    let mut attrs = format!(" fill=\"{}\"", paint(&style.fill, theme));
    if style.fill_opacity < 1.0 {
        let _ = write!(attrs, " fill-opacity=\"{}\"", fmt_num(style.fill_opacity));
    }
    if style.stroke != Paint::None {
        let _ = write!(
            attrs,
            " stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"",
            paint(&style.stroke, theme),
            fmt_num(style.stroke_width)
        );
    }
    if style.opacity < 1.0 {
        let _ = write!(attrs, " opacity=\"{}\"", fmt_num(style.opacity));
    }
    attrs
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shape_element(shape: &Shape, theme: &Theme) -> String {
    match shape {
        Shape::Path { path, style } => format!(
            "<path d=\"{}\"{}/>",
            path.to_svg_data(),
            style_attrs(style, theme)
        ),
        Shape::Rect { rect, rx, style } => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\"{}/>",
            fmt_num(rect.x),
            fmt_num(rect.y),
            fmt_num(rect.width),
            fmt_num(rect.height),
            fmt_num(*rx),
            style_attrs(style, theme)
        ),
        Shape::Circle { center, r, style } => format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{}/>",
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(*r),
            style_attrs(style, theme)
        ),
        Shape::Polygon { points, style } => format!(
            "<polygon points=\"{}\"{}/>",
            points_attr(points),
            style_attrs(style, theme)
        ),
        Shape::Line { from, to, style } => format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}/>",
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(to.x),
            fmt_num(to.y),
            style_attrs(style, theme)
        ),
        Shape::Text {
            at,
            content,
            size,
            anchor,
            style,
        } => {
            let anchor = match anchor {
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{}\" dominant-baseline=\"middle\"{}>{}</text>",
                fmt_num(at.x),
                fmt_num(at.y),
                fmt_num(*size),
                anchor,
                style_attrs(style, theme),
                escape(content)
            )
        }
    }
}

/// Serialises a drawing as a standalone `<svg>` element, colours resolved
/// against `theme`.
pub fn render_svg(drawing: &Drawing, theme: &Theme) -> String {
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100%\" viewBox=\"0 0 {} {}\" preserveAspectRatio=\"xMidYMid meet\">",
        fmt_num(drawing.width),
        fmt_num(drawing.height)
    );
    for shape in &drawing.shapes {
        out.push_str(&shape_element(shape, theme));
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charts::{ChartSpec, PieSpec};
    use crate::domain::theme::{ThemeName, ThemeToken};

    #[test]
    fn test_placeholder_svg() {
        let svg = render_svg(&Drawing::placeholder(320.0, 140.0), Theme::get(ThemeName::Dark));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox=\"0 0 320 140\""));
        assert!(svg.contains(">No data</text>"));
    }

    #[test]
    fn test_theme_tokens_resolve() {
        let drawing = Drawing {
            width: 10.0,
            height: 10.0,
            shapes: vec![Shape::Circle {
                center: Point::new(5.0, 5.0),
                r: 2.5,
                style: Style::fill(Paint::Token(ThemeToken::AccentBlue)).with_fill_opacity(0.5),
            }],
        };
        let theme = Theme::get(ThemeName::Light);
        let svg = render_svg(&drawing, theme);
        assert!(svg.contains(&format!(
            "<circle cx=\"5\" cy=\"5\" r=\"2.5\" fill=\"{}\" fill-opacity=\"0.5\"/>",
            theme.color(ThemeToken::AccentBlue)
        )));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(escape("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
        let pie = ChartSpec::Pie(PieSpec {
            values: vec![1.0, 1.0],
            colors: vec!["\"><script>".to_string()],
            ..PieSpec::default()
        });
        let svg = render_svg(&pie.render(), Theme::get(ThemeName::Dark));
        assert!(!svg.contains("<script>"));
    }
}
