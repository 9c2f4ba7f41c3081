// HTML page writer for the dashboard
use crate::application::dashboard_service::{PageModel, Panel};
use crate::domain::charts::Drawing;
use crate::domain::section::{SectionContent, SectionStatus, Timeframe};
use crate::domain::theme::Theme;
use crate::infrastructure::svg::{escape, render_svg};
use std::fmt::Write;

fn timeframe_label(timeframe: Timeframe) -> &'static str {
    match timeframe {
        Timeframe::Daily => "Daily",
        Timeframe::Weekly => "Weekly",
        Timeframe::Monthly => "Monthly",
    }
}

fn chart_block(out: &mut String, caption: &str, drawing: Option<&Drawing>, theme: &Theme) {
    let _ = write!(out, "<figure class=\"chart\"><figcaption>{}</figcaption>", escape(caption));
    if let Some(drawing) = drawing {
        out.push_str(&render_svg(drawing, theme));
    }
    out.push_str("</figure>");
}

fn section_body(out: &mut String, panel: &Panel, theme: &Theme) {
    let content = match &panel.view.status {
        SectionStatus::Loading => {
            out.push_str("<p class=\"muted\">Loading…</p>");
            return;
        }
        SectionStatus::Failed { message } => {
            let _ = write!(
                out,
                "<div class=\"error\"><p>{}</p><form method=\"post\" action=\"/sections/{}/retry?then=page\"><button>Retry</button></form></div>",
                escape(message),
                panel.view.id
            );
            return;
        }
        SectionStatus::Ready(content) => content,
    };

    match content {
        SectionContent::Traffic { timeframe, .. } => {
            out.push_str("<nav class=\"timeframes\">");
            for option in Timeframe::ALL {
                let _ = write!(
                    out,
                    "<form method=\"post\" action=\"/timeframe/{}\"><button{}>{}</button></form>",
                    option.key(),
                    if option == *timeframe { " class=\"active\"" } else { "" },
                    timeframe_label(option)
                );
            }
            out.push_str("</nav><div class=\"pair\">");
            let label = timeframe_label(*timeframe);
            chart_block(out, &format!("Total Reports ({label})"), panel.drawings.first(), theme);
            chart_block(
                out,
                &format!("Misinformation Reports ({label})"),
                panel.drawings.get(1),
                theme,
            );
            out.push_str("</div>");
        }
        SectionContent::Categories { legend, .. } => {
            if legend.is_empty() {
                out.push_str("<p class=\"muted\">No category data available.</p>");
                return;
            }
            out.push_str("<div class=\"split\">");
            if let Some(drawing) = panel.drawings.first() {
                out.push_str(&render_svg(drawing, theme));
            }
            out.push_str("<ul class=\"legend\">");
            for entry in legend {
                let _ = write!(
                    out,
                    "<li><span class=\"swatch\" style=\"background:{}\"></span>{}<span class=\"muted\">{}%</span></li>",
                    escape(&entry.color),
                    escape(&entry.label),
                    entry.percent
                );
            }
            out.push_str("</ul></div>");
        }
        SectionContent::Radar { .. } => {
            if let Some(drawing) = panel.drawings.first() {
                out.push_str(&render_svg(drawing, theme));
            }
        }
        SectionContent::Map(data) => {
            let _ = write!(
                out,
                "<p>Top regions: <strong>{}</strong></p><p class=\"muted\">{} heat points, {} located reports</p><ul class=\"markers\">",
                escape(&data.top_regions),
                data.heat.len(),
                data.markers.len()
            );
            for marker in &data.markers {
                let _ = write!(
                    out,
                    "<li><span class=\"dot\" style=\"background:{}\"></span>{} <span class=\"muted\">Credibility: {}%</span></li>",
                    marker.color,
                    escape(marker.state.as_deref().unwrap_or("Unknown")),
                    marker.credibility_score
                );
            }
            out.push_str("</ul>");
        }
        SectionContent::Sources { entries } => {
            if entries.is_empty() {
                out.push_str("<p class=\"muted\">No sources found.</p>");
                return;
            }
            out.push_str("<ul class=\"sources\">");
            for entry in entries {
                let _ = write!(
                    out,
                    "<li><div class=\"row\"><strong>{}</strong><span class=\"muted\">{}%</span></div><div class=\"bar\"><div style=\"width:{}%\"></div></div></li>",
                    escape(&entry.domain),
                    entry.percentage,
                    entry.percentage
                );
            }
            out.push_str("</ul>");
        }
    }
}

const STYLE: &str = "body{margin:0;font-family:system-ui,sans-serif;background:var(--bg);color:var(--text)}\
main{display:grid;grid-template-columns:1fr 1fr;gap:16px;padding:16px}\
.column{display:flex;flex-direction:column;gap:16px;min-height:80px}\
section{border:1px solid var(--border);border-radius:24px;background:var(--card);padding:12px 16px;cursor:grab}\
header h2{margin:0;font-size:1rem}header p,.muted{color:var(--subtext);font-size:.8rem}\
.pair,.split{display:flex;gap:12px;flex-wrap:wrap}.chart{flex:1;margin:0}\
.swatch,.dot{display:inline-block;width:12px;height:12px;border-radius:3px;margin-right:8px}.dot{border-radius:50%}\
.legend,.sources,.markers{list-style:none;padding:0;flex:1}.row{display:flex;justify-content:space-between}\
.bar{height:8px;background:var(--border);border-radius:4px;overflow:hidden}.bar div{height:100%;background:var(--accentBlue)}\
.timeframes{display:flex;gap:4px}.timeframes form{margin:0}.active{font-weight:700}.error{color:#ef4444}";

/// Full dashboard document. Columns and sections carry `data-*` ids for the
/// drag collaborator.
pub fn render_page(model: &PageModel) -> String {
    let theme = Theme::get(model.theme);
    let mut out = String::with_capacity(16 * 1024);
    let _ = write!(
        out,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Misinformation Dashboard</title><style>:root{{{}}}{}</style></head><body><main>",
        theme.css_variables(),
        STYLE
    );
    for (column, panels) in &model.columns {
        let _ = write!(out, "<div class=\"column\" data-column=\"{}\">", column.as_str());
        for panel in panels {
            let _ = write!(
                out,
                "<section data-section=\"{}\"><header><h2>{}</h2><p>{}</p></header>",
                panel.view.id,
                escape(panel.view.title),
                escape(panel.view.subtitle)
            );
            section_body(&mut out, panel, theme);
            out.push_str("</section>");
        }
        out.push_str("</div>");
    }
    out.push_str("</main></body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::SectionView;
    use crate::domain::layout::ColumnId;
    use crate::domain::section::{SectionKind, SourceEntry};
    use crate::domain::theme::ThemeName;

    fn panel(kind: SectionKind, status: SectionStatus) -> Panel {
        Panel {
            view: SectionView {
                id: kind.id(),
                title: kind.title(),
                subtitle: kind.subtitle(),
                status,
            },
            drawings: Vec::new(),
        }
    }

    #[test]
    fn test_page_lists_columns_in_order() {
        let model = PageModel {
            theme: ThemeName::Dark,
            columns: vec![
                (ColumnId::Left, vec![panel(SectionKind::Map, SectionStatus::Loading)]),
                (
                    ColumnId::Right,
                    vec![
                        panel(
                            SectionKind::Sources,
                            SectionStatus::Ready(SectionContent::Sources {
                                entries: vec![SourceEntry {
                                    domain: "<evil>.com".to_string(),
                                    percentage: 42.0,
                                }],
                            }),
                        ),
                        panel(
                            SectionKind::Pie,
                            SectionStatus::Failed {
                                message: "Failed to fetch category data.".to_string(),
                            },
                        ),
                    ],
                ),
            ],
        };
        let html = render_page(&model);
        let left = html.find("data-column=\"left\"").unwrap();
        let right = html.find("data-column=\"right\"").unwrap();
        let map = html.find("data-section=\"map\"").unwrap();
        let sources = html.find("data-section=\"sources\"").unwrap();
        assert!(left < map && map < right && right < sources);
        assert!(html.contains("&lt;evil&gt;.com"));
        assert!(html.contains("/sections/pie/retry"));
        assert!(html.contains("Loading"));
    }
}
