// Payload adapters - Turn raw endpoint JSON into section content
use crate::application::analytics_repository::Endpoint;
use crate::domain::charts::{ChartSpec, Donut, LineSpec, PieSpec, RadarPreset, RadarSpec};
use crate::domain::geometry::clamp;
use crate::domain::section::{
    HeatPoint, LegendEntry, MapData, MapMarker, SectionContent, SectionKind, SourceEntry, Timeframe,
};
use crate::domain::series::{array_at, coerce_f64, field_series};
use crate::domain::theme::category_color;
use serde_json::Value;
use std::collections::HashMap;

const FALLBACK_RADAR_AXES: [&str; 5] = ["Clarity", "Tone", "Correctness", "Originality", "Score"];
const FALLBACK_RADAR_VALUES: [f64; 5] = [85.0, 70.0, 60.0, 75.0, 80.0];
const RADAR_CEILING: f64 = 100.0;
const DONUT_INNER_RADIUS: f64 = 30.0;
const MAX_SOURCES: usize = 5;
const MAX_REGIONS: usize = 5;
const DEFAULT_HEAT_WEIGHT: f64 = 0.5;

static NO_PAYLOAD: Value = Value::Null;

/// Endpoints a section reads, in the order `build_content` expects them.
pub fn endpoints(kind: SectionKind) -> &'static [Endpoint] {
    match kind {
        SectionKind::Line => &[Endpoint::Traffic],
        SectionKind::Pie => &[Endpoint::Categories],
        SectionKind::Radar => &[Endpoint::Radar],
        SectionKind::Map => &[Endpoint::Heatmap, Endpoint::RecentReports],
        SectionKind::Sources => &[Endpoint::Sources],
    }
}

/// User-visible message shown when a section's fetch fails.
pub fn failure_message(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Line => "Failed to fetch traffic data.",
        SectionKind::Pie => "Failed to fetch category data.",
        SectionKind::Radar => "Failed to fetch radar data.",
        SectionKind::Map => "Could not load map data.",
        SectionKind::Sources => "Failed to fetch sources. Please try again.",
    }
}

pub fn build_content(kind: SectionKind, payloads: &[Value], timeframe: Timeframe) -> SectionContent {
    let first = payloads.first().unwrap_or(&NO_PAYLOAD);
    match kind {
        SectionKind::Line => traffic(first, timeframe),
        SectionKind::Pie => categories(first),
        SectionKind::Radar => radar(first),
        SectionKind::Map => map(first, payloads.get(1).unwrap_or(&NO_PAYLOAD)),
        SectionKind::Sources => sources(first),
    }
}

fn traffic_label(value: Option<&Value>, timeframe: Timeframe) -> String {
    let raw = match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    match timeframe {
        Timeframe::Daily => raw.split(':').next().unwrap_or_default().to_string(),
        Timeframe::Weekly => raw.chars().take(3).collect(),
        Timeframe::Monthly => raw.chars().skip(5).collect(),
    }
}

/// `{daily|weekly|monthly: {traffic: [...]}}` into report and misinformation charts.
pub fn traffic(payload: &Value, timeframe: Timeframe) -> SectionContent {
    let rows = array_at(payload, &format!("/{}/traffic", timeframe.key()));
    let label_field = match timeframe {
        Timeframe::Daily => "hour",
        Timeframe::Weekly => "day",
        Timeframe::Monthly => "date",
    };
    let labels: Vec<String> = rows
        .iter()
        .map(|row| traffic_label(row.get(label_field), timeframe))
        .collect();

    SectionContent::Traffic {
        timeframe,
        reports: ChartSpec::Line(LineSpec {
            data: field_series(rows, "reports"),
            labels: labels.clone(),
            ..LineSpec::default()
        }),
        misinformation: ChartSpec::Area(LineSpec {
            data: field_series(rows, "total_misinfo_count"),
            labels,
            ..LineSpec::default()
        }),
    }
}

fn whole_percent(value: f64, total: f64) -> u32 {
    let pct = (value / total * 100.0).round();
    if pct.is_finite() && pct > 0.0 { pct as u32 } else { 0 }
}

/// `category -> count`, largest first, as a donut plus legend rows.
pub fn categories(payload: &Value) -> SectionContent {
    let mut entries: Vec<(String, f64)> = payload
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(name, count)| (name.clone(), coerce_f64(count).max(0.0)))
                .collect()
        })
        .unwrap_or_default();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));

    let sum: f64 = entries.iter().map(|(_, v)| v).sum();
    let total = if sum > 0.0 { sum } else { 1.0 };
    let legend: Vec<LegendEntry> = entries
        .iter()
        .map(|(label, value)| LegendEntry {
            label: label.clone(),
            percent: whole_percent(*value, total),
            color: category_color(label).to_string(),
        })
        .collect();
    let label = legend
        .first()
        .map(|top| format!("{}%", top.percent))
        .unwrap_or_default();

    let chart = ChartSpec::Pie(PieSpec {
        values: entries.iter().map(|(_, v)| *v).collect(),
        colors: legend.iter().map(|e| e.color.clone()).collect(),
        donut: Some(Donut {
            inner_radius: DONUT_INNER_RADIUS,
            label,
        }),
        ..PieSpec::default()
    });
    SectionContent::Categories { chart, legend }
}

/// `credibility_score` -> `Credibility Score`
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// `metric -> average`, plotted against a fixed 0..=100 scale.
pub fn radar(payload: &Value) -> SectionContent {
    let (axes, values): (Vec<String>, Vec<f64>) = match payload.as_object() {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(metric, avg)| (title_case(metric), coerce_f64(avg)))
            .unzip(),
        _ => {
            tracing::debug!("radar payload empty, using placeholder axes");
            (
                FALLBACK_RADAR_AXES.iter().map(|a| a.to_string()).collect(),
                FALLBACK_RADAR_VALUES.to_vec(),
            )
        }
    };
    SectionContent::Radar {
        chart: ChartSpec::Radar(RadarSpec {
            axes,
            values,
            scale: Some(RADAR_CEILING),
            preset: RadarPreset::Panel,
            ..RadarSpec::default()
        }),
    }
}

fn heat_point(raw: &Value) -> Option<HeatPoint> {
    let triple = raw.as_array()?;
    let lat = triple.first()?.as_f64()?;
    let lng = triple.get(1)?.as_f64()?;
    let weight = triple
        .get(2)
        .map(coerce_f64)
        .filter(|w| *w != 0.0)
        .unwrap_or(DEFAULT_HEAT_WEIGHT);
    Some(HeatPoint {
        lat,
        lng,
        weight: clamp(weight, 0.0, 1.0),
    })
}

/// Band colour for a report's misinformation intensity.
pub fn intensity_color(credibility_score: f64) -> &'static str {
    let intensity = (100.0 - credibility_score) / 100.0;
    if intensity >= 0.9 {
        "#d7191c"
    } else if intensity >= 0.7 {
        "#fdae61"
    } else if intensity >= 0.4 {
        "#ffffbf"
    } else if intensity >= 0.15 {
        "#7fcdbb"
    } else {
        "#2c7bb6"
    }
}

fn marker(index: usize, report: &Value) -> Option<MapMarker> {
    let location = report.get("location")?;
    let lat = location.get("latitude")?.as_f64()?;
    let lng = location.get("longitude")?.as_f64()?;
    let credibility_score = report.get("credibility_score").map(coerce_f64).unwrap_or(0.0);
    let id = match report.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("report-{index}"),
    };
    Some(MapMarker {
        id,
        lat,
        lng,
        color: intensity_color(credibility_score),
        state: report.get("state").and_then(Value::as_str).map(str::to_string),
        credibility_score,
    })
}

/// Most reported states, most frequent first; ties keep first-seen order.
pub fn top_regions(reports: &[Value]) -> String {
    if reports.is_empty() {
        return "No recent reports".to_string();
    }
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for state in reports
        .iter()
        .filter_map(|r| r.get("state").and_then(Value::as_str))
        .filter(|s| !s.is_empty() && *s != "Unknown")
    {
        let count = counts.entry(state).or_insert(0);
        if *count == 0 {
            order.push(state);
        }
        *count += 1;
    }
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    if order.is_empty() {
        return "No locations reported".to_string();
    }
    order
        .into_iter()
        .take(MAX_REGIONS)
        .collect::<Vec<_>>()
        .join(" • ")
}

pub fn map(heatmap: &Value, reports: &Value) -> SectionContent {
    let reports = reports.as_array().map(Vec::as_slice).unwrap_or(&[]);
    SectionContent::Map(MapData {
        heat: heatmap
            .as_array()
            .map(|points| points.iter().filter_map(heat_point).collect())
            .unwrap_or_default(),
        markers: reports
            .iter()
            .enumerate()
            .filter_map(|(i, r)| marker(i, r))
            .collect(),
        top_regions: top_regions(reports),
    })
}

/// `{top_sources: [{domain, percentage}]}`, top five by share.
pub fn sources(payload: &Value) -> SectionContent {
    let mut entries: Vec<SourceEntry> = array_at(payload, "/top_sources")
        .iter()
        .map(|row| SourceEntry {
            domain: row
                .get("domain")
                .and_then(Value::as_str)
                .filter(|d| !d.is_empty())
                .unwrap_or("Unknown")
                .to_string(),
            percentage: row.get("percentage").map(coerce_f64).unwrap_or(0.0),
        })
        .collect();
    entries.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    entries.truncate(MAX_SOURCES);
    for entry in &mut entries {
        entry.percentage = clamp(entry.percentage, 0.0, 100.0);
    }
    SectionContent::Sources { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_traffic_labels_per_timeframe() {
        let payload = json!({
            "daily": {"traffic": [{"hour": "09:00", "reports": 4, "total_misinfo_count": 1}]},
            "weekly": {"traffic": [
                {"day": "Monday", "reports": 10, "total_misinfo_count": 3},
                {"day": "Tuesday", "reports": "12", "total_misinfo_count": null}
            ]},
            "monthly": {"traffic": [{"date": "2024-05-17", "reports": 7}]}
        });

        let SectionContent::Traffic {
            reports,
            misinformation,
            ..
        } = traffic(&payload, Timeframe::Weekly)
        else {
            panic!("expected traffic content");
        };
        let (ChartSpec::Line(reports), ChartSpec::Area(misinfo)) = (reports, misinformation) else {
            panic!("expected line and area charts");
        };
        assert_eq!(reports.labels, vec!["Mon", "Tue"]);
        assert_eq!(reports.data, vec![10.0, 12.0]);
        assert_eq!(misinfo.data, vec![3.0, 0.0]);

        let SectionContent::Traffic {
            reports: ChartSpec::Line(daily),
            ..
        } = traffic(&payload, Timeframe::Daily)
        else {
            panic!("expected line chart");
        };
        assert_eq!(daily.labels, vec!["09"]);

        let SectionContent::Traffic {
            reports: ChartSpec::Line(monthly),
            ..
        } = traffic(&payload, Timeframe::Monthly)
        else {
            panic!("expected line chart");
        };
        assert_eq!(monthly.labels, vec!["05-17"]);
    }

    #[test]
    fn test_traffic_missing_timeframe_is_empty() {
        let SectionContent::Traffic {
            reports: ChartSpec::Line(spec),
            ..
        } = traffic(&json!({}), Timeframe::Monthly)
        else {
            panic!("expected line chart");
        };
        assert!(spec.data.is_empty());
        assert!(ChartSpec::Line(spec).render().is_placeholder());
    }

    #[test]
    fn test_categories_sorted_with_legend() {
        let SectionContent::Categories { chart, legend } =
            categories(&json!({"Health": 1, "Political": 3, "Mystery": 4}))
        else {
            panic!("expected categories");
        };
        let labels: Vec<_> = legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Mystery", "Political", "Health"]);
        assert_eq!(legend[0].percent, 50);
        assert_eq!(legend[0].color, "#cccccc");
        assert_eq!(legend[1].color, "#2196F3");
        let ChartSpec::Pie(pie) = chart else {
            panic!("expected pie");
        };
        assert_eq!(pie.values, vec![4.0, 3.0, 1.0]);
        assert_eq!(pie.donut.map(|d| d.label), Some("50%".to_string()));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("credibility_score"), "Credibility Score");
        assert_eq!(title_case("tone"), "Tone");
        assert_eq!(title_case("a_b2c"), "A B2c");
    }

    #[test]
    fn test_radar_fallback_and_scale() {
        let SectionContent::Radar {
            chart: ChartSpec::Radar(spec),
        } = radar(&json!({}))
        else {
            panic!("expected radar");
        };
        assert_eq!(spec.axes, FALLBACK_RADAR_AXES.to_vec());
        assert_eq!(spec.values, FALLBACK_RADAR_VALUES.to_vec());
        assert_eq!(spec.scale, Some(100.0));
        assert_eq!(spec.preset, RadarPreset::Panel);

        let SectionContent::Radar {
            chart: ChartSpec::Radar(spec),
        } = radar(&json!({"credibility_score": 62.5}))
        else {
            panic!("expected radar");
        };
        assert_eq!(spec.axes, vec!["Credibility Score"]);
        assert_eq!(spec.values, vec![62.5]);
    }

    #[test]
    fn test_map_heat_and_markers() {
        let heat = json!([[28.6, 77.2, 0.8], [19.0, 72.8], [12.9, 77.5, 3.0], ["x", 1.0, 0.2], null]);
        let reports = json!([
            {"id": "r1", "location": {"latitude": 28.6, "longitude": 77.2}, "credibility_score": 5, "state": "Delhi"},
            {"location": {"latitude": 19.0, "longitude": 72.8}, "credibility_score": 90, "state": "Maharashtra"},
            {"location": {"latitude": "19"}, "state": "Delhi"},
            {"state": "Unknown"}
        ]);
        let SectionContent::Map(data) = map(&heat, &reports) else {
            panic!("expected map");
        };
        let weights: Vec<f64> = data.heat.iter().map(|h| h.weight).collect();
        assert_eq!(weights, vec![0.8, 0.5, 1.0]);
        assert_eq!(data.markers.len(), 2);
        assert_eq!(data.markers[0].id, "r1");
        assert_eq!(data.markers[0].color, "#d7191c");
        assert_eq!(data.markers[1].id, "report-1");
        assert_eq!(data.markers[1].color, "#2c7bb6");
        assert_eq!(data.top_regions, "Delhi • Maharashtra");
    }

    #[test]
    fn test_intensity_bands() {
        assert_eq!(intensity_color(10.0), "#d7191c");
        assert_eq!(intensity_color(30.0), "#fdae61");
        assert_eq!(intensity_color(60.0), "#ffffbf");
        assert_eq!(intensity_color(85.0), "#7fcdbb");
        assert_eq!(intensity_color(100.0), "#2c7bb6");
    }

    #[test]
    fn test_top_regions_fallbacks() {
        assert_eq!(top_regions(&[]), "No recent reports");
        assert_eq!(top_regions(&[json!({"state": "Unknown"}), json!({})]), "No locations reported");
        let many: Vec<Value> = ["A", "B", "B", "C", "D", "E", "F", "F", "F"]
            .iter()
            .map(|s| json!({ "state": s }))
            .collect();
        assert_eq!(top_regions(&many), "F • B • A • C • D");
    }

    #[test]
    fn test_sources_top_five_clamped() {
        let payload = json!({"top_sources": [
            {"domain": "a.com", "percentage": 12},
            {"domain": "", "percentage": 140},
            {"domain": "b.com", "percentage": 30},
            {"domain": "c.com", "percentage": 5},
            {"domain": "d.com", "percentage": 7},
            {"domain": "e.com", "percentage": 1}
        ]});
        let SectionContent::Sources { entries } = sources(&payload) else {
            panic!("expected sources");
        };
        let domains: Vec<_> = entries.iter().map(|e| e.domain.as_str()).collect();
        assert_eq!(domains, vec!["Unknown", "b.com", "a.com", "d.com", "c.com"]);
        assert_eq!(entries[0].percentage, 100.0);
        assert!(matches!(sources(&json!(null)), SectionContent::Sources { entries } if entries.is_empty()));
    }

    #[test]
    fn test_every_section_has_endpoints() {
        for kind in SectionKind::ALL {
            assert!(!endpoints(kind).is_empty());
            assert!(!failure_message(kind).is_empty());
        }
        assert_eq!(endpoints(SectionKind::Map).len(), 2);
    }
}
