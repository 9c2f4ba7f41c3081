// Dashboard sections: identity, titles and per-section load state
use crate::domain::charts::ChartSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The five dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Line,
    Pie,
    Radar,
    Map,
    Sources,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Map,
        SectionKind::Radar,
        SectionKind::Line,
        SectionKind::Pie,
        SectionKind::Sources,
    ];

    pub fn id(&self) -> SectionId {
        SectionId::new(match self {
            SectionKind::Line => "line",
            SectionKind::Pie => "pie",
            SectionKind::Radar => "radar",
            SectionKind::Map => "map",
            SectionKind::Sources => "sources",
        })
    }

    pub fn from_id(id: &SectionId) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == *id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Line => "Traffic Trends",
            SectionKind::Pie => "Content Categories",
            SectionKind::Radar => "Article Analysis",
            SectionKind::Map => "Geographic Hotspots",
            SectionKind::Sources => "Credible Sources",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            SectionKind::Line => "Reports & misinformation volume",
            SectionKind::Pie => "Distribution from recent reports",
            SectionKind::Radar => "Recent report analysis",
            SectionKind::Map => "Interactive map of reports",
            SectionKind::Sources => "Most cited domains in reports",
        }
    }

    /// Sections whose drag preview must not re-instantiate the live content.
    pub fn uses_lightweight_preview(&self) -> bool {
        matches!(self, SectionKind::Map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Daily, Timeframe::Weekly, Timeframe::Monthly];

    pub fn key(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub percent: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    pub domain: String,
    pub percentage: f64,
}

/// Weighted heat point `[lat, lng, weight]` for the mapping collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub state: Option<String>,
    pub credibility_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub heat: Vec<HeatPoint>,
    pub markers: Vec<MapMarker>,
    pub top_regions: String,
}

/// Presentation-ready content of a loaded section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionContent {
    Traffic {
        timeframe: Timeframe,
        reports: ChartSpec,
        misinformation: ChartSpec,
    },
    Categories {
        chart: ChartSpec,
        legend: Vec<LegendEntry>,
    },
    Radar {
        chart: ChartSpec,
    },
    Map(MapData),
    Sources {
        entries: Vec<SourceEntry>,
    },
}

impl SectionContent {
    pub fn charts(&self) -> Vec<&ChartSpec> {
        match self {
            SectionContent::Traffic {
                reports,
                misinformation,
                ..
            } => vec![reports, misinformation],
            SectionContent::Categories { chart, .. } | SectionContent::Radar { chart } => {
                vec![chart]
            }
            SectionContent::Map(_) | SectionContent::Sources { .. } => Vec::new(),
        }
    }
}

/// Load lifecycle of a single section; failures stay local to the section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SectionStatus {
    Loading,
    Ready(SectionContent),
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_id_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_id(&kind.id()), Some(kind));
        }
        assert_eq!(SectionKind::from_id(&SectionId::new("bogus")), None);
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::parse("Monthly"), Some(Timeframe::Monthly));
        assert_eq!(Timeframe::parse("yearly"), None);
        assert_eq!(Timeframe::default(), Timeframe::Weekly);
    }

    #[test]
    fn test_panel_titles() {
        let titles: Vec<_> = SectionKind::ALL.iter().map(SectionKind::title).collect();
        assert!(titles.contains(&"Geographic Hotspots"));
        assert_eq!(SectionKind::Pie.title(), "Content Categories");
        assert_eq!(SectionKind::Radar.title(), "Article Analysis");
        assert_eq!(SectionKind::Sources.title(), "Credible Sources");
        assert_eq!(SectionKind::Line.title(), "Traffic Trends");
    }

    #[test]
    fn test_only_map_uses_lightweight_preview() {
        let light: Vec<_> = SectionKind::ALL
            .into_iter()
            .filter(SectionKind::uses_lightweight_preview)
            .collect();
        assert_eq!(light, vec![SectionKind::Map]);
    }
}
