//! The closed set of views the dashboard can show, and parsing of the raw
//! labels the reactive surface hands over.

mod error;

pub use error::SelectionError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analysis shown inside the Analytics tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisFocus {
    Trends,
    Hourly,
    Correlations,
    RainImpact,
}

impl AnalysisFocus {
    /// The label the segmented control displays.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisFocus::Trends => "Trends",
            AnalysisFocus::Hourly => "Hourly",
            AnalysisFocus::Correlations => "Correlations",
            AnalysisFocus::RainImpact => "Rain Impact",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, SelectionError> {
        match label {
            "Trends" => Ok(AnalysisFocus::Trends),
            "Hourly" => Ok(AnalysisFocus::Hourly),
            "Correlations" => Ok(AnalysisFocus::Correlations),
            "Rain Impact" => Ok(AnalysisFocus::RainImpact),
            other => Err(SelectionError::UnknownFocus(other.to_string())),
        }
    }
}

impl fmt::Display for AnalysisFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Top-level tab. Analytics carries its focus so a selection is always a
/// single exhaustively-matchable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    Overview,
    Analytics(AnalysisFocus),
    Conclusion,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Analytics(_) => "Analytics",
            Tab::Conclusion => "Conclusion",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One interaction's worth of UI state: the tab to render and, where a view
/// wants one, the chosen station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub tab: Tab,
    pub station: Option<String>,
}

impl Selection {
    pub fn new(tab: Tab) -> Self {
        Self { tab, station: None }
    }

    pub fn with_station(tab: Tab, station: impl Into<String>) -> Self {
        Self {
            tab,
            station: Some(station.into()),
        }
    }

    /// Builds a selection from raw UI labels. `Analytics` without a focus
    /// falls back to `Trends`, the segmented control's first item.
    pub fn parse(
        tab: &str,
        focus: Option<&str>,
        station: Option<&str>,
    ) -> Result<Self, SelectionError> {
        let tab = match tab {
            "Overview" => Tab::Overview,
            "Analytics" => {
                let focus = match focus {
                    Some(label) => AnalysisFocus::from_label(label)?,
                    None => AnalysisFocus::Trends,
                };
                Tab::Analytics(focus)
            }
            "Conclusion" => Tab::Conclusion,
            other => return Err(SelectionError::UnknownTab(other.to_string())),
        };
        Ok(Self {
            tab,
            station: station.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_labels_round_trip() {
        for focus in [
            AnalysisFocus::Trends,
            AnalysisFocus::Hourly,
            AnalysisFocus::Correlations,
            AnalysisFocus::RainImpact,
        ] {
            assert_eq!(AnalysisFocus::from_label(focus.label()).unwrap(), focus);
        }
    }

    #[test]
    fn parse_accepts_known_labels() {
        let selection = Selection::parse("Overview", None, Some("Wanliu")).unwrap();
        assert_eq!(selection.tab, Tab::Overview);
        assert_eq!(selection.station.as_deref(), Some("Wanliu"));

        let selection = Selection::parse("Analytics", Some("Rain Impact"), None).unwrap();
        assert_eq!(selection.tab, Tab::Analytics(AnalysisFocus::RainImpact));

        let selection = Selection::parse("Conclusion", None, None).unwrap();
        assert_eq!(selection.tab, Tab::Conclusion);
    }

    #[test]
    fn analytics_without_focus_defaults_to_trends() {
        let selection = Selection::parse("Analytics", None, None).unwrap();
        assert_eq!(selection.tab, Tab::Analytics(AnalysisFocus::Trends));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(
            Selection::parse("Insights", None, None).unwrap_err(),
            SelectionError::UnknownTab("Insights".to_string())
        );
        assert_eq!(
            Selection::parse("Analytics", Some("Weekly"), None).unwrap_err(),
            SelectionError::UnknownFocus("Weekly".to_string())
        );
    }
}
