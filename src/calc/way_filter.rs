use crate::data::road::Section;

/// Drops sections that are too short, too long, too straight or too curvy.
/// A bound of 0 disables that check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WayFilter {
    /// Meters.
    pub min_length: f64,
    /// Meters.
    pub max_length: f64,
    pub min_curvature: f64,
    pub max_curvature: f64,
}

impl WayFilter {
    pub fn accepts(&self, section: &Section) -> bool {
        (self.min_length <= 0.0 || section.length > self.min_length)
            && (self.max_length <= 0.0 || section.length < self.max_length)
            && (self.min_curvature <= 0.0 || section.curvature > self.min_curvature)
            && (self.max_curvature <= 0.0 || section.curvature < self.max_curvature)
    }

    pub fn filter(&self, sections: Vec<Section>) -> Vec<Section> {
        sections
            .into_iter()
            .filter(|section| self.accepts(section))
            .collect()
    }
}
