use std::sync::Arc;

use super::categorize::Taxonomy;

/// Maps a category to its standard labor-hours estimate. Pure lookup into
/// the taxonomy table; unknown categories (including "other") get the
/// fallback estimate.
pub struct LaborEstimator {
    taxonomy: Arc<Taxonomy>,
}

impl LaborEstimator {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn estimate(&self, category_name: &str) -> f64 {
        match self.taxonomy.by_name(category_name) {
            Some(category) if category.name != "other" => category.labor_hours,
            _ => self.taxonomy.fallback_labor_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> LaborEstimator {
        LaborEstimator::new(Arc::new(Taxonomy::default_hvac()))
    }

    #[test]
    fn test_known_category_lookup() {
        assert_eq!(estimator().estimate("compressor"), 4.0);
        assert_eq!(estimator().estimate("air_filter"), 0.5);
    }

    #[test]
    fn test_other_and_unknown_fall_back() {
        assert_eq!(estimator().estimate("other"), 2.0);
        assert_eq!(estimator().estimate("no_such_category"), 2.0);
    }
}
