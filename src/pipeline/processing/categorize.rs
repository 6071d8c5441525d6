use std::sync::Arc;

/// One category of the fixed part taxonomy: keyword substrings that map
/// free text into it, the folder path segment it files under, and its
/// standard labor estimate.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: &'static str,
    pub display: &'static str,
    pub folder: &'static str,
    pub keywords: &'static [&'static str],
    pub labor_hours: f64,
}

/// The fixed HVAC part taxonomy. Declared order is the contract: the first
/// category with any keyword substring match wins, so overlapping keywords
/// ("filter drier" vs "filter", "gas valve" vs "valve") resolve by
/// position. Built once at startup and passed explicitly; never mutated.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
    other: Category,
    pub root_folder: &'static str,
    pub fallback_labor_hours: f64,
}

impl Taxonomy {
    pub fn default_hvac() -> Self {
        let categories = vec![
            Category {
                name: "compressor",
                display: "Compressor",
                folder: "Compressors",
                keywords: &["compressor", "scroll", "copeland", "reciprocating"],
                labor_hours: 4.0,
            },
            Category {
                name: "condenser_coil",
                display: "Condenser Coil",
                folder: "Coils",
                keywords: &["condenser coil", "cond coil"],
                labor_hours: 3.0,
            },
            Category {
                name: "evaporator_coil",
                display: "Evaporator Coil",
                folder: "Coils",
                keywords: &["evaporator", "evap coil", "a-coil", "a coil"],
                labor_hours: 3.5,
            },
            Category {
                name: "heat_exchanger",
                display: "Heat Exchanger",
                folder: "Heat Exchangers",
                keywords: &["heat exchanger"],
                labor_hours: 5.0,
            },
            Category {
                name: "blower_motor",
                display: "Blower Motor",
                folder: "Motors",
                keywords: &["blower motor", "blower"],
                labor_hours: 2.5,
            },
            Category {
                name: "condenser_fan_motor",
                display: "Condenser Fan Motor",
                folder: "Motors",
                keywords: &["condenser fan", "fan motor"],
                labor_hours: 2.0,
            },
            Category {
                name: "motor",
                display: "Motor",
                folder: "Motors",
                keywords: &["motor"],
                labor_hours: 2.0,
            },
            Category {
                name: "capacitor",
                display: "Capacitor",
                folder: "Electrical",
                keywords: &["capacitor", "mfd"],
                labor_hours: 1.0,
            },
            Category {
                name: "contactor",
                display: "Contactor",
                folder: "Electrical",
                keywords: &["contactor"],
                labor_hours: 1.0,
            },
            Category {
                name: "control_board",
                display: "Control Board",
                folder: "Electrical",
                keywords: &["control board", "circuit board", "defrost board", "board"],
                labor_hours: 2.0,
            },
            Category {
                name: "igniter",
                display: "Igniter",
                folder: "Ignition",
                keywords: &["igniter", "ignitor", "hot surface"],
                labor_hours: 1.5,
            },
            Category {
                name: "thermostat",
                display: "Thermostat",
                folder: "Thermostats",
                keywords: &["thermostat", "t-stat", "tstat"],
                labor_hours: 1.5,
            },
            Category {
                name: "txv",
                display: "TXV",
                folder: "Valves",
                keywords: &["txv", "expansion valve"],
                labor_hours: 3.0,
            },
            Category {
                name: "gas_valve",
                display: "Gas Valve",
                folder: "Valves",
                keywords: &["gas valve"],
                labor_hours: 2.0,
            },
            Category {
                name: "valve",
                display: "Valve",
                folder: "Valves",
                keywords: &["valve"],
                labor_hours: 2.0,
            },
            Category {
                name: "refrigerant",
                display: "Refrigerant",
                folder: "Refrigerant",
                keywords: &["refrigerant", "r-410a", "r410a", "r-22", "r22", "freon"],
                labor_hours: 1.0,
            },
            Category {
                name: "filter_drier",
                display: "Filter Drier",
                folder: "Filter Driers",
                keywords: &["filter drier", "drier", "dryer"],
                labor_hours: 1.5,
            },
            Category {
                name: "air_filter",
                display: "Air Filter",
                folder: "Filters",
                keywords: &["filter"],
                labor_hours: 0.5,
            },
        ];

        Self {
            categories,
            other: Category {
                name: "other",
                display: "Other",
                folder: "Other Parts",
                keywords: &[],
                labor_hours: 2.0,
            },
            root_folder: "Parts",
            fallback_labor_hours: crate::common::constants::FALLBACK_LABOR_HOURS,
        }
    }

    /// First category (in declared order) with any keyword substring match;
    /// "other" when nothing matches.
    pub fn categorize(&self, text: &str) -> &Category {
        let lowered = text.to_lowercase();
        for category in &self.categories {
            if category.keywords.iter().any(|kw| lowered.contains(kw)) {
                return category;
            }
        }
        &self.other
    }

    pub fn by_name(&self, name: &str) -> Option<&Category> {
        if name == self.other.name {
            return Some(&self.other);
        }
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn other(&self) -> &Category {
        &self.other
    }
}

/// Classifies free text into one category of the fixed taxonomy.
pub struct Categorizer {
    taxonomy: Arc<Taxonomy>,
}

impl Categorizer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn categorize(&self, text: &str) -> &Category {
        self.taxonomy.categorize(text)
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }
}
