/// Business constants shared across the pipeline.
/// These are defaults the caller may override through the CLI or config file,
/// not hidden behavior.

// Pricing defaults for template formatting
pub const DEFAULT_MARKUP: f64 = 1.5;
pub const DEFAULT_LABOR_RATE: f64 = 141.43;
pub const DEFAULT_LABOR_COST: f64 = 54.40;

// Review gate thresholds per enrichment strategy
pub const RULE_BASED_THRESHOLD: u8 = 70;
pub const AI_ASSISTED_THRESHOLD: u8 = 85;
pub const OEM_LOOKUP_THRESHOLD: u8 = 70;

// Rule-based confidence levels
pub const RULE_CONFIDENCE_FULL: u8 = 85;
pub const RULE_CONFIDENCE_PARTIAL: u8 = 70;

// OEM lookup confidence signals (base plus independent increments, capped at 100)
pub const OEM_CONFIDENCE_BASE: u8 = 60;
pub const OEM_BONUS_PART_NUMBER: u8 = 15;
pub const OEM_BONUS_PRICE: u8 = 10;
pub const OEM_BONUS_DESCRIPTION: u8 = 15;

// External lookup pacing and timeouts
pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 1_500;
pub const DEFAULT_LOOKUP_TIMEOUT_SECONDS: u64 = 10;

// Canonical record limits
pub const DESCRIPTION_MAX_CHARS: usize = 180;

// Fallback labor estimate for unmapped categories
pub const FALLBACK_LABOR_HOURS: f64 = 2.0;
