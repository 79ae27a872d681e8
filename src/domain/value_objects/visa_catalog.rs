//! Visa catalog reference data.
//!
//! Static description of the visa products on offer: the four visa types,
//! the entry/duration options each one supports (with fixed prices), and the
//! six processing tiers (with fixed surcharges and turnaround).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Visa category chosen in the first wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisaType {
    #[default]
    Tourist,
    Business,
    Transit,
    Diplomatic,
}

impl VisaType {
    pub const ALL: [VisaType; 4] = [
        VisaType::Tourist,
        VisaType::Business,
        VisaType::Transit,
        VisaType::Diplomatic,
    ];

    /// Parse the wire code (`"tourist"`, `"business"`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "tourist" => Some(Self::Tourist),
            "business" => Some(Self::Business),
            "transit" => Some(Self::Transit),
            "diplomatic" => Some(Self::Diplomatic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tourist => "tourist",
            Self::Business => "business",
            Self::Transit => "transit",
            Self::Diplomatic => "diplomatic",
        }
    }

    /// Catalog entry for this visa type.
    pub fn option(&self) -> &'static VisaOption {
        match self {
            Self::Tourist => &VISA_OPTIONS[0],
            Self::Business => &VISA_OPTIONS[1],
            Self::Transit => &VISA_OPTIONS[2],
            Self::Diplomatic => &VISA_OPTIONS[3],
        }
    }

    /// Whether `duration` is sold for this visa type.
    pub fn offers(&self, duration: VisaDuration) -> bool {
        self.option().duration(duration).is_some()
    }
}

impl std::fmt::Display for VisaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entry/validity option. Which ones are valid depends on the visa type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisaDuration {
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "multiple-1month")]
    MultipleOneMonth,
    #[serde(rename = "multiple-3months")]
    MultipleThreeMonths,
    #[serde(rename = "multiple-6months")]
    MultipleSixMonths,
    #[serde(rename = "multiple-1year")]
    MultipleOneYear,
    #[serde(rename = "multiple-2years")]
    MultipleTwoYears,
    #[serde(rename = "multiple-3years")]
    MultipleThreeYears,
}

impl VisaDuration {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "single" => Some(Self::Single),
            "multiple-1month" => Some(Self::MultipleOneMonth),
            "multiple-3months" => Some(Self::MultipleThreeMonths),
            "multiple-6months" => Some(Self::MultipleSixMonths),
            "multiple-1year" => Some(Self::MultipleOneYear),
            "multiple-2years" => Some(Self::MultipleTwoYears),
            "multiple-3years" => Some(Self::MultipleThreeYears),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MultipleOneMonth => "multiple-1month",
            Self::MultipleThreeMonths => "multiple-3months",
            Self::MultipleSixMonths => "multiple-6months",
            Self::MultipleOneYear => "multiple-1year",
            Self::MultipleTwoYears => "multiple-2years",
            Self::MultipleThreeYears => "multiple-3years",
        }
    }
}

impl std::fmt::Display for VisaDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing speed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingTime {
    Normal,
    Urgent,
    SuperUrgent,
    Express,
    Emergency,
    WeekendHoliday,
}

impl ProcessingTime {
    pub const ALL: [ProcessingTime; 6] = [
        ProcessingTime::Normal,
        ProcessingTime::Urgent,
        ProcessingTime::SuperUrgent,
        ProcessingTime::Express,
        ProcessingTime::Emergency,
        ProcessingTime::WeekendHoliday,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "normal" => Some(Self::Normal),
            "urgent" => Some(Self::Urgent),
            "super-urgent" => Some(Self::SuperUrgent),
            "express" => Some(Self::Express),
            "emergency" => Some(Self::Emergency),
            "weekend-holiday" => Some(Self::WeekendHoliday),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::SuperUrgent => "super-urgent",
            Self::Express => "express",
            Self::Emergency => "emergency",
            Self::WeekendHoliday => "weekend-holiday",
        }
    }

    /// Catalog entry for this tier.
    pub fn option(&self) -> &'static ProcessingTimeOption {
        let idx = Self::ALL
            .iter()
            .position(|tier| tier == self)
            .unwrap_or_default();
        &PROCESSING_TIMES[idx]
    }
}

impl std::fmt::Display for ProcessingTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A priced duration option under a visa type.
#[derive(Debug, Clone, Serialize)]
pub struct VisaDurationOption {
    pub value: VisaDuration,
    pub label: &'static str,
    pub description: &'static str,
    /// Base price in USD, per applicant.
    pub price: u32,
}

impl VisaDurationOption {
    pub fn price(&self) -> Decimal {
        Decimal::from(self.price)
    }
}

/// Catalog entry for a visa type.
#[derive(Debug, Clone, Serialize)]
pub struct VisaOption {
    #[serde(rename = "type")]
    pub visa_type: VisaType,
    pub label: &'static str,
    pub description: &'static str,
    pub durations: &'static [VisaDurationOption],
}

impl VisaOption {
    pub fn duration(&self, value: VisaDuration) -> Option<&'static VisaDurationOption> {
        self.durations.iter().find(|d| d.value == value)
    }
}

/// Catalog entry for a processing tier.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingTimeOption {
    pub value: ProcessingTime,
    pub label: &'static str,
    pub description: &'static str,
    /// Surcharge in USD, per applicant.
    pub additional_fee: u32,
    /// Turnaround, counted as calendar days.
    pub business_days: u32,
}

impl ProcessingTimeOption {
    pub fn additional_fee(&self) -> Decimal {
        Decimal::from(self.additional_fee)
    }
}

const fn duration(
    value: VisaDuration,
    label: &'static str,
    description: &'static str,
    price: u32,
) -> VisaDurationOption {
    VisaDurationOption {
        value,
        label,
        description,
        price,
    }
}

pub static VISA_OPTIONS: [VisaOption; 4] = [
    VisaOption {
        visa_type: VisaType::Tourist,
        label: "Tourist Visa",
        description: "For leisure, sightseeing, visiting friends and relatives",
        durations: &[
            duration(VisaDuration::Single, "Single Entry", "Valid for one entry only", 25),
            duration(
                VisaDuration::MultipleOneMonth,
                "Multiple Entry - 1 Month",
                "Multiple entries within 1 month",
                50,
            ),
            duration(
                VisaDuration::MultipleThreeMonths,
                "Multiple Entry - 3 Months",
                "Multiple entries within 3 months",
                65,
            ),
        ],
    },
    VisaOption {
        visa_type: VisaType::Business,
        label: "Business Visa",
        description: "For business meetings, conferences, trade activities",
        durations: &[
            duration(VisaDuration::Single, "Single Entry", "Valid for one entry only", 45),
            duration(
                VisaDuration::MultipleOneMonth,
                "Multiple Entry - 1 Month",
                "Multiple entries within 1 month",
                80,
            ),
            duration(
                VisaDuration::MultipleThreeMonths,
                "Multiple Entry - 3 Months",
                "Multiple entries within 3 months",
                95,
            ),
            duration(
                VisaDuration::MultipleSixMonths,
                "Multiple Entry - 6 Months",
                "Multiple entries within 6 months",
                135,
            ),
            duration(
                VisaDuration::MultipleOneYear,
                "Multiple Entry - 1 Year",
                "Multiple entries within 1 year",
                180,
            ),
        ],
    },
    VisaOption {
        visa_type: VisaType::Transit,
        label: "Transit Visa",
        description: "For passengers in transit through Vietnam",
        durations: &[duration(
            VisaDuration::Single,
            "Single Entry",
            "Valid for one transit only",
            20,
        )],
    },
    VisaOption {
        visa_type: VisaType::Diplomatic,
        label: "Diplomatic Visa",
        description: "For diplomatic passport holders",
        durations: &[
            duration(
                VisaDuration::MultipleSixMonths,
                "Multiple Entry - 6 Months",
                "Multiple entries within 6 months",
                0,
            ),
            duration(
                VisaDuration::MultipleOneYear,
                "Multiple Entry - 1 Year",
                "Multiple entries within 1 year",
                0,
            ),
            duration(
                VisaDuration::MultipleTwoYears,
                "Multiple Entry - 2 Years",
                "Multiple entries within 2 years",
                0,
            ),
            duration(
                VisaDuration::MultipleThreeYears,
                "Multiple Entry - 3 Years",
                "Multiple entries within 3 years",
                0,
            ),
        ],
    },
];

pub static PROCESSING_TIMES: [ProcessingTimeOption; 6] = [
    ProcessingTimeOption {
        value: ProcessingTime::Normal,
        label: "Normal Processing",
        description: "Standard processing time",
        additional_fee: 0,
        business_days: 3,
    },
    ProcessingTimeOption {
        value: ProcessingTime::Urgent,
        label: "Urgent Processing",
        description: "Expedited processing",
        additional_fee: 20,
        business_days: 2,
    },
    ProcessingTimeOption {
        value: ProcessingTime::SuperUrgent,
        label: "Super Urgent Processing",
        description: "Super expedited processing",
        additional_fee: 40,
        business_days: 1,
    },
    ProcessingTimeOption {
        value: ProcessingTime::Express,
        label: "Express Processing",
        description: "Same day processing",
        additional_fee: 60,
        business_days: 1,
    },
    ProcessingTimeOption {
        value: ProcessingTime::Emergency,
        label: "Emergency Processing",
        description: "Immediate processing for emergencies",
        additional_fee: 100,
        business_days: 1,
    },
    ProcessingTimeOption {
        value: ProcessingTime::WeekendHoliday,
        label: "Weekend/Holiday Processing",
        description: "Processing on weekends and holidays",
        additional_fee: 80,
        business_days: 1,
    },
];

/// Look up a duration option by wire codes. Unknown codes or a duration not
/// sold for the visa type yield `None`.
pub fn duration_option_by_code(
    visa_type: &str,
    duration: &str,
) -> Option<&'static VisaDurationOption> {
    let visa_type = VisaType::from_code(visa_type)?;
    let duration = VisaDuration::from_code(duration)?;
    visa_type.option().duration(duration)
}

pub fn processing_option_by_code(code: &str) -> Option<&'static ProcessingTimeOption> {
    ProcessingTime::from_code(code).map(|tier| tier.option())
}
