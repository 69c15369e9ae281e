use serde::{Deserialize, Serialize};

/// One normalized country row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub id: String,
    pub name: String,
    /// Geographic region only. Policy groupings live in `policy_groups`.
    pub region: Option<String>,
    pub policy_groups: Vec<PolicyGroup>,
    pub gdp: Gdp,
    pub us_trade_balance: Option<f64>,
    pub share_of_us_imports: Option<f64>,
    pub share_of_us_exports: Option<f64>,
    pub reciprocal_tariff: Option<f64>,
    #[serde(rename = "tariffsToUS")]
    pub tariffs_to_us: Option<f64>,
    pub impacted_sectors: Vec<String>,
    pub key_insights: Vec<String>,
    pub national_reaction: NationalReaction,
}

impl CountryRecord {
    /// A record with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region: None,
            policy_groups: Vec::new(),
            gdp: Gdp::default(),
            us_trade_balance: None,
            share_of_us_imports: None,
            share_of_us_exports: None,
            reciprocal_tariff: None,
            tariffs_to_us: None,
            impacted_sectors: Vec::new(),
            key_insights: Vec::new(),
            national_reaction: NationalReaction::default(),
        }
    }

    pub fn is_g20(&self) -> bool {
        self.policy_groups.contains(&PolicyGroup::G20)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gdp {
    #[serde(rename = "actual2023")]
    pub actual_2023: Option<f64>,
    #[serde(rename = "estimate2024")]
    pub estimate_2024: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalReaction {
    pub retaliatory: Vec<String>,
    pub domestic_support: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyGroup {
    G20,
}

impl PolicyGroup {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::G20 => "G20",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "g20" | "g-20" => Some(Self::G20),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "gdp2023")]
    Gdp2023,
    #[serde(rename = "gdp2024")]
    Gdp2024,
    #[serde(rename = "usTradeBalance")]
    UsTradeBalance,
    #[serde(rename = "shareOfUsImports")]
    ShareOfUsImports,
    #[serde(rename = "shareOfUsExports")]
    ShareOfUsExports,
    #[serde(rename = "reciprocalTariff")]
    ReciprocalTariff,
    #[serde(rename = "tariffsToUS")]
    TariffsToUs,
}

impl Metric {
    pub const ALL: [Self; 7] = [
        Self::Gdp2023,
        Self::Gdp2024,
        Self::UsTradeBalance,
        Self::ShareOfUsImports,
        Self::ShareOfUsExports,
        Self::ReciprocalTariff,
        Self::TariffsToUs,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gdp2023 => "gdp2023",
            Self::Gdp2024 => "gdp2024",
            Self::UsTradeBalance => "usTradeBalance",
            Self::ShareOfUsImports => "shareOfUsImports",
            Self::ShareOfUsExports => "shareOfUsExports",
            Self::ReciprocalTariff => "reciprocalTariff",
            Self::TariffsToUs => "tariffsToUS",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str().eq_ignore_ascii_case(value))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gdp2023 => "GDP 2023",
            Self::Gdp2024 => "GDP 2024 (est.)",
            Self::UsTradeBalance => "US Trade Balance",
            Self::ShareOfUsImports => "Share of US Imports",
            Self::ShareOfUsExports => "Share of US Exports",
            Self::ReciprocalTariff => "Reciprocal Tariff",
            Self::TariffsToUs => "Tariffs to US",
        }
    }

    pub const fn is_tariff(self) -> bool {
        matches!(self, Self::ReciprocalTariff | Self::TariffsToUs)
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|metric| *metric == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The tariff-type toggle on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TariffKind {
    Reciprocal,
    ToUs,
}

impl TariffKind {
    pub const fn metric(self) -> Metric {
        match self {
            Self::Reciprocal => Metric::ReciprocalTariff,
            Self::ToUs => Metric::TariffsToUs,
        }
    }

    pub const fn toggle(self) -> Self {
        match self {
            Self::Reciprocal => Self::ToUs,
            Self::ToUs => Self::Reciprocal,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Reciprocal => "US tariffs on country",
            Self::ToUs => "Country tariffs on US",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionFilter {
    #[default]
    All,
    G20,
    NonG20,
    Region(String),
}

impl RegionFilter {
    pub fn matches(&self, record: &CountryRecord) -> bool {
        match self {
            Self::All => true,
            Self::G20 => record.is_g20(),
            Self::NonG20 => !record.is_g20(),
            Self::Region(region) => record
                .region
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(region)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => "All countries".to_string(),
            Self::G20 => "G20".to_string(),
            Self::NonG20 => "Non-G20".to_string(),
            Self::Region(region) => region.clone(),
        }
    }

    /// Accepts `all`, `g20`, `non-g20` or any geographic region name.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "g20" | "g-20" => Some(Self::G20),
            "non-g20" | "nong20" | "non_g20" => Some(Self::NonG20),
            _ => Some(Self::Region(trimmed.to_string())),
        }
    }

    /// Cycles All -> G20 -> Non-G20 -> each known region -> All.
    pub fn next(&self, regions: &[String]) -> Self {
        match self {
            Self::All => Self::G20,
            Self::G20 => Self::NonG20,
            Self::NonG20 => regions
                .first()
                .map_or(Self::All, |region| Self::Region(region.clone())),
            Self::Region(current) => regions
                .iter()
                .position(|region| region == current)
                .and_then(|index| regions.get(index + 1))
                .map_or(Self::All, |region| Self::Region(region.clone())),
        }
    }
}

/// Distinct geographic regions across `records`, sorted.
pub fn known_regions(records: &[CountryRecord]) -> Vec<String> {
    let mut regions: Vec<String> = records
        .iter()
        .filter_map(|record| record.region.clone())
        .collect();
    regions.sort();
    regions.dedup();
    regions
}
