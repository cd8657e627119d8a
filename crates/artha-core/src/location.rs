//! Location-aware cost of living and peer comparison
//!
//! Resolves free-text locations against a static city table, derives
//! affordability and savings targets, and estimates where a user's income sits
//! among peers in the same city tier and profession.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::{format_inr, sanitize};
use crate::recommend::catalog::Rule;
use crate::recommend::types::{Priority, Recommendation, RecommendationDetail};

/// Monthly cost of living at multiplier 1.0
pub const BASELINE_MONTHLY_COST: f64 = 50_000.0;

/// Cost multiplier above which metro budgeting advice applies
const METRO_MULTIPLIER: f64 = 1.2;
/// Affordability ratio above which a tier-2 city is a savings advantage
const TIER2_ADVANTAGE_RATIO: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CityTier::Tier1 => "tier1",
            CityTier::Tier2 => "tier2",
            CityTier::Tier3 => "tier3",
        }
    }

    /// Income multiplier applied to the baseline for peer estimates
    pub fn income_multiplier(&self) -> f64 {
        match self {
            CityTier::Tier1 => 1.3,
            CityTier::Tier2 => 1.0,
            CityTier::Tier3 => 0.8,
        }
    }
}

impl fmt::Display for CityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
    Other,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "north",
            Region::South => "south",
            Region::East => "east",
            Region::West => "west",
            Region::Central => "central",
            Region::Other => "other",
        }
    }
}

/// A known city and its cost profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CityRecord {
    pub name: &'static str,
    /// Cost of living relative to the baseline; always > 0
    pub cost_multiplier: f64,
    pub tier: CityTier,
    pub region: Region,
}

impl CityRecord {
    const fn new(name: &'static str, cost_multiplier: f64, tier: CityTier, region: Region) -> Self {
        Self {
            name,
            cost_multiplier,
            tier,
            region,
        }
    }
}

/// Record used when a location matches no known city
pub const DEFAULT_CITY: CityRecord = CityRecord::new("Other", 1.0, CityTier::Tier2, Region::Other);

/// Known cities. Matching is by substring in this order; the first hit wins.
const CITIES: &[CityRecord] = &[
    CityRecord::new("Mumbai", 1.4, CityTier::Tier1, Region::West),
    CityRecord::new("Delhi", 1.3, CityTier::Tier1, Region::North),
    CityRecord::new("Bangalore", 1.3, CityTier::Tier1, Region::South),
    CityRecord::new("Bengaluru", 1.3, CityTier::Tier1, Region::South),
    CityRecord::new("Gurgaon", 1.3, CityTier::Tier1, Region::North),
    CityRecord::new("Pune", 1.15, CityTier::Tier1, Region::West),
    CityRecord::new("Chennai", 1.15, CityTier::Tier1, Region::South),
    CityRecord::new("Hyderabad", 1.1, CityTier::Tier1, Region::South),
    CityRecord::new("Noida", 1.1, CityTier::Tier1, Region::North),
    CityRecord::new("Kolkata", 1.0, CityTier::Tier1, Region::East),
    CityRecord::new("Ahmedabad", 0.95, CityTier::Tier2, Region::West),
    CityRecord::new("Chandigarh", 0.95, CityTier::Tier2, Region::North),
    CityRecord::new("Kochi", 0.9, CityTier::Tier2, Region::South),
    CityRecord::new("Jaipur", 0.85, CityTier::Tier2, Region::North),
    CityRecord::new("Coimbatore", 0.85, CityTier::Tier2, Region::South),
    CityRecord::new("Indore", 0.8, CityTier::Tier2, Region::Central),
    CityRecord::new("Bhubaneswar", 0.75, CityTier::Tier3, Region::East),
];

/// Profession income multipliers, matched by substring in this order
const PROFESSIONS: &[(&str, f64)] = &[
    ("software", 1.8),
    ("engineer", 1.5),
    ("doctor", 2.0),
    ("lawyer", 1.6),
    ("consultant", 1.5),
    ("manager", 1.4),
    ("banker", 1.3),
    ("designer", 1.1),
    ("government", 0.9),
    ("teacher", 0.7),
];

/// Cost-of-living derived figures for a user in a city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationInsights {
    pub city: CityRecord,
    pub cost_of_living: f64,
    pub affordability_ratio: f64,
    pub savings_target_percent: f64,
    pub recommendations: Vec<Recommendation>,
}

/// Where a user's income sits among peers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerContext {
    pub expected_income: f64,
    pub band_low: f64,
    pub band_high: f64,
    pub profession_multiplier: f64,
    /// Clamped to [5, 95]
    pub percentile: f64,
}

/// Savings target (percent) banded by affordability ratio
pub fn savings_target_for_ratio(affordability_ratio: f64) -> f64 {
    if affordability_ratio < 1.5 {
        15.0
    } else if affordability_ratio < 2.5 {
        20.0
    } else if affordability_ratio < 4.0 {
        25.0
    } else {
        30.0
    }
}

/// Profession income multiplier; unknown professions are 1.0
pub fn profession_multiplier(profession: &str) -> f64 {
    let profession = profession.to_lowercase();
    PROFESSIONS
        .iter()
        .find(|(key, _)| profession.contains(key))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocationAdjuster;

impl LocationAdjuster {
    pub fn new() -> Self {
        Self
    }

    /// Known cities in match order
    pub fn cities(&self) -> &'static [CityRecord] {
        CITIES
    }

    /// Resolve free text to a city. Never fails: unmatched text gets `DEFAULT_CITY`,
    /// and text naming several cities resolves to the first in table order.
    pub fn resolve(&self, location: &str) -> CityRecord {
        let needle = location.to_lowercase();
        match CITIES
            .iter()
            .find(|city| needle.contains(&city.name.to_lowercase()))
        {
            Some(city) => *city,
            None => {
                if !location.trim().is_empty() {
                    tracing::debug!(location, "Location not in city table, using default");
                }
                DEFAULT_CITY
            }
        }
    }

    pub fn compute_insights(&self, city: CityRecord, monthly_income: f64) -> LocationInsights {
        let monthly_income = sanitize(monthly_income);
        let cost_of_living = BASELINE_MONTHLY_COST * city.cost_multiplier;
        let affordability_ratio = monthly_income / cost_of_living;
        let savings_target_percent = savings_target_for_ratio(affordability_ratio);

        let detail = || RecommendationDetail::Location {
            city: city.name.to_string(),
            cost_multiplier: city.cost_multiplier,
            affordability_ratio,
        };

        let mut recommendations = Vec::new();

        if city.cost_multiplier > METRO_MULTIPLIER {
            recommendations.push(Rule::MetroBudgeting.recommend(
                Priority::High,
                format!(
                    "Living costs in {} run about {}/month ({:.0}% above baseline); aim to save {:.0}%",
                    city.name,
                    format_inr(cost_of_living),
                    (city.cost_multiplier - 1.0) * 100.0,
                    savings_target_percent
                ),
                0.85,
                detail(),
            ));
            recommendations.push(Rule::RealEstateStrategy.recommend(
                Priority::Medium,
                format!(
                    "At an affordability ratio of {:.1}, renting keeps {} more liquid each month than an EMI",
                    affordability_ratio,
                    format_inr(cost_of_living * 0.1)
                ),
                0.7,
                detail(),
            ));
        }

        if city.tier == CityTier::Tier2 && affordability_ratio > TIER2_ADVANTAGE_RATIO {
            recommendations.push(Rule::Tier2Advantage.recommend(
                Priority::Medium,
                format!(
                    "Your income is {:.1}x local costs; investing the surplus could reach {}/month",
                    affordability_ratio,
                    format_inr(monthly_income - cost_of_living)
                ),
                0.8,
                detail(),
            ));
        }

        if city.region == Region::South {
            recommendations.push(Rule::RegionalInvestment.recommend(
                Priority::Low,
                "Sovereign gold bonds pay 2.5% interest on top of gold price gains".to_string(),
                0.6,
                detail(),
            ));
        }

        tracing::debug!(
            city = city.name,
            affordability_ratio,
            count = recommendations.len(),
            "Location insights computed"
        );

        LocationInsights {
            city,
            cost_of_living,
            affordability_ratio,
            savings_target_percent,
            recommendations,
        }
    }

    pub fn peer_context(&self, city: CityRecord, profession: &str, monthly_income: f64) -> PeerContext {
        let profession_multiplier = profession_multiplier(profession);
        let expected_income =
            BASELINE_MONTHLY_COST * city.tier.income_multiplier() * profession_multiplier;
        let percentile =
            (sanitize(monthly_income) / expected_income * 50.0 + 25.0).clamp(5.0, 95.0);

        PeerContext {
            expected_income,
            band_low: expected_income * 0.8,
            band_high: expected_income * 1.2,
            profession_multiplier,
            percentile,
        }
    }
}
