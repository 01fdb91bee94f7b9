//! Competitive landscape payloads as returned by the
//! `analyze_competitive_landscape_by_*` procedures. Keys stay snake_case on the
//! wire, the procedures define them.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// The procedure's answer, kept exactly as received so it reaches the caller
/// untouched, including keys this crate does not know about. Typed views are
/// read on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct CompetitiveLandscapeData(Map<String, Value>);

impl TryFrom<Map<String, Value>> for CompetitiveLandscapeData {
    type Error = String;

    fn try_from(payload: Map<String, Value>) -> Result<Self, Self::Error> {
        match payload.get("analysis") {
            Some(Value::Object(_)) => Ok(CompetitiveLandscapeData(payload)),
            _ => Err("competitive landscape payload has no analysis object".to_string()),
        }
    }
}

impl From<CompetitiveLandscapeData> for Map<String, Value> {
    fn from(data: CompetitiveLandscapeData) -> Self {
        data.0
    }
}

impl CompetitiveLandscapeData {
    pub fn payload(&self) -> &Map<String, Value> {
        &self.0
    }

    fn view<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
        value.and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn analysis(&self) -> Option<&Map<String, Value>> {
        self.0.get("analysis").and_then(Value::as_object)
    }

    /// Reason given by the procedure when it found nothing for the area.
    /// Present whenever `analysis.error` is set.
    pub fn unavailable_reason(&self) -> Option<&str> {
        let analysis = self.analysis()?;
        let error = analysis.get("error").filter(|e| !e.is_null())?;

        analysis
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .or(Some("no data"))
    }

    pub fn zip_info(&self) -> Option<ZipInfo> {
        Self::view(self.0.get("zip_info"))
    }

    pub fn state_info(&self) -> Option<StateInfo> {
        Self::view(self.0.get("state_info"))
    }

    /// The full analysis, when the procedure produced one in the known shape.
    pub fn market_analysis(&self) -> Option<MarketAnalysis> {
        if self.unavailable_reason().is_some() {
            return None;
        }
        Self::view(self.0.get("analysis"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub company_info: CompanyInfo,
    pub entry_barriers: EntryBarriers,
    pub payroll_analysis: PayrollAnalysis,
    pub size_distribution: SizeDistribution,
    pub workforce_analysis: WorkforceAnalysis,
    pub company_positioning: CompanyPositioning,
    pub industry_specificity: IndustrySpecificity,
    pub market_concentration: MarketConcentration,
    pub geographic_comparison: GeographicComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipInfo {
    pub zip_code: String,
    pub state: String,
    pub county: String,
    pub fips_state: String,
    pub fips_county: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateInfo {
    pub state_abbr: String,
    pub fips_state: String,
    pub naics_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub fips_state: String,
    pub naics_code: String,
    pub fips_county: String,
    pub employee_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryBarriers {
    pub avg_annual_pay: f64,
    pub labor_cost_barrier: String,
    pub large_firm_percentage: f64,
    pub weighted_avg_firm_size: f64,
    pub minimum_efficient_scale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollNoiseFlags {
    pub q1: String,
    pub annual: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollAnalysis {
    pub payroll_noise_flags: PayrollNoiseFlags,
    pub total_annual_payroll: f64,
    pub implied_annual_from_q1: f64,
    pub avg_q1_pay_per_employee: f64,
    pub avg_annual_pay_per_employee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBucket {
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeDistribution {
    pub micro_0_4: SizeBucket,
    pub small_5_19: SizeBucket,
    pub medium_20_99: SizeBucket,
    pub large_100_499: SizeBucket,
    pub very_large_500_plus: SizeBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceAnalysis {
    pub total_employees: i64,
    pub employee_noise_flag: String,
    pub total_establishments: i64,
    pub avg_employees_per_establishment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyPositioning {
    pub size_class: String,
    pub size_percentile: f64,
    pub market_share_by_employment: f64,
    pub peer_establishments_in_size_class: i64,
    pub larger_than_x_percent_of_competitors: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustrySpecificity {
    pub specialization: String,
    pub location_quotient: f64,
    pub county_share_of_state_industry: f64,
    pub local_share_of_broader_industry: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConcentration {
    pub market_type: String,
    pub estimated_hhi: f64,
    pub concentration_level: String,
    pub total_establishments: i64,
    pub small_firms_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyEmployment {
    pub employees: i64,
    pub fips_county: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicComparison {
    pub state_avg_employees: f64,
    pub state_total_counties: i64,
    pub state_avg_establishments: f64,
    pub target_county_rank_employees: i64,
    pub top_5_counties_by_employment: Vec<CountyEmployment>,
    pub target_county_rank_establishments: i64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn market_analysis_json() -> Value {
        json!({
            "company_info": {"fips_state": "48", "naics_code": "5411", "fips_county": "201", "employee_count": 25},
            "entry_barriers": {
                "avg_annual_pay": 98000.0,
                "labor_cost_barrier": "High",
                "large_firm_percentage": 4.2,
                "weighted_avg_firm_size": 17.5,
                "minimum_efficient_scale": "Low"
            },
            "payroll_analysis": {
                "payroll_noise_flags": {"q1": "G", "annual": "G"},
                "total_annual_payroll": 1250000000.0,
                "implied_annual_from_q1": 1240000000.0,
                "avg_q1_pay_per_employee": 24500.0,
                "avg_annual_pay_per_employee": 98000.0
            },
            "size_distribution": {
                "micro_0_4": {"count": 1800, "percentage": 62.1},
                "small_5_19": {"count": 780, "percentage": 26.9},
                "medium_20_99": {"count": 250, "percentage": 8.6},
                "large_100_499": {"count": 60, "percentage": 2.1},
                "very_large_500_plus": {"count": 9, "percentage": 0.3}
            },
            "workforce_analysis": {
                "total_employees": 12750,
                "employee_noise_flag": "G",
                "total_establishments": 2899,
                "avg_employees_per_establishment": 4.4
            },
            "company_positioning": {
                "size_class": "20-99",
                "size_percentile": 91.0,
                "market_share_by_employment": 0.2,
                "peer_establishments_in_size_class": 250,
                "larger_than_x_percent_of_competitors": 89.0
            },
            "industry_specificity": {
                "specialization": "Average",
                "location_quotient": 1.04,
                "county_share_of_state_industry": 18.3,
                "local_share_of_broader_industry": 22.0
            },
            "market_concentration": {
                "market_type": "Fragmented",
                "estimated_hhi": 310.0,
                "concentration_level": "Unconcentrated",
                "total_establishments": 2899,
                "small_firms_percentage": 89.0
            },
            "geographic_comparison": {
                "state_avg_employees": 1400.0,
                "state_total_counties": 254,
                "state_avg_establishments": 220.0,
                "target_county_rank_employees": 1,
                "top_5_counties_by_employment": [
                    {"employees": 12750, "fips_county": 201},
                    {"employees": 11020, "fips_county": 113}
                ],
                "target_county_rank_establishments": 1
            }
        })
    }

    pub fn zip_landscape_json(zip: &str) -> Value {
        json!({
            "zip_info": {"zip_code": zip, "state": "TX", "county": "Harris", "fips_state": "48", "fips_county": "201"},
            "analysis": market_analysis_json()
        })
    }

    pub fn state_landscape_json(state: &str) -> Value {
        json!({
            "state_info": {"state_abbr": state, "fips_state": "48", "naics_code": "5411"},
            "analysis": market_analysis_json()
        })
    }

    pub fn no_data_landscape_json(zip: &str) -> Value {
        json!({
            "zip_info": {"zip_code": zip, "state": "CA", "county": "Los Angeles", "fips_state": "06", "fips_county": "037"},
            "analysis": {
                "error": "No data found",
                "message": "No establishments for this NAICS code in the county",
                "company_info": {
                    "fips_state": "06",
                    "naics_code": "5411",
                    "fips_county": null,
                    "employee_count": 25
                }
            },
            "source": "qcew"
        })
    }
}
