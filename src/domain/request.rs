use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

use super::params::{NormalizedParams, RawParams, ZipRangeDefault};

const MAX_ZIP_CODE: i64 = 99_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationType {
    State,
    ZipCode,
}

/// Forms send the location as text, the chat model usually as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationValue {
    Number(i64),
    Text(String),
}

impl LocationValue {
    fn is_blank(&self) -> bool {
        match self {
            LocationValue::Number(n) => *n == 0,
            LocationValue::Text(s) => s.trim().is_empty(),
        }
    }

    fn as_text(&self) -> String {
        match self {
            LocationValue::Number(n) => n.to_string(),
            LocationValue::Text(s) => s.clone(),
        }
    }

    pub fn as_zip_code(&self) -> Result<i32, AnalysisError> {
        let zip = match self {
            LocationValue::Number(n) => *n,
            LocationValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| AnalysisError::validation(format!("Invalid ZIP code: {}", s)))?,
        };

        if !(1..=MAX_ZIP_CODE).contains(&zip) {
            return Err(AnalysisError::validation(format!(
                "ZIP code must be at most 5 digits, got {}",
                zip
            )));
        }

        // Bounded above, always fits
        Ok(zip as i32)
    }
}

/// Where the caller wants to look, after picking apart `{type, value}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    State(String),
    Zip(i32),
}

impl Location {
    pub fn state(&self) -> Option<&str> {
        match self {
            Location::State(code) => Some(code),
            Location::Zip(_) => None,
        }
    }

    pub fn zip_code(&self) -> Option<i32> {
        match self {
            Location::State(_) => None,
            Location::Zip(zip) => Some(*zip),
        }
    }

    /// Location for callers that pass state and zip as separate optional fields.
    pub fn from_parts(
        state: Option<&str>,
        zip_code: Option<&LocationValue>,
    ) -> Result<Self, AnalysisError> {
        let state = state.map(str::trim).filter(|s| !s.is_empty());
        let zip_code = zip_code.filter(|z| !z.is_blank());

        match (state, zip_code) {
            (Some(_), Some(_)) => Err(AnalysisError::validation(
                "Use either state or zipCode, never both",
            )),
            (Some(state), None) => Ok(Location::State(state.to_string())),
            (None, Some(zip)) => Ok(Location::Zip(zip.as_zip_code()?)),
            (None, None) => Err(AnalysisError::validation(
                "Either state or zipCode must be provided",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    #[serde(rename = "type")]
    pub location_type: Option<LocationType>,
    pub value: Option<LocationValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_range: Option<i32>,
}

impl LocationInput {
    pub fn resolve(&self) -> Result<Location, AnalysisError> {
        let (location_type, value) = match (self.location_type, &self.value) {
            (Some(location_type), Some(value)) if !value.is_blank() => (location_type, value),
            _ => return Err(AnalysisError::validation("Location information is required")),
        };

        match location_type {
            LocationType::State => Ok(Location::State(value.as_text())),
            LocationType::ZipCode => Ok(Location::Zip(value.as_zip_code()?)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    pub top_n: Option<i32>,
    pub employee_count: Option<i32>,
}

/// Body of `POST /api/analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub naics_codes: Vec<i32>,
    pub location: Option<LocationInput>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn normalize(&self) -> Result<NormalizedParams, AnalysisError> {
        if self.naics_codes.is_empty() {
            return Err(AnalysisError::validation("NAICS codes are required"));
        }

        let location_input = self
            .location
            .as_ref()
            .ok_or_else(|| AnalysisError::validation("Location information is required"))?;

        RawParams {
            naics_codes: self.naics_codes.clone(),
            location: location_input.resolve()?,
            zip_range: location_input.zip_range,
            top_n: self.options.top_n,
            employee_count: self.options.employee_count,
        }
        .normalize(ZipRangeDefault::Areal)
    }
}
