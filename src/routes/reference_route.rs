use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{
    naics::{
        is_valid_state_code, is_valid_zip_code, parse_naics_input, POPULAR_NAICS, US_STATES,
    },
    request::LocationType,
};

#[get("/states")]
async fn states() -> HttpResponse {
    HttpResponse::Ok().json(&US_STATES[..])
}

#[get("/naics/presets")]
async fn naics_presets() -> HttpResponse {
    HttpResponse::Ok().json(&POPULAR_NAICS[..])
}

#[derive(Deserialize)]
struct ParseNaicsQuery {
    #[serde(default)]
    input: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParsedNaics {
    naics_codes: Vec<i32>,
}

#[get("/naics/parse")]
async fn parse_naics(query: web::Query<ParseNaicsQuery>) -> HttpResponse {
    HttpResponse::Ok().json(ParsedNaics {
        naics_codes: parse_naics_input(&query.input),
    })
}

#[derive(Deserialize)]
struct ValidateLocationQuery {
    #[serde(rename = "type")]
    location_type: LocationType,
    #[serde(default)]
    value: String,
}

#[derive(Serialize)]
struct LocationValidity {
    valid: bool,
}

#[get("/locations/validate")]
async fn validate_location(query: web::Query<ValidateLocationQuery>) -> HttpResponse {
    let value = query.value.trim();
    let valid = match query.location_type {
        LocationType::State => is_valid_state_code(value),
        LocationType::ZipCode => is_valid_zip_code(value),
    };

    HttpResponse::Ok().json(LocationValidity { valid })
}
