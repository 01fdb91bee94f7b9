use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UsState {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NaicsPreset {
    pub industry: &'static str,
    pub codes: &'static [i32],
}

pub fn is_valid_naics(code: &str) -> bool {
    (2..=6).contains(&code.len()) && code.chars().all(|c| c.is_ascii_digit())
}

pub fn format_naics(code: &str) -> Option<i32> {
    let code = code.trim();
    if !is_valid_naics(code) {
        return None;
    }
    code.parse().ok()
}

/// Pulls NAICS codes out of free text such as `"541110, 541211; 5413"`.
/// Invalid parts are dropped and duplicates keep their first position.
pub fn parse_naics_input(input: &str) -> Vec<i32> {
    input
        .split(|c: char| c == ',' || c == ';' || c == '|' || c.is_whitespace())
        .filter_map(format_naics)
        .unique()
        .collect()
}

pub fn is_valid_state_code(code: &str) -> bool {
    let code = code.to_uppercase();
    US_STATES.iter().any(|state| state.code == code)
}

pub fn is_valid_zip_code(zip: &str) -> bool {
    zip.len() == 5 && zip.chars().all(|c| c.is_ascii_digit())
}

pub const US_STATES: [UsState; 51] = [
    UsState { code: "AL", name: "Alabama" },
    UsState { code: "AK", name: "Alaska" },
    UsState { code: "AZ", name: "Arizona" },
    UsState { code: "AR", name: "Arkansas" },
    UsState { code: "CA", name: "California" },
    UsState { code: "CO", name: "Colorado" },
    UsState { code: "CT", name: "Connecticut" },
    UsState { code: "DE", name: "Delaware" },
    UsState { code: "FL", name: "Florida" },
    UsState { code: "GA", name: "Georgia" },
    UsState { code: "HI", name: "Hawaii" },
    UsState { code: "ID", name: "Idaho" },
    UsState { code: "IL", name: "Illinois" },
    UsState { code: "IN", name: "Indiana" },
    UsState { code: "IA", name: "Iowa" },
    UsState { code: "KS", name: "Kansas" },
    UsState { code: "KY", name: "Kentucky" },
    UsState { code: "LA", name: "Louisiana" },
    UsState { code: "ME", name: "Maine" },
    UsState { code: "MD", name: "Maryland" },
    UsState { code: "MA", name: "Massachusetts" },
    UsState { code: "MI", name: "Michigan" },
    UsState { code: "MN", name: "Minnesota" },
    UsState { code: "MS", name: "Mississippi" },
    UsState { code: "MO", name: "Missouri" },
    UsState { code: "MT", name: "Montana" },
    UsState { code: "NE", name: "Nebraska" },
    UsState { code: "NV", name: "Nevada" },
    UsState { code: "NH", name: "New Hampshire" },
    UsState { code: "NJ", name: "New Jersey" },
    UsState { code: "NM", name: "New Mexico" },
    UsState { code: "NY", name: "New York" },
    UsState { code: "NC", name: "North Carolina" },
    UsState { code: "ND", name: "North Dakota" },
    UsState { code: "OH", name: "Ohio" },
    UsState { code: "OK", name: "Oklahoma" },
    UsState { code: "OR", name: "Oregon" },
    UsState { code: "PA", name: "Pennsylvania" },
    UsState { code: "RI", name: "Rhode Island" },
    UsState { code: "SC", name: "South Carolina" },
    UsState { code: "SD", name: "South Dakota" },
    UsState { code: "TN", name: "Tennessee" },
    UsState { code: "TX", name: "Texas" },
    UsState { code: "UT", name: "Utah" },
    UsState { code: "VT", name: "Vermont" },
    UsState { code: "VA", name: "Virginia" },
    UsState { code: "WA", name: "Washington" },
    UsState { code: "WV", name: "West Virginia" },
    UsState { code: "WI", name: "Wisconsin" },
    UsState { code: "WY", name: "Wyoming" },
    UsState { code: "DC", name: "District of Columbia" },
];

pub const POPULAR_NAICS: [NaicsPreset; 8] = [
    NaicsPreset {
        industry: "Steel Manufacturing",
        codes: &[331110, 331210, 332312, 332111, 423510],
    },
    NaicsPreset {
        industry: "Restaurants",
        codes: &[722511, 722513, 722514],
    },
    NaicsPreset {
        industry: "Retail",
        codes: &[445110, 446110, 448140, 452311],
    },
    NaicsPreset {
        industry: "Construction",
        codes: &[236115, 236116, 236117, 236118, 238110],
    },
    NaicsPreset {
        industry: "Healthcare",
        codes: &[621111, 621112, 621210, 621310, 623110],
    },
    NaicsPreset {
        industry: "Technology",
        codes: &[541511, 541512, 541519, 518210],
    },
    NaicsPreset {
        industry: "Manufacturing",
        codes: &[332710, 333111, 333120, 334111, 335311],
    },
    NaicsPreset {
        industry: "Professional Services",
        codes: &[541110, 541211, 541330, 541380, 541990],
    },
];
