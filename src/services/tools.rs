//! The five tools the chat model may call.
//!
//! Every call is handled as an independent request: the model may call any
//! tool, in any order, any number of times.

use async_openai::{
    error::OpenAIError,
    types::{
        ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType, FunctionObjectArgs,
    },
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    domain::{
        chat::ToolOutcome,
        competitive::{CompetitiveQuery, CompetitiveTarget},
        params::{
            NormalizedParams, RawParams, ZipRangeDefault, AREAL_ZIP_RANGE, DEFAULT_EMPLOYEE_COUNT,
            DEFAULT_TOP_N, DIRECT_ZIP_RANGE,
        },
        request::{Location, LocationValue},
    },
    error::AnalysisError,
};

use super::{analysis, backend::AnalysisBackend};

pub const GET_LOAN_STATISTICS: &str = "getLoanStatistics";
pub const GET_TOP_BANKS: &str = "getTopBanks";
pub const RUN_FULL_ANALYSIS: &str = "runFullAnalysis";
pub const GET_COMPETITIVE_LANDSCAPE_ZIP: &str = "getCompetitiveLandscapeZip";
pub const GET_COMPETITIVE_LANDSCAPE_STATE: &str = "getCompetitiveLandscapeState";

fn areal_zip_range() -> i32 {
    AREAL_ZIP_RANGE
}

fn direct_zip_range() -> i32 {
    DIRECT_ZIP_RANGE
}

fn default_top_n() -> i32 {
    DEFAULT_TOP_N
}

fn default_employee_count() -> i32 {
    DEFAULT_EMPLOYEE_COUNT
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStatisticsArgs {
    pub naics_codes: Vec<i32>,
    pub state: Option<String>,
    pub zip_code: Option<LocationValue>,
    #[serde(default = "areal_zip_range")]
    pub zip_range: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBanksArgs {
    pub naics_codes: Vec<i32>,
    pub state: Option<String>,
    pub zip_code: Option<LocationValue>,
    #[serde(default = "areal_zip_range")]
    pub zip_range: i32,
    #[serde(default = "default_top_n")]
    pub top_n: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysisArgs {
    pub naics_codes: Vec<i32>,
    pub state: Option<String>,
    pub zip_code: Option<LocationValue>,
    /// 0 keeps the query on the zip itself, which is what enables competitive data.
    #[serde(default = "direct_zip_range")]
    pub zip_range: i32,
    #[serde(default = "default_top_n")]
    pub top_n: i32,
    #[serde(default = "default_employee_count")]
    pub employee_count: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveZipArgs {
    pub zip_code: String,
    pub naics_code: String,
    #[serde(default = "default_employee_count")]
    pub employee_count: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveStateArgs {
    pub state_code: String,
    pub naics_code: String,
    #[serde(default = "default_employee_count")]
    pub employee_count: i32,
}

#[derive(Debug, Clone)]
pub enum ToolCall {
    LoanStatistics(LoanStatisticsArgs),
    TopBanks(TopBanksArgs),
    FullAnalysis(FullAnalysisArgs),
    CompetitiveZip(CompetitiveZipArgs),
    CompetitiveState(CompetitiveStateArgs),
}

fn parse_args<T: DeserializeOwned>(name: &str, arguments: &Value) -> Result<T, AnalysisError> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| AnalysisError::validation(format!("Invalid arguments for {}: {}", name, e)))
}

fn normalize(
    naics_codes: Vec<i32>,
    state: Option<&str>,
    zip_code: Option<&LocationValue>,
    zip_range: i32,
    top_n: Option<i32>,
    employee_count: Option<i32>,
    default_range: ZipRangeDefault,
) -> Result<NormalizedParams, AnalysisError> {
    if naics_codes.is_empty() {
        return Err(AnalysisError::validation("NAICS codes are required"));
    }

    RawParams {
        naics_codes,
        location: Location::from_parts(state, zip_code)?,
        zip_range: Some(zip_range),
        top_n,
        employee_count,
    }
    .normalize(default_range)
}

fn encode<T: Serialize>(tool: &str, value: &T) -> Result<Value, AnalysisError> {
    serde_json::to_value(value)
        .map_err(|e| AnalysisError::Agent(format!("Could not encode {} result: {}", tool, e)))
}

impl ToolCall {
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, AnalysisError> {
        match name {
            GET_LOAN_STATISTICS => Ok(ToolCall::LoanStatistics(parse_args(name, arguments)?)),
            GET_TOP_BANKS => Ok(ToolCall::TopBanks(parse_args(name, arguments)?)),
            RUN_FULL_ANALYSIS => Ok(ToolCall::FullAnalysis(parse_args(name, arguments)?)),
            GET_COMPETITIVE_LANDSCAPE_ZIP => {
                Ok(ToolCall::CompetitiveZip(parse_args(name, arguments)?))
            }
            GET_COMPETITIVE_LANDSCAPE_STATE => {
                Ok(ToolCall::CompetitiveState(parse_args(name, arguments)?))
            }
            _ => Err(AnalysisError::validation(format!("Unknown tool: {}", name))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::LoanStatistics(_) => GET_LOAN_STATISTICS,
            ToolCall::TopBanks(_) => GET_TOP_BANKS,
            ToolCall::FullAnalysis(_) => RUN_FULL_ANALYSIS,
            ToolCall::CompetitiveZip(_) => GET_COMPETITIVE_LANDSCAPE_ZIP,
            ToolCall::CompetitiveState(_) => GET_COMPETITIVE_LANDSCAPE_STATE,
        }
    }

    pub async fn execute(self, backend: &dyn AnalysisBackend) -> Result<Value, AnalysisError> {
        let name = self.name();

        match self {
            ToolCall::LoanStatistics(args) => {
                let params = normalize(
                    args.naics_codes,
                    args.state.as_deref(),
                    args.zip_code.as_ref(),
                    args.zip_range,
                    None,
                    None,
                    ZipRangeDefault::Areal,
                )?;
                let statistics =
                    analysis::get_loan_statistics(backend, &params.loan_query()).await?;
                encode(name, &statistics)
            }
            ToolCall::TopBanks(args) => {
                let params = normalize(
                    args.naics_codes,
                    args.state.as_deref(),
                    args.zip_code.as_ref(),
                    args.zip_range,
                    Some(args.top_n),
                    None,
                    ZipRangeDefault::Areal,
                )?;
                let banks = backend.top_banks(&params.loan_query(), params.top_n).await?;
                encode(name, &banks)
            }
            ToolCall::FullAnalysis(args) => {
                let params = normalize(
                    args.naics_codes,
                    args.state.as_deref(),
                    args.zip_code.as_ref(),
                    args.zip_range,
                    Some(args.top_n),
                    Some(args.employee_count),
                    ZipRangeDefault::DirectZip,
                )?;
                let results = analysis::run_full_analysis(backend, &params).await?;
                encode(name, &results)
            }
            ToolCall::CompetitiveZip(args) => {
                let query = CompetitiveQuery {
                    target: CompetitiveTarget::Zip(args.zip_code.trim().to_string()),
                    naics_code: args.naics_code.trim().to_string(),
                    employee_count: args.employee_count,
                };
                let landscape = backend.competitive_landscape(&query).await?;
                encode(name, &landscape)
            }
            ToolCall::CompetitiveState(args) => {
                let query = CompetitiveQuery {
                    target: CompetitiveTarget::State(args.state_code.trim().to_uppercase()),
                    naics_code: args.naics_code.trim().to_string(),
                    employee_count: args.employee_count,
                };
                let landscape = backend.competitive_landscape(&query).await?;
                encode(name, &landscape)
            }
        }
    }
}

/// Runs one model-issued tool call. Failures become part of the outcome, never an `Err`.
pub async fn dispatch(backend: &dyn AnalysisBackend, name: &str, arguments: &str) -> ToolOutcome {
    let arguments: Value =
        serde_json::from_str(arguments).unwrap_or_else(|_| Value::String(arguments.to_string()));

    let result = match ToolCall::parse(name, &arguments) {
        Ok(call) => call.execute(backend).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => ToolOutcome::success(name, arguments, output),
        Err(e) => {
            log::warn!("Tool {} failed: {}", name, e);
            ToolOutcome::failure(name, arguments, e.to_string())
        }
    }
}

fn location_properties() -> Value {
    json!({
        "naicsCodes": {
            "type": "array",
            "items": {"type": "integer"},
            "description": "NAICS codes or prefixes, e.g. [331110, 331210]"
        },
        "state": {
            "type": "string",
            "description": "Two-letter state code (e.g. \"TX\"). Use state OR zipCode, never both."
        },
        "zipCode": {
            "type": "integer",
            "description": "5-digit ZIP code. Use state OR zipCode, never both."
        }
    })
}

fn function_tool(
    name: &str,
    description: &str,
    parameters: Value,
) -> Result<ChatCompletionTool, OpenAIError> {
    ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name(name)
                .description(description)
                .parameters(parameters)
                .build()?,
        )
        .build()
}

/// JSON schemas advertised to the model.
pub fn tool_definitions() -> Result<Vec<ChatCompletionTool>, OpenAIError> {
    let with_location = |extra: Value| {
        let mut properties = location_properties();
        if let (Some(properties), Some(extra)) = (properties.as_object_mut(), extra.as_object()) {
            properties.extend(extra.clone());
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": ["naicsCodes"]
        })
    };

    let zip_range = |default: i32, description: &str| {
        json!({"type": "integer", "default": default, "description": description})
    };
    let top_n = json!({
        "type": "integer",
        "default": DEFAULT_TOP_N,
        "description": "Number of top banks to return"
    });
    let employee_count = json!({
        "type": "integer",
        "default": DEFAULT_EMPLOYEE_COUNT,
        "description": "Company employee count for competitive positioning"
    });
    let naics_code = json!({
        "type": "string",
        "minLength": 2,
        "maxLength": 6,
        "description": "NAICS code of 2-6 digits, usually the first 4 digits of the first analysed code (e.g. \"5413\")"
    });

    Ok(vec![
        function_tool(
            GET_LOAN_STATISTICS,
            "Loan statistics (default rates, secondary market sales, risk premium, jobs supported, inflation adjusted amounts) for NAICS codes in a state or around a ZIP code.",
            with_location(json!({
                "zipRange": zip_range(AREAL_ZIP_RANGE, "Miles around the ZIP code")
            })),
        )?,
        function_tool(
            GET_TOP_BANKS,
            "Top lenders by loan volume for NAICS codes in a state or around a ZIP code, overall and by processing method with addresses.",
            with_location(json!({
                "zipRange": zip_range(AREAL_ZIP_RANGE, "Miles around the ZIP code"),
                "topN": top_n
            })),
        )?,
        function_tool(
            RUN_FULL_ANALYSIS,
            "Primary tool. Loan statistics, top banks and, when applicable, the competitive landscape in one call with identical parameters. States always include the competitive landscape; ZIP codes include it when zipRange is 0.",
            with_location(json!({
                "zipRange": zip_range(
                    DIRECT_ZIP_RANGE,
                    "Miles around the ZIP code. 0 queries the ZIP itself and enables the competitive landscape; 40 or more covers the nearby area"
                ),
                "topN": top_n,
                "employeeCount": employee_count
            })),
        )?,
        function_tool(
            GET_COMPETITIVE_LANDSCAPE_ZIP,
            "Competitive landscape for the county of a ZIP code: market concentration (HHI), entry barriers, firm size distribution, company positioning, location quotient, geographic comparison and payroll benchmarks.",
            json!({
                "type": "object",
                "properties": {
                    "zipCode": {"type": "string", "minLength": 5, "maxLength": 5, "description": "5-digit ZIP code, e.g. \"90001\""},
                    "naicsCode": naics_code,
                    "employeeCount": employee_count
                },
                "required": ["zipCode", "naicsCode"]
            }),
        )?,
        function_tool(
            GET_COMPETITIVE_LANDSCAPE_STATE,
            "State-wide competitive landscape aggregated over all counties, including the top 5 counties by employment. Use for statewide questions.",
            json!({
                "type": "object",
                "properties": {
                    "stateCode": {"type": "string", "minLength": 2, "maxLength": 2, "description": "Two-letter state code, e.g. \"TX\""},
                    "naicsCode": naics_code,
                    "employeeCount": employee_count
                },
                "required": ["stateCode", "naicsCode"]
            }),
        )?,
    ])
}
