use crate::client::{congress_adapter, fred_adapter, treasury_adapter};
use crate::tools::congress::{
    BillKey, BillTypeKey, ChamberKey, CommitteeKey, CongressChamberKey, CongressKey,
    CongressStateDistrictKey, MemberKey, StateDistrictKey, StateKey,
};
use crate::tools::fred::ReleaseSeriesKey;
use crate::{Config, CongressTools, FredTools, Result, TreasuryTools};
use rmcp::{
    model::*,
    service::{RequestContext, RoleServer},
    ErrorData, ServerHandler,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::{future::Future, sync::Arc};
use tracing::{info, instrument};

const INSTRUCTIONS: &str = "An MCP server for U.S. government data. Provides tools to query \
legislative data from Congress.gov, treasury accounting data from Fiscal Data, and economic \
series from FRED.";

/// Main MCP server handler. The three API adapters are constructed once
/// here and shared across every tool call for the life of the process.
#[derive(Debug, Clone)]
pub struct GovDataHandler {
    congress: CongressTools,
    treasury: TreasuryTools,
    fred: FredTools,
}

impl GovDataHandler {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Initializing gov-data MCP server handler");

        let congress = CongressTools::new(Arc::new(congress_adapter(&config.congress)?));
        let treasury = TreasuryTools::new(Arc::new(treasury_adapter(&config.treasury)?));
        let fred = FredTools::new(Arc::new(fred_adapter(&config.fred)?));

        Ok(Self {
            congress,
            treasury,
            fred,
        })
    }

    /// The full tool catalog advertised to clients.
    fn catalog() -> Vec<Tool> {
        vec![
            // Bills
            tool("get_bills", "Get recent bills from Congress.gov."),
            tool_with::<CongressKey>(
                "get_bills_by_congress",
                "Get bills filtered by congress number.",
            ),
            tool_with::<BillTypeKey>(
                "get_bills_by_congress_and_type",
                "Get bills filtered by congress number and bill type.",
            ),
            tool_with::<BillKey>("get_bill_details", "Get details of a specific bill."),
            tool_with::<BillKey>("get_bill_actions", "Get actions of a specific bill."),
            tool_with::<BillKey>("get_bill_amendments", "Get amendments of a specific bill."),
            tool_with::<BillKey>(
                "get_bill_committees",
                "Get committees associated with a specific bill.",
            ),
            tool_with::<BillKey>("get_bill_cosponsors", "Get cosponsors of a specific bill."),
            tool_with::<BillKey>("get_bill_related", "Get related bills to a specific bill."),
            tool_with::<BillKey>(
                "get_bill_subjects",
                "Get legislative subjects of a specific bill.",
            ),
            tool_with::<BillKey>("get_bill_summaries", "Get summaries of a specific bill."),
            tool_with::<BillKey>("get_bill_text", "Get text versions of a specific bill."),
            tool_with::<BillKey>("get_bill_titles", "Get titles of a specific bill."),
            // Congresses
            tool(
                "get_all_congresses",
                "Get a list of all congresses and congressional sessions.",
            ),
            tool_with::<CongressKey>(
                "get_congress_details",
                "Get detailed information about a specific congress.",
            ),
            tool(
                "get_current_congress",
                "Get detailed information about the current congress.",
            ),
            // Members
            tool("get_all_members", "Get a list of all congressional members."),
            tool_with::<MemberKey>(
                "get_member_details",
                "Get detailed information for a specific congressional member.",
            ),
            tool_with::<MemberKey>(
                "get_member_sponsored_legislation",
                "Get the list of legislation sponsored by a specified congressional member.",
            ),
            tool_with::<MemberKey>(
                "get_member_cosponsored_legislation",
                "Get the list of legislation cosponsored by a specified congressional member.",
            ),
            tool_with::<CongressKey>(
                "get_members_by_congress",
                "Get a list of members in a specific congressional session.",
            ),
            tool_with::<StateKey>(
                "get_members_by_state",
                "Get a list of members filtered by state.",
            ),
            tool_with::<StateDistrictKey>(
                "get_members_by_state_and_district",
                "Get a list of members filtered by state and district.",
            ),
            tool_with::<CongressStateDistrictKey>(
                "get_members_by_congress_state_and_district",
                "Get a list of members filtered by congress, state, and district.",
            ),
            // Committees
            tool(
                "get_all_committees",
                "Get a list of all congressional committees.",
            ),
            tool_with::<ChamberKey>(
                "get_committees_by_chamber",
                "Get a list of congressional committees filtered by chamber.",
            ),
            tool_with::<CongressKey>(
                "get_committees_by_congress",
                "Get a list of congressional committees filtered by congress.",
            ),
            tool_with::<CongressChamberKey>(
                "get_committees_by_congress_and_chamber",
                "Get a list of congressional committees filtered by congress and chamber.",
            ),
            tool_with::<CommitteeKey>(
                "get_committee_details",
                "Get detailed information about a specific congressional committee.",
            ),
            tool_with::<CommitteeKey>(
                "get_committee_bills",
                "Get a list of legislation associated with a specified congressional committee.",
            ),
            tool_with::<CommitteeKey>(
                "get_committee_reports",
                "Get a list of committee reports associated with a specified congressional committee.",
            ),
            tool_with::<CommitteeKey>(
                "get_committee_nominations",
                "Get a list of nominations associated with a specified congressional committee.",
            ),
            tool_with::<CommitteeKey>(
                "get_committee_house_communications",
                "Get a list of House communications associated with a specified congressional committee.",
            ),
            tool_with::<CommitteeKey>(
                "get_committee_senate_communications",
                "Get a list of Senate communications associated with a specified congressional committee.",
            ),
            // Treasury
            tool(
                "get_debt_outstanding",
                "Get info about outstanding debt. Updated once per fiscal year.",
            ),
            tool(
                "get_outstanding_gold_reserves",
                "Get info about outstanding gold reserves.",
            ),
            tool(
                "get_daily_treasury_statement",
                "Get the Treasury General Account balance, rounded to the nearest million.",
            ),
            tool(
                "get_daily_treasury_operating_cash_activities",
                "Get deposits and withdrawals from the Treasury General Account, rounded to the nearest million.",
            ),
            tool(
                "get_public_debt_transactions",
                "Get issues and redemptions of marketable and nonmarketable securities, rounded to the nearest million.",
            ),
            // FRED
            tool(
                "get_fred_data_releases",
                "Get all releases of economic data from the Federal Reserve Bank of St. Louis.",
            ),
            tool_with::<ReleaseSeriesKey>(
                "get_fred_release_series",
                "Get the series on a release of economic data from the Federal Reserve Bank of St. Louis.",
            ),
        ]
    }
}

impl ServerHandler for GovDataHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, request, context))]
    fn initialize(
        &self,
        request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<InitializeResult, ErrorData>> + Send + '_ {
        info!("MCP server initializing");

        async move {
            if context.peer.peer_info().is_none() {
                context.peer.set_peer_info(request);
            }

            Ok(InitializeResult {
                protocol_version: ProtocolVersion::default(),
                capabilities: ServerCapabilities::builder().enable_tools().build(),
                server_info: Implementation {
                    name: env!("CARGO_PKG_NAME").into(),
                    version: env!("CARGO_PKG_VERSION").into(),
                },
                instructions: Some(INSTRUCTIONS.into()),
            })
        }
    }

    #[instrument(skip(self, _request, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_ {
        info!("Listing available tools");

        async move {
            Ok(ListToolsResult {
                tools: Self::catalog(),
                next_cursor: None,
            })
        }
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_ {
        info!("Tool called: {}", request.name);

        let handler = self.clone();

        async move {
            let args = request.arguments;
            let text = match request.name.as_ref() {
                // Bills
                "get_bills" => handler.congress.bills().await,
                "get_bills_by_congress" => {
                    handler.congress.bills_by_congress(&parse(args)?).await
                }
                "get_bills_by_congress_and_type" => {
                    handler
                        .congress
                        .bills_by_congress_and_type(&parse(args)?)
                        .await
                }
                "get_bill_details" => handler.congress.bill_details(&parse(args)?).await,
                "get_bill_actions" => handler.congress.bill_actions(&parse(args)?).await,
                "get_bill_amendments" => handler.congress.bill_amendments(&parse(args)?).await,
                "get_bill_committees" => handler.congress.bill_committees(&parse(args)?).await,
                "get_bill_cosponsors" => handler.congress.bill_cosponsors(&parse(args)?).await,
                "get_bill_related" => handler.congress.bill_related(&parse(args)?).await,
                "get_bill_subjects" => handler.congress.bill_subjects(&parse(args)?).await,
                "get_bill_summaries" => handler.congress.bill_summaries(&parse(args)?).await,
                "get_bill_text" => handler.congress.bill_text(&parse(args)?).await,
                "get_bill_titles" => handler.congress.bill_titles(&parse(args)?).await,
                // Congresses
                "get_all_congresses" => handler.congress.all_congresses().await,
                "get_congress_details" => handler.congress.congress_details(&parse(args)?).await,
                "get_current_congress" => handler.congress.current_congress().await,
                // Members
                "get_all_members" => handler.congress.all_members().await,
                "get_member_details" => handler.congress.member_details(&parse(args)?).await,
                "get_member_sponsored_legislation" => {
                    handler
                        .congress
                        .member_sponsored_legislation(&parse(args)?)
                        .await
                }
                "get_member_cosponsored_legislation" => {
                    handler
                        .congress
                        .member_cosponsored_legislation(&parse(args)?)
                        .await
                }
                "get_members_by_congress" => {
                    handler.congress.members_by_congress(&parse(args)?).await
                }
                "get_members_by_state" => handler.congress.members_by_state(&parse(args)?).await,
                "get_members_by_state_and_district" => {
                    handler
                        .congress
                        .members_by_state_and_district(&parse(args)?)
                        .await
                }
                "get_members_by_congress_state_and_district" => {
                    handler
                        .congress
                        .members_by_congress_state_and_district(&parse(args)?)
                        .await
                }
                // Committees
                "get_all_committees" => handler.congress.all_committees().await,
                "get_committees_by_chamber" => {
                    handler.congress.committees_by_chamber(&parse(args)?).await
                }
                "get_committees_by_congress" => {
                    handler.congress.committees_by_congress(&parse(args)?).await
                }
                "get_committees_by_congress_and_chamber" => {
                    handler
                        .congress
                        .committees_by_congress_and_chamber(&parse(args)?)
                        .await
                }
                "get_committee_details" => {
                    handler.congress.committee_details(&parse(args)?).await
                }
                "get_committee_bills" => handler.congress.committee_bills(&parse(args)?).await,
                "get_committee_reports" => {
                    handler.congress.committee_reports(&parse(args)?).await
                }
                "get_committee_nominations" => {
                    handler.congress.committee_nominations(&parse(args)?).await
                }
                "get_committee_house_communications" => {
                    handler
                        .congress
                        .committee_house_communications(&parse(args)?)
                        .await
                }
                "get_committee_senate_communications" => {
                    handler
                        .congress
                        .committee_senate_communications(&parse(args)?)
                        .await
                }
                // Treasury
                "get_debt_outstanding" => handler.treasury.debt_outstanding().await,
                "get_outstanding_gold_reserves" => handler.treasury.gold_reserves().await,
                "get_daily_treasury_statement" => {
                    handler.treasury.daily_treasury_statement().await
                }
                "get_daily_treasury_operating_cash_activities" => {
                    handler.treasury.operating_cash_activities().await
                }
                "get_public_debt_transactions" => {
                    handler.treasury.public_debt_transactions().await
                }
                // FRED
                "get_fred_data_releases" => handler.fred.data_releases().await,
                "get_fred_release_series" => handler.fred.release_series(&parse(args)?).await,
                other => {
                    return Err(ErrorData::invalid_request(
                        format!("Unknown tool: {other}"),
                        None,
                    ))
                }
            };

            Ok(CallToolResult {
                content: Some(vec![Content::text(text)]),
                structured_content: None,
                is_error: Some(false),
            })
        }
    }
}

/// Deserialize tool arguments into a typed input struct.
fn parse<T: DeserializeOwned>(
    args: Option<serde_json::Map<String, serde_json::Value>>,
) -> std::result::Result<T, ErrorData> {
    serde_json::from_value(serde_json::Value::Object(args.unwrap_or_default()))
        .map_err(|e| ErrorData::invalid_params(format!("Invalid tool input: {e}"), None))
}

/// A tool with no input arguments.
fn tool(name: &'static str, description: &'static str) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: Arc::new(empty_object_schema()),
        output_schema: None,
        annotations: None,
    }
}

/// A tool whose input schema is derived from `T`.
fn tool_with<T: JsonSchema>(name: &'static str, description: &'static str) -> Tool {
    let schema = serde_json::to_value(schemars::schema_for!(T))
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_else(empty_object_schema);
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: Arc::new(schema),
        output_schema: None,
        annotations: None,
    }
}

fn empty_object_schema() -> serde_json::Map<String, serde_json::Value> {
    let mut schema = serde_json::Map::new();
    schema.insert("type".to_string(), serde_json::Value::String("object".to_string()));
    schema.insert(
        "properties".to_string(),
        serde_json::Value::Object(serde_json::Map::new()),
    );
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn test_config() -> Arc<Config> {
        let mut config = Config::default();
        config.congress.api_key = Some("test-congress-key".to_string());
        config.fred.api_key = Some("test-fred-key".to_string());
        Arc::new(config)
    }

    #[test]
    fn test_handler_creation() {
        let handler = GovDataHandler::new(test_config());
        assert!(handler.is_ok());
    }

    #[test]
    fn test_handler_creation_fails_without_congress_key() {
        let mut config = Config::default();
        config.congress.api_key = None;
        config.fred.api_key = Some("test-fred-key".to_string());
        assert!(GovDataHandler::new(Arc::new(config)).is_err());
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let catalog = GovDataHandler::catalog();
        let names: HashSet<_> = catalog.iter().map(|t| t.name.clone()).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn test_catalog_covers_all_services() {
        let catalog = GovDataHandler::catalog();
        assert_eq!(catalog.len(), 41);
        assert!(catalog.iter().any(|t| t.name == "get_bills"));
        assert!(catalog.iter().any(|t| t.name == "get_debt_outstanding"));
        assert!(catalog.iter().any(|t| t.name == "get_fred_release_series"));
    }

    #[test]
    fn test_typed_tools_expose_properties() {
        let catalog = GovDataHandler::catalog();
        let details = catalog
            .iter()
            .find(|t| t.name == "get_bill_details")
            .unwrap();
        let properties = details
            .input_schema
            .get("properties")
            .and_then(|v| v.as_object())
            .unwrap();
        assert!(properties.contains_key("congress"));
        assert!(properties.contains_key("bill_type"));
        assert!(properties.contains_key("bill_number"));
    }

    #[test]
    fn test_parse_rejects_missing_arguments() {
        let result: std::result::Result<BillKey, _> = parse(None);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_accepts_valid_arguments() {
        let mut args = serde_json::Map::new();
        args.insert("congress".to_string(), serde_json::json!(118));
        let key: CongressKey = parse(Some(args)).unwrap();
        assert_eq!(key.congress, 118);
    }
}
