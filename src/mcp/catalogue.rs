//! The fixed tool catalogue: one entry per upstream endpoint.
//!
//! Tool and parameter names are part of the public interface. Renaming one is
//! a breaking change for every agent configured against this server.

use super::handlers::Route;
use super::schema::{ParamKind, ParamSpec};
use crate::models::{HttpMethod, Placement};
use crate::utils::Summary;

/// Prefix of the canonical tool names
pub const TOOL_PREFIX: &str = "suarify_";

/// Static description of one tool
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// Unprefixed name, e.g. `list_leads`
    pub name: &'static str,
    pub description: &'static str,
    pub route: Route,
    pub summary: Summary,
    pub params: Vec<ParamSpec>,
}

impl ToolDefinition {
    pub fn canonical_name(&self) -> String {
        format!("{}{}", TOOL_PREFIX, self.name)
    }
}

const LIVE_NOTE: &str =
    "Must be exactly 'LIVE' for the platform to place a real call; any other value is rejected upstream";

fn phonenumber(required: bool, description: &'static str) -> ParamSpec {
    if required {
        ParamSpec::required("phonenumber", ParamKind::String, description)
    } else {
        ParamSpec::optional("phonenumber", ParamKind::String, description)
    }
}

fn paging(default_limit: i64) -> [ParamSpec; 2] {
    [
        ParamSpec::optional("limit", ParamKind::Integer, "Maximum number of records to return")
            .default(default_limit),
        ParamSpec::optional("offset", ParamKind::Integer, "Number of records to skip")
            .default(0),
    ]
}

fn id_param(what: &'static str) -> ParamSpec {
    ParamSpec::required("id", ParamKind::Identifier, what)
}

fn lead_fields(phone_required: bool) -> Vec<ParamSpec> {
    vec![
        phonenumber(phone_required, "Lead's phone number"),
        ParamSpec::optional("name", ParamKind::String, "Lead's full name"),
        ParamSpec::optional("email", ParamKind::String, "Lead's email address"),
        ParamSpec::optional(
            "status",
            ParamKind::String,
            "Pipeline status, e.g. 'new', 'contacted', 'qualified'",
        ),
        ParamSpec::optional("notes", ParamKind::String, "Free-text notes about the lead"),
        ParamSpec::optional("metadata", ParamKind::Object, "Additional custom fields"),
    ]
}

/// Every tool, in listing order
pub fn definitions() -> Vec<ToolDefinition> {
    use HttpMethod::{Delete, Get, Patch, Post};
    use Placement::{Body, PathId, PathIdBody, PathIdQuery, Query};

    vec![
        // Inbound phone settings
        ToolDefinition {
            name: "setup_inbound_settings",
            description: "Configure how the AI agent answers inbound calls on a phone number",
            route: Route::new(Post, "/inbound-phone-settings", Body),
            summary: Summary::Fixed("Inbound phone settings configured successfully"),
            params: vec![
                phonenumber(true, "Phone number receiving inbound calls"),
                ParamSpec::optional(
                    "params",
                    ParamKind::ObjectOrString,
                    "Agent settings such as main_voice or prompt, as an object or a JSON-encoded string",
                ),
            ],
        },
        ToolDefinition {
            name: "get_inbound_settings",
            description: "Get the inbound call settings for a phone number",
            route: Route::new(Get, "/inbound-phone-settings", Query),
            summary: Summary::Fixed("Retrieved inbound phone settings"),
            params: vec![phonenumber(false, "Phone number to look up")],
        },
        // Phone configuration
        ToolDefinition {
            name: "setup_phone_configuration",
            description: "Create or update the telephony configuration for a phone number",
            route: Route::new(Post, "/api/phone-configuration", Body),
            summary: Summary::Fixed("Phone configuration saved successfully"),
            params: vec![
                phonenumber(true, "Phone number to configure"),
                ParamSpec::optional("provider", ParamKind::String, "Telephony provider name"),
                ParamSpec::optional("agent_id", ParamKind::String, "User agent handling calls"),
                ParamSpec::optional("voice", ParamKind::String, "Voice used by the agent"),
                ParamSpec::optional("language", ParamKind::String, "Conversation language code"),
            ],
        },
        ToolDefinition {
            name: "get_phone_configuration",
            description: "Get the telephony configuration for a phone number",
            route: Route::new(Get, "/api/phone-configuration", Query),
            summary: Summary::Fixed("Retrieved phone configuration"),
            params: vec![phonenumber(false, "Phone number to look up")],
        },
        // Calls
        ToolDefinition {
            name: "initiate_call",
            description: "Initiate a call from a configured user agent to a phone number",
            route: Route::new(Post, "/api/call", Body),
            summary: Summary::Fixed("Call initiated successfully"),
            params: vec![
                phonenumber(true, "Phone number to call"),
                ParamSpec::required("status", ParamKind::String, LIVE_NOTE),
                ParamSpec::optional("agent_id", ParamKind::String, "User agent placing the call"),
                ParamSpec::optional("metadata", ParamKind::Object, "Context passed to the agent"),
            ],
        },
        ToolDefinition {
            name: "do_outbound_call",
            description: "Place an outbound AI phone call with an ad-hoc prompt",
            route: Route::new(Post, "/do-outbound-phone-call", Body),
            summary: Summary::Fixed("Outbound call requested successfully"),
            params: vec![
                phonenumber(true, "Phone number to call"),
                ParamSpec::required("password", ParamKind::String, LIVE_NOTE),
                ParamSpec::optional("prompt", ParamKind::String, "Instructions for the agent"),
                ParamSpec::optional(
                    "first_message",
                    ParamKind::String,
                    "What the agent says when the call connects",
                ),
                ParamSpec::optional("voice", ParamKind::String, "Voice used by the agent"),
                ParamSpec::optional("language", ParamKind::String, "Conversation language code"),
            ],
        },
        // Call logs
        ToolDefinition {
            name: "get_outbound_call_logs",
            description: "List outbound call logs, newest first",
            route: Route::new(Get, "/api/outbound-call-logs", Query),
            summary: Summary::Count {
                noun: "outbound call logs",
                key: Some("logs"),
            },
            params: [
                paging(50).to_vec(),
                vec![phonenumber(false, "Only logs for this phone number")],
            ]
            .concat(),
        },
        ToolDefinition {
            name: "get_inbound_call_logs",
            description: "List inbound call logs, newest first",
            route: Route::new(Get, "/api/inbound-call-logs", Query),
            summary: Summary::Count {
                noun: "inbound call logs",
                key: Some("logs"),
            },
            params: [
                paging(50).to_vec(),
                vec![phonenumber(false, "Only logs for this phone number")],
            ]
            .concat(),
        },
        // User agents
        ToolDefinition {
            name: "list_user_agents",
            description: "List the AI user agents on the account",
            route: Route::new(Get, "/api/user-agents", Query),
            summary: Summary::Count {
                noun: "user agents",
                key: Some("agents"),
            },
            params: paging(100).to_vec(),
        },
        ToolDefinition {
            name: "get_user_agent",
            description: "Get one AI user agent by ID",
            route: Route::new(Get, "/api/user-agents/{id}", PathIdQuery),
            summary: Summary::Fixed("Retrieved user agent"),
            params: vec![id_param("User agent ID")],
        },
        ToolDefinition {
            name: "delete_user_agent",
            description: "Delete an AI user agent by ID",
            route: Route::new(Delete, "/api/user-agents/{id}", PathIdQuery),
            summary: Summary::Fixed("User agent deleted successfully"),
            params: vec![id_param("User agent ID")],
        },
        // Leads
        ToolDefinition {
            name: "create_lead",
            description: "Create a lead",
            route: Route::new(Post, "/api/user-leads", Body),
            summary: Summary::Fixed("Lead created successfully"),
            params: lead_fields(true),
        },
        ToolDefinition {
            name: "bulk_upload_leads",
            description: "Create many leads in one request",
            route: Route::new(Post, "/api/user-leads/bulk", Body),
            summary: Summary::Fixed("Leads uploaded successfully"),
            params: vec![ParamSpec::required(
                "leads",
                ParamKind::ObjectArray,
                "Leads to create; each object takes the same fields as create_lead",
            )],
        },
        ToolDefinition {
            name: "list_leads",
            description: "List leads, optionally filtered by status or a search term",
            route: Route::new(Get, "/api/user-leads", Query),
            summary: Summary::Count {
                noun: "leads",
                key: Some("leads"),
            },
            params: [
                paging(50).to_vec(),
                vec![
                    ParamSpec::optional("status", ParamKind::String, "Only leads with this status"),
                    ParamSpec::optional(
                        "search",
                        ParamKind::String,
                        "Match against name, email or phone number",
                    ),
                ],
            ]
            .concat(),
        },
        ToolDefinition {
            name: "get_lead",
            description: "Get one lead by ID",
            route: Route::new(Get, "/api/user-leads/{id}", PathId),
            summary: Summary::Fixed("Retrieved lead"),
            params: vec![id_param("Lead ID")],
        },
        ToolDefinition {
            name: "update_lead",
            description: "Update fields of a lead; omitted fields are left unchanged",
            route: Route::new(Patch, "/api/user-leads/{id}", PathIdBody),
            summary: Summary::Fixed("Lead updated successfully"),
            params: [vec![id_param("Lead ID")], lead_fields(false)].concat(),
        },
        ToolDefinition {
            name: "delete_lead",
            description: "Delete a lead by ID",
            route: Route::new(Delete, "/api/user-leads/{id}", PathId),
            summary: Summary::Fixed("Lead deleted successfully"),
            params: vec![id_param("Lead ID")],
        },
    ]
}
