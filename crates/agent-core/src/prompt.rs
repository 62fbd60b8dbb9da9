//! System Prompt Builder
//!
//! Composes the instruction preamble for the support agent: a fixed
//! policy section plus a knowledge section sampled from provider
//! resources. Resource reads are best-effort; a failed read degrades
//! prompt richness but never aborts startup.

use crate::mcp::{McpSession, ResourceDescriptor};

/// Only this many resources are consulted, bounding prompt size and
/// discovery latency.
const KNOWLEDGE_RESOURCE_LIMIT: usize = 3;

/// Per-resource excerpt cap in characters.
const KNOWLEDGE_EXCERPT_CHARS: usize = 1000;

const POLICY_PREAMBLE: &str = r#"You are a helpful customer support agent for a computer products company.

## Your Role
- Help customers find products, check orders, and place new orders
- Always be professional, friendly, and helpful
- Use the available tools to look up real-time data
- Ask for email and PIN to verify customers before accessing their order information

## Available Tools
You have access to the following tools to help customers:
- search_products: Find products by search query
- list_products: Browse product catalog with optional filters
- get_product: Get detailed product information by SKU
- verify_customer_pin: Verify customer identity with email and PIN (required before showing orders)
- get_customer: Get customer information by ID
- list_orders: View customer order history (requires verification first)
- get_order: Get detailed order information
- create_order: Place a new order for a customer

## Important Guidelines
- ALWAYS verify customer identity (email + PIN) before showing order information
- Provide specific product recommendations with SKU, price, and stock information
- Format prices with currency symbols (e.g., $299.99)
- Be transparent about stock levels
- If a customer wants to place an order, verify their identity first
"#;

/// Build the full system prompt from the policy preamble and a
/// bounded sample of resource content.
pub async fn build_system_prompt(
    session: &dyn McpSession,
    resources: &[ResourceDescriptor],
) -> String {
    let mut prompt = String::from(POLICY_PREAMBLE);

    if resources.is_empty() {
        return prompt;
    }

    prompt.push_str("\n## Product Knowledge\n");
    for resource in resources.iter().take(KNOWLEDGE_RESOURCE_LIMIT) {
        match session.read_resource(&resource.uri).await {
            Ok(content) => {
                if let Some(text) = content.text {
                    let excerpt: String = text.chars().take(KNOWLEDGE_EXCERPT_CHARS).collect();
                    prompt.push_str(&format!("\n### {}\n{}\n", resource.name, excerpt));
                }
            }
            Err(e) => {
                tracing::warn!(uri = %resource.uri, error = %e, "Failed to read resource");
            }
        }
    }

    prompt
}
