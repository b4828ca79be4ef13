use std::sync::Arc;

use serde_json::{json, Value};

use mb_domain::config::Config;
use mb_platform::RestPlatformClient;
use mb_tools::ToolRegistry;

/// Print the built-in tool catalog. Nothing is sent to the platform, so
/// no token is needed.
pub fn list(config: &Config, as_json: bool) -> anyhow::Result<()> {
    let client = RestPlatformClient::new(&config.platform, None)?;
    let registry = mb_tools::builtin_registry(Arc::new(client));

    if as_json {
        println!("{}", serde_json::to_string_pretty(&catalog(&registry))?);
    } else {
        print!("{}", render_table(&registry));
    }
    Ok(())
}

fn catalog(registry: &ToolRegistry) -> Value {
    let tools: Vec<Value> = registry
        .iter()
        .map(|tool| {
            let params: Vec<Value> = tool
                .params()
                .iter()
                .map(|p| {
                    json!({
                        "name": p.name,
                        "type": p.kind.to_string(),
                        "required": p.required,
                        "description": p.description,
                    })
                })
                .collect();
            json!({
                "name": tool.name(),
                "description": tool.description(),
                "parameters": params,
            })
        })
        .collect();
    json!({ "tools": tools })
}

fn render_table(registry: &ToolRegistry) -> String {
    let mut out = String::new();
    for tool in registry.iter() {
        out.push_str(&format!("{:<22} {}\n", tool.name(), tool.description()));
        for p in tool.params() {
            let flag = if p.required { "required" } else { "optional" };
            out.push_str(&format!(
                "    {:<12} {:<8} {:<9} {}\n",
                p.name, p.kind, flag, p.description
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        let client = RestPlatformClient::new(&Config::default().platform, None).unwrap();
        mb_tools::builtin_registry(Arc::new(client))
    }

    #[test]
    fn catalog_lists_every_tool_with_parameters() {
        let cat = catalog(&registry());
        let tools = cat["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 7);
        assert_eq!(tools[0]["name"], "list_scenarios");
        assert_eq!(tools[0]["parameters"], json!([]));

        let toggle = tools.iter().find(|t| t["name"] == "toggle_scenario").unwrap();
        assert_eq!(toggle["parameters"][1]["name"], "active");
        assert_eq!(toggle["parameters"][1]["type"], "boolean");
        assert_eq!(toggle["parameters"][1]["required"], true);
    }

    #[test]
    fn table_shows_optional_parameters() {
        let table = render_table(&registry());
        assert!(table.contains("get_scenario_history"));
        assert!(table.lines().any(|l| l.contains("limit") && l.contains("optional")));
    }
}
