//! `tools`: discover the server's tools and print them by family.

use std::collections::BTreeMap;
use std::fmt;

use crate::mcp_client::{group_by_family, McpClient, McpError, ToolDescriptor, ToolFamily};

/// Discovered tools grouped for display.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    groups: BTreeMap<ToolFamily, Vec<ToolDescriptor>>,
}

impl ToolCatalog {
    pub fn from_descriptors(tools: &[ToolDescriptor]) -> Self {
        let groups = group_by_family(tools)
            .into_iter()
            .map(|(family, members)| (family, members.into_iter().cloned().collect()))
            .collect();
        Self { groups }
    }

    pub fn family(&self, family: ToolFamily) -> &[ToolDescriptor] {
        self.groups.get(&family).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Invoke discovery and group the result.
pub async fn list_tools(client: &McpClient) -> Result<ToolCatalog, McpError> {
    let tools = client.list_tools().await?;
    tracing::info!(count = tools.len(), "tools discovered");
    Ok(ToolCatalog::from_descriptors(&tools))
}

impl fmt::Display for ToolCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return writeln!(f, "The server exposes no tools.");
        }

        let width = self
            .groups
            .values()
            .flatten()
            .map(|t| t.name.len())
            .max()
            .unwrap_or(0);

        for (i, (family, tools)) in self.groups.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{family} ({})", tools.len())?;
            for tool in tools {
                let description = tool.description.lines().next().unwrap_or("").trim();
                if description.is_empty() {
                    writeln!(f, "  {}", tool.name)?;
                } else {
                    writeln!(f, "  {:<width$}  {description}", tool.name)?;
                }
            }
        }
        Ok(())
    }
}
