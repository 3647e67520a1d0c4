//! Listing interpreter. Resource listings are free-form text; no parsing.

use std::fmt;

/// Raw listing output plus the tool that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub tool: String,
    pub text: String,
}

pub fn interpret(tool: &str, text: String) -> ListSummary {
    ListSummary {
        tool: tool.to_string(),
        text,
    }
}

impl ListSummary {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for ListSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "({} returned no output)", self.tool);
        }
        f.write_str(&self.text)?;
        if !self.text.ends_with('\n') {
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_verbatim() {
        let raw = "NAMESPACE  NAME   READY\ndemo       web-1  1/1";
        let summary = interpret("pods_list", raw.to_string());
        assert_eq!(summary.text, raw);
        assert_eq!(summary.to_string(), format!("{raw}\n"));
    }

    #[test]
    fn test_empty_output_notice() {
        let summary = interpret("pods_list_in_namespace", "  \n".to_string());
        assert!(summary.is_empty());
        assert_eq!(summary.to_string(), "(pods_list_in_namespace returned no output)\n");
    }
}
