//! Legacy address redirection

use crate::RedirectRule;
use std::sync::Arc;

/// Rewrites outgoing addresses before anything loads them.
///
/// Injected once at startup into every loading pathway. Implementations
/// must be pure: rewriting never fails.
pub trait RequestInterceptor: Send + Sync {
    /// The rewritten address, or `None` when the address passes unchanged
    fn rewrite(&self, address: &str) -> Option<String>;

    /// The address to actually load
    fn apply(&self, address: &str) -> String {
        self.rewrite(address)
            .unwrap_or_else(|| address.to_string())
    }
}

/// Interceptor that never rewrites
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl RequestInterceptor for PassThrough {
    fn rewrite(&self, _address: &str) -> Option<String> {
        None
    }
}

/// Static table of literal (from, to) substring mappings
#[derive(Debug, Clone)]
pub struct Redirector {
    rules: Arc<[RedirectRule]>,
}

impl Redirector {
    pub fn new(rules: impl Into<Vec<RedirectRule>>) -> Self {
        let rules: Vec<RedirectRule> = rules.into();
        let rules = rules
            .into_iter()
            .filter(|rule| {
                if rule.from.is_empty() {
                    tracing::warn!("Ignoring redirect rule with empty source (to {})", rule.to);
                    false
                } else {
                    true
                }
            })
            .collect::<Vec<_>>();

        Self {
            rules: rules.into(),
        }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    /// First rule whose source occurs in the address
    pub fn matching_rule(&self, address: &str) -> Option<&RedirectRule> {
        self.rules.iter().find(|rule| address.contains(&rule.from))
    }
}

impl Default for Redirector {
    fn default() -> Self {
        Self::new(flashdeck_config::RedirectSettings::default().rules)
    }
}

impl RequestInterceptor for Redirector {
    fn rewrite(&self, address: &str) -> Option<String> {
        let rule = self.matching_rule(address)?;
        let rewritten = address.replacen(&rule.from, &rule.to, 1);
        tracing::info!("Redirecting {} -> {}", address, rewritten);
        Some(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_rewrites_legacy_host() {
        let redirector = Redirector::default();
        assert_eq!(
            redirector.apply("https://jogos.ipv7.pt/faq.swf"),
            "https://cdn.xperia.pt/laserquest/faq.swf"
        );
    }

    #[test]
    fn test_plain_http_and_protocol_relative() {
        let redirector = Redirector::default();
        assert_eq!(
            redirector.apply("http://jogos.ipv7.pt/games/a.swf"),
            "https://cdn.xperia.pt/laserquest/games/a.swf"
        );
        assert_eq!(
            redirector.apply("//jogos.ipv7.pt/b.swf"),
            "//cdn.xperia.pt/laserquest/b.swf"
        );
    }

    #[test]
    fn test_unmatched_address_is_unchanged() {
        let redirector = Redirector::default();
        let address = "https://example.org/other.swf";
        assert_eq!(redirector.rewrite(address), None);
        assert_eq!(redirector.apply(address), address);
    }

    #[test]
    fn test_earlier_rule_wins() {
        let redirector = Redirector::new(vec![
            RedirectRule::new("old.example", "first.example"),
            RedirectRule::new("old.example/path", "second.example/path"),
        ]);

        assert_eq!(
            redirector.apply("https://old.example/path/x"),
            "https://first.example/path/x"
        );
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let redirector = Redirector::new(vec![RedirectRule::new("a/", "b/")]);
        assert_eq!(redirector.apply("a/a/c"), "b/a/c");
    }

    #[test]
    fn test_empty_source_rule_ignored() {
        let redirector = Redirector::new(vec![
            RedirectRule::new("", "https://everything/"),
            RedirectRule::new("x", "y"),
        ]);
        assert_eq!(redirector.rules().len(), 1);
        assert_eq!(redirector.apply("nothing-here"), "nothing-here");
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(PassThrough.apply("https://jogos.ipv7.pt/a.swf"), "https://jogos.ipv7.pt/a.swf");
    }
}
