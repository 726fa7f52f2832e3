//! Minimal robots.txt reading: `User-agent` groups, `Allow`/`Disallow`
//! prefixes (longest match wins, ties go to allow) and `Crawl-delay`.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    allow: bool,
    prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Group {
    rules: Vec<Rule>,
    crawl_delay: Option<Duration>,
    seen: bool,
}

impl Group {
    fn apply(&mut self, key: &str, value: &str) {
        self.seen = true;
        match key {
            "allow" | "disallow" if !value.is_empty() => self.rules.push(Rule {
                allow: key == "allow",
                prefix: value.to_string(),
            }),
            "crawl-delay" => {
                if let Ok(secs) = value.parse::<f64>() {
                    if secs.is_finite() && secs >= 0.0 {
                        self.crawl_delay = Some(Duration::from_secs_f64(secs));
                    }
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsPolicy {
    group: Group,
}

impl RobotsPolicy {
    /// Used when the site has no robots.txt (or policy checks are disabled).
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Keep the group naming our product token if there is one, else `*`.
    pub fn parse(body: &str, user_agent: &str) -> Self {
        let token = user_agent
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        let mut specific = Group::default();
        let mut generic = Group::default();
        let mut agents: Vec<String> = Vec::new();
        let mut in_rules = false;

        for line in body.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if in_rules {
                        agents.clear();
                        in_rules = false;
                    }
                    agents.push(value.to_ascii_lowercase());
                }
                "allow" | "disallow" | "crawl-delay" => {
                    in_rules = true;
                    for agent in &agents {
                        if agent == "*" {
                            generic.apply(&key, value);
                        } else if !token.is_empty() && token == *agent {
                            specific.apply(&key, value);
                        }
                    }
                }
                _ => {}
            }
        }

        Self {
            group: if specific.seen { specific } else { generic },
        }
    }

    /// `path` is the URL path plus query, e.g. `/showgame.php?game_id=1`.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.group
            .rules
            .iter()
            .filter(|rule| path.starts_with(rule.prefix.as_str()))
            .max_by_key(|rule| (rule.prefix.len(), rule.allow))
            .is_none_or(|rule| rule.allow)
    }

    pub fn crawl_delay(&self) -> Option<Duration> {
        self.group.crawl_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROBOTS: &str = "\
# archive robots
User-agent: *
Crawl-delay: 20
Disallow: /search.php
Disallow: /admin/
Allow: /admin/public

User-agent: BadBot
Disallow: /
";

    #[test]
    fn test_generic_group() {
        let policy = RobotsPolicy::parse(ROBOTS, "jarchive-scraper/0.1 (research)");
        assert_eq!(policy.crawl_delay(), Some(Duration::from_secs(20)));
        assert!(policy.is_allowed("/showgame.php?game_id=173"));
        assert!(!policy.is_allowed("/search.php?search=ken"));
        assert!(!policy.is_allowed("/admin/edit"));
        assert!(policy.is_allowed("/admin/public/index"));
    }

    #[test]
    fn test_specific_group_overrides_generic() {
        let policy = RobotsPolicy::parse(ROBOTS, "BadBot/2.0");
        assert!(!policy.is_allowed("/showgame.php?game_id=173"));
        assert_eq!(policy.crawl_delay(), None);
    }

    #[test]
    fn test_empty_disallow_allows_everything() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow:\n", "x");
        assert!(policy.is_allowed("/anything"));
        assert!(RobotsPolicy::allow_all().is_allowed("/"));
    }

    #[test]
    fn test_grouped_user_agents_share_rules() {
        let body = "User-agent: a\nUser-agent: *\nDisallow: /private\n";
        let policy = RobotsPolicy::parse(body, "someone");
        assert!(!policy.is_allowed("/private/x"));
    }
}
