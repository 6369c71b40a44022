//! Installed block rules.
//!
//! Rules are derived from the block list, one per hostname, and entirely
//! regenerated on every session start/stop: removal clears the whole
//! `1..=max_rules` id range, then the new set is added. Nothing is ever
//! diffed incrementally, so a partial previous install cannot leak.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::store::Database;

/// One installable directive: navigations to `hostname` (or a subdomain)
/// are redirected to `redirect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    /// 1-based slot in the filter's removable id range.
    pub id: u32,
    pub hostname: String,
    pub redirect: String,
}

/// Derive one rule per hostname, ids assigned in list order.
pub fn derive_rules(sites: &[String], redirect_base: &str) -> Vec<BlockRule> {
    sites
        .iter()
        .enumerate()
        .map(|(index, site)| BlockRule {
            id: index as u32 + 1,
            hostname: site.clone(),
            redirect: format!("{redirect_base}?site={}", urlencoding::encode(site)),
        })
        .collect()
}

/// The network-filtering seam. Implementations persist installed rules
/// natively, so a process restart does not need to re-install them.
pub trait RuleFilter {
    /// Remove the whole `1..=max_rules` id range, then install `rules`.
    ///
    /// # Errors
    /// Fails without installing anything when `rules` exceeds the limit.
    fn replace_all(&mut self, rules: &[BlockRule]) -> Result<(), FilterError>;

    /// Remove the whole `1..=max_rules` id range.
    fn clear(&mut self) -> Result<(), FilterError>;

    /// Currently installed rules, ordered by id.
    fn installed(&self) -> Result<Vec<BlockRule>, FilterError>;

    fn max_rules(&self) -> usize;
}

/// Filter persisting rules in the `block_rules` table.
pub struct SqliteRuleFilter<'a> {
    db: &'a Database,
    max_rules: usize,
}

impl<'a> SqliteRuleFilter<'a> {
    pub fn new(db: &'a Database, max_rules: usize) -> Self {
        Self { db, max_rules }
    }
}

impl RuleFilter for SqliteRuleFilter<'_> {
    fn replace_all(&mut self, rules: &[BlockRule]) -> Result<(), FilterError> {
        if rules.len() > self.max_rules {
            return Err(FilterError::TooManyRules {
                count: rules.len(),
                max: self.max_rules,
            });
        }
        let tx = self.db.conn().unchecked_transaction()?;
        tx.execute(
            "DELETE FROM block_rules WHERE id BETWEEN 1 AND ?1",
            rusqlite::params![self.max_rules as i64],
        )?;
        for rule in rules {
            tx.execute(
                "INSERT INTO block_rules (id, hostname, redirect) VALUES (?1, ?2, ?3)",
                rusqlite::params![rule.id, rule.hostname, rule.redirect],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), FilterError> {
        self.db.conn().execute(
            "DELETE FROM block_rules WHERE id BETWEEN 1 AND ?1",
            rusqlite::params![self.max_rules as i64],
        )?;
        Ok(())
    }

    fn installed(&self) -> Result<Vec<BlockRule>, FilterError> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT id, hostname, redirect FROM block_rules ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(BlockRule {
                id: row.get(0)?,
                hostname: row.get(1)?,
                redirect: row.get(2)?,
            })
        })?;
        let mut rules = Vec::new();
        for row in rows {
            rules.push(row?);
        }
        Ok(rules)
    }

    fn max_rules(&self) -> usize {
        self.max_rules
    }
}

/// In-memory filter for tests and hosts without a database.
#[derive(Debug, Default)]
pub struct MemoryRuleFilter {
    rules: Vec<BlockRule>,
    max_rules: usize,
}

impl MemoryRuleFilter {
    pub fn new(max_rules: usize) -> Self {
        Self {
            rules: Vec::new(),
            max_rules,
        }
    }
}

impl RuleFilter for MemoryRuleFilter {
    fn replace_all(&mut self, rules: &[BlockRule]) -> Result<(), FilterError> {
        if rules.len() > self.max_rules {
            return Err(FilterError::TooManyRules {
                count: rules.len(),
                max: self.max_rules,
            });
        }
        self.rules = rules.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), FilterError> {
        self.rules.clear();
        Ok(())
    }

    fn installed(&self) -> Result<Vec<BlockRule>, FilterError> {
        Ok(self.rules.clone())
    }

    fn max_rules(&self) -> usize {
        self.max_rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rules_get_sequential_ids_and_encoded_redirects() {
        let rules = derive_rules(&sites(&["facebook.com", "twitch.tv"]), "focusshield:blocked");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, 1);
        assert_eq!(rules[1].id, 2);
        assert_eq!(rules[0].redirect, "focusshield:blocked?site=facebook.com");
    }

    #[test]
    fn replace_all_swaps_the_whole_set() {
        let db = Database::open_memory().unwrap();
        let mut filter = SqliteRuleFilter::new(&db, 100);

        filter
            .replace_all(&derive_rules(&sites(&["a.com", "b.com"]), "x:y"))
            .unwrap();
        filter
            .replace_all(&derive_rules(&sites(&["c.com"]), "x:y"))
            .unwrap();

        let installed = filter.installed().unwrap();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].hostname, "c.com");
    }

    #[test]
    fn clear_removes_everything() {
        let db = Database::open_memory().unwrap();
        let mut filter = SqliteRuleFilter::new(&db, 100);
        filter
            .replace_all(&derive_rules(&sites(&["a.com"]), "x:y"))
            .unwrap();
        filter.clear().unwrap();
        assert!(filter.installed().unwrap().is_empty());
    }

    #[test]
    fn too_many_rules_is_rejected_before_any_install() {
        let db = Database::open_memory().unwrap();
        let mut filter = SqliteRuleFilter::new(&db, 2);
        filter
            .replace_all(&derive_rules(&sites(&["keep.com"]), "x:y"))
            .unwrap();

        let err = filter
            .replace_all(&derive_rules(&sites(&["a.com", "b.com", "c.com"]), "x:y"))
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::TooManyRules { count: 3, max: 2 }
        ));
        // Prior set untouched.
        assert_eq!(filter.installed().unwrap().len(), 1);
    }
}
