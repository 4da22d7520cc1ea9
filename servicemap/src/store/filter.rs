//! The subset of feature-store `where` clauses the core produces.

use crate::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static OBJECT_ID_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*OBJECTID\s+IN\s*\(([^)]*)\)\s*$").expect("valid regex")
});

static MATCH_ALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*1\s*=\s*1\s*$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereClause {
    /// `1=1`
    All,
    /// `OBJECTID in (3,7,25)`
    ObjectIds(Vec<i64>),
}

impl WhereClause {
    pub fn parse(input: &str) -> Result<Self> {
        if MATCH_ALL.is_match(input) {
            return Ok(WhereClause::All);
        }
        if let Some(caps) = OBJECT_ID_IN.captures(input) {
            return Ok(WhereClause::ObjectIds(parse_id_list(&caps[1])?));
        }
        Err(Error::InvalidFilter(format!("unsupported where clause '{}'", input)))
    }

    pub fn matches(&self, object_id: Option<i64>) -> bool {
        match self {
            WhereClause::All => true,
            WhereClause::ObjectIds(ids) => object_id.is_some_and(|id| ids.contains(&id)),
        }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereClause::All => write!(f, "1=1"),
            WhereClause::ObjectIds(ids) => {
                let list: Vec<String> = ids.iter().map(ToString::to_string).collect();
                write!(f, "OBJECTID in ({})", list.join(","))
            }
        }
    }
}

/// Parse a comma-separated object id list such as `3, 7,25`.
///
/// Only integers are accepted so the list can be embedded in a `where`
/// clause as-is. Blank pieces are ignored; an all-blank list is an error.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    for piece in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = piece
            .parse::<i64>()
            .map_err(|_| Error::InvalidFilter(format!("'{}' is not an object id", piece)))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return Err(Error::InvalidFilter("no object ids supplied".to_string()));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("3,7,25").unwrap(), vec![3, 7, 25]);
        assert_eq!(parse_id_list(" 3 , 7 ,,3").unwrap(), vec![3, 7]);
    }

    #[test]
    fn test_parse_id_list_rejects_injection() {
        assert!(matches!(
            parse_id_list("3) OR (1=1"),
            Err(Error::InvalidFilter(_))
        ));
        assert!(parse_id_list(" , ").is_err());
    }

    #[test]
    fn test_parse_where() {
        assert_eq!(WhereClause::parse("1=1").unwrap(), WhereClause::All);
        assert_eq!(WhereClause::parse(" 1 = 1 ").unwrap(), WhereClause::All);
        assert_eq!(
            WhereClause::parse("OBJECTID in (3,7)").unwrap(),
            WhereClause::ObjectIds(vec![3, 7])
        );
        assert_eq!(
            WhereClause::parse("objectid IN ( 4 )").unwrap(),
            WhereClause::ObjectIds(vec![4])
        );
        assert!(WhereClause::parse("Name = 'x'").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let clause = WhereClause::ObjectIds(vec![3, 7, 25]);
        assert_eq!(clause.to_string(), "OBJECTID in (3,7,25)");
        assert_eq!(WhereClause::parse(&clause.to_string()).unwrap(), clause);
    }

    #[test]
    fn test_matches() {
        assert!(WhereClause::All.matches(None));
        let clause = WhereClause::ObjectIds(vec![2]);
        assert!(clause.matches(Some(2)));
        assert!(!clause.matches(Some(3)));
        assert!(!clause.matches(None));
    }
}
