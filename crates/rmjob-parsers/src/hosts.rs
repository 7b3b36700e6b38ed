//! Parsing of execution host lists.

use crate::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;

static RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("valid regex"));

/// Count the processor slots in a comma-separated list of indices and
/// inclusive ranges, e.g. `"2,7,10-11"` holds 4 slots.
pub fn count_slots(list: &str) -> Result<u32, ParseError> {
    list.split(',').try_fold(0u32, |sum, part| {
        let slots = if let Some(caps) = RANGE_RE.captures(part) {
            let first: u32 = caps[1]
                .parse()
                .map_err(|_| ParseError::HostList(list.to_string()))?;
            let last: u32 = caps[2]
                .parse()
                .map_err(|_| ParseError::HostList(list.to_string()))?;
            last.checked_sub(first)
                .and_then(|span| span.checked_add(1))
                .ok_or_else(|| ParseError::HostList(list.to_string()))?
        } else if !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) {
            1
        } else {
            return Err(ParseError::HostList(list.to_string()));
        };
        sum.checked_add(slots)
            .ok_or_else(|| ParseError::HostList(list.to_string()))
    })
}

/// Parse an execution host list into `(node name, processor count)` pairs.
///
/// The list is `+`-separated `name/slots` segments, one pair per segment:
/// `"n0163/2,7,10-11+n0205/0-11"` gives `[("n0163", 4), ("n0205", 12)]`.
/// An empty list gives no nodes.
pub fn parse_exec_host(list: &str) -> Result<Vec<(String, u32)>, ParseError> {
    let list = list.trim();
    if list.is_empty() {
        return Ok(Vec::new());
    }

    list.split('+')
        .map(|segment| {
            let (name, slots) = segment
                .split_once('/')
                .ok_or_else(|| ParseError::HostList(segment.to_string()))?;
            if name.is_empty() {
                return Err(ParseError::HostList(segment.to_string()));
            }
            Ok((name.to_string(), count_slots(slots)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_slots() {
        assert_eq!(count_slots("0-11"), Ok(12));
        assert_eq!(count_slots("2,7,10-11"), Ok(4));
        assert_eq!(count_slots("5"), Ok(1));
        assert_eq!(count_slots("3-3"), Ok(1));
    }

    #[test]
    fn test_count_slots_malformed() {
        assert!(count_slots("").is_err());
        assert!(count_slots("11-0").is_err());
        assert!(count_slots("a-b").is_err());
        assert!(count_slots("1,,2").is_err());
    }

    #[test]
    fn test_count_slots_overflow() {
        assert_eq!(
            count_slots("0-4294967295"),
            Err(ParseError::HostList("0-4294967295".to_string()))
        );
        assert!(count_slots("0-4294967294,7").is_err());
        assert_eq!(count_slots("1-4294967295"), Ok(u32::MAX));
    }

    #[test]
    fn test_parse_exec_host() {
        assert_eq!(
            parse_exec_host("n0635/0-11+n0636/0-11").unwrap(),
            vec![("n0635".to_string(), 12), ("n0636".to_string(), 12)]
        );
        assert_eq!(
            parse_exec_host("n0163/2,7,10-11+n0205/0-11+n0156/0-11").unwrap(),
            vec![
                ("n0163".to_string(), 4),
                ("n0205".to_string(), 12),
                ("n0156".to_string(), 12)
            ]
        );
    }

    #[test]
    fn test_parse_exec_host_empty() {
        assert!(parse_exec_host("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_exec_host_keeps_repeated_names() {
        assert_eq!(
            parse_exec_host("n1/0+n1/1").unwrap(),
            vec![("n1".to_string(), 1), ("n1".to_string(), 1)]
        );
    }

    #[test]
    fn test_parse_exec_host_malformed() {
        assert_eq!(
            parse_exec_host("n0635"),
            Err(ParseError::HostList("n0635".to_string()))
        );
        assert!(parse_exec_host("/0-11").is_err());
        assert!(parse_exec_host("n1/0-11+").is_err());
    }
}
