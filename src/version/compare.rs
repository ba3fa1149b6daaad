//! Natural ("version sort") ordering of version tokens
//!
//! A token is read as a sequence of components: maximal runs of ASCII digits
//! (numeric) and maximal runs of other alphanumeric characters (text).
//! Everything else (`.`, `-`, `_`, `+`, ...) only separates components.
//!
//! Components are compared left to right:
//! - numeric vs numeric: by integer value, leading zeros ignored
//! - text vs text: byte-wise
//! - numeric vs text: numeric is greater
//!
//! When one token runs out of components first, the longer one is greater,
//! so `2.0.0 < 2.0.0a < 2.0.0.1`.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component<'a> {
    Numeric(&'a str),
    Text(&'a str),
}

impl Ord for Component<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Numeric(a), Component::Numeric(b)) => cmp_numeric(a, b),
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            (Component::Numeric(_), Component::Text(_)) => Ordering::Greater,
            (Component::Text(_), Component::Numeric(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Component<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two digit strings by value without parsing (no overflow on long runs)
fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn components(token: &str) -> impl Iterator<Item = Component<'_>> {
    let bytes = token.as_bytes();
    let mut pos = 0;

    std::iter::from_fn(move || {
        while pos < bytes.len() && !bytes[pos].is_ascii_alphanumeric() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return None;
        }

        let start = pos;
        let numeric = bytes[pos].is_ascii_digit();
        while pos < bytes.len()
            && bytes[pos].is_ascii_alphanumeric()
            && bytes[pos].is_ascii_digit() == numeric
        {
            pos += 1;
        }

        // Slicing is safe: boundaries always sit next to ASCII bytes
        let run = &token[start..pos];
        Some(if numeric {
            Component::Numeric(run)
        } else {
            Component::Text(run)
        })
    })
}

/// Natural order over version tokens (and package names)
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = components(a);
    let mut right = components(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match l.cmp(&r) {
                Ordering::Equal => continue,
                unequal => return unequal,
            },
        }
    }
}

/// Returns the naturally greatest candidate; the first one wins among equals
pub fn latest<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .fold(None::<S>, |best, candidate| match best {
            Some(best) if natural_cmp(candidate.as_ref(), best.as_ref()) != Ordering::Greater => {
                Some(best)
            }
            _ => Some(candidate),
        })
        .map(|best| best.as_ref().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.9", "1.10", Ordering::Less)]
    #[case("2.0", "2.0.1", Ordering::Less)]
    #[case("2.0.0", "2.0.0", Ordering::Equal)]
    #[case("2.0.0", "2.0.0a", Ordering::Less)] // strict prefix is smaller
    #[case("2.0.0a", "2.0.0.1", Ordering::Less)] // numeric beats text at a tied position
    #[case("2.0.0a", "2.0.0b", Ordering::Less)]
    #[case("1.02", "1.2", Ordering::Equal)] // leading zeros ignored
    #[case("10.0", "9.99", Ordering::Greater)]
    #[case("1.2.3", "1-2-3", Ordering::Equal)] // separators are not components
    #[case("3.12.0rc1", "3.12.0", Ordering::Greater)]
    #[case("20240101000000000000000001", "20240101000000000000000002", Ordering::Less)]
    #[case("", "0", Ordering::Less)]
    fn natural_cmp_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(natural_cmp(a, b), expected);
        assert_eq!(natural_cmp(b, a), expected.reverse());
    }

    #[test]
    fn natural_cmp_orders_package_names() {
        let mut names = vec!["python3.10", "node22", "python3.9", "node18", "bash"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec!["bash", "node18", "node22", "python3.9", "python3.10"]
        );
    }

    #[rstest]
    #[case(vec![], None)]
    #[case(vec!["1.9", "1.10", "1.2"], Some("1.10"))]
    #[case(vec!["2.47.0", "2.47.1", "2.9.9"], Some("2.47.1"))]
    #[case(vec!["1.2", "1.02"], Some("1.2"))] // first of equals wins
    fn latest_returns_expected(#[case] candidates: Vec<&str>, #[case] expected: Option<&str>) {
        assert_eq!(latest(candidates), expected.map(|s| s.to_string()));
    }
}
