use crate::errors::{Error, Result};

/// Round `x` to the given number of decimal places.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round() / scale
}

/// Return a 'minimal' representation of the given number
///
/// With `decimals` set, the value is rounded first; trailing zeros and
/// any trailing decimal point are always removed, and negative zero is
/// written as `0`.
pub fn fstr(x: f64, decimals: Option<u32>) -> String {
    let result = match decimals {
        Some(d) => {
            let rounded = round_to(x, d);
            format!("{rounded:.prec$}", prec = d as usize)
        }
        None => format!("{x}"),
    };
    let result = if result.contains('.') {
        result.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        result
    };
    if result == "-0" {
        "0".to_string()
    } else {
        result
    }
}

/// Drop a redundant leading zero: `0.5` -> `.5`, `-0.5` -> `-.5`
pub fn strip_leading_zero(s: &str) -> String {
    if let Some(rest) = s.strip_prefix("0.") {
        format!(".{rest}")
    } else if let Some(rest) = s.strip_prefix("-0.") {
        format!("-.{rest}")
    } else {
        s.to_string()
    }
}

/// Parse a string to an f64
pub fn strp(s: &str) -> Result<f64> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidValue("number".to_string(), s.to_string()))
}

/// A length attribute value, either in user units or as a percentage
/// of some reference size (stored as a ratio, so `50%` is `Ratio(0.5)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Absolute(f64),
    Ratio(f64),
}

impl Length {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(pc) = s.strip_suffix('%') {
            Ok(Length::Ratio(strp(pc)? / 100.))
        } else {
            Ok(Length::Absolute(strp(s.trim_end_matches("px"))?))
        }
    }

    /// Resolve against a reference size for ratios
    pub fn resolve(&self, reference: f64) -> f64 {
        match self {
            Length::Absolute(v) => *v,
            Length::Ratio(r) => r * reference,
        }
    }
}

/// Returns iterator over whitespace-or-comma separated values
pub fn attr_split(input: &str) -> impl Iterator<Item = String> + '_ {
    input
        .split_whitespace()
        .flat_map(|v| v.split(','))
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// An order preserving map of element attributes.
///
/// Attribute lists are short, so lookups are linear scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap {
    attrs: Vec<(String, String)>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-update the given key/value.
    /// If the key is already present, update in place; otherwise append.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.attrs.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut String)> {
        self.attrs.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.attrs.clone()
    }
}

impl FromIterator<(String, String)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut am = Self::new();
        for (k, v) in iter {
            am.insert(k, v);
        }
        am
    }
}

impl IntoIterator for AttrMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.into_iter()
    }
}
