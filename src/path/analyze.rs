use super::PathData;
use crate::types::fstr;

#[cfg(feature = "json")]
use serde_derive::Serialize;

/// Summary of how a path is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct PathInfo {
    /// Most decimal places used by any value (at most 8)
    pub decimals: u32,
    pub has_shorthand: bool,
    pub has_relative: bool,
    /// Whether the final command is a closepath
    pub closed: bool,
    pub subpath_count: usize,
}

/// Decimal places needed to write `v` exactly, up to 8.
fn decimal_places(v: f64) -> u32 {
    let s = fstr(v, Some(8));
    s.split_once('.')
        .map_or(0, |(_, frac)| frac.len() as u32)
}

pub fn analyze_path_data(path: &PathData) -> PathInfo {
    let mut info = PathInfo {
        closed: path.last().is_some_and(|c| c.kind().is_close()),
        subpath_count: path.subpath_count(),
        ..Default::default()
    };
    for cmd in path.iter() {
        let kind = cmd.kind();
        info.has_relative |= kind.is_relative();
        info.has_shorthand |= matches!(kind.absolute().letter(), 'H' | 'V' | 'S' | 'T');
        info.decimals = cmd
            .values()
            .iter()
            .map(|v| decimal_places(*v))
            .fold(info.decimals, u32::max);
    }
    info
}
