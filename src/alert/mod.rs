/// Warning construction over the derived forecast timeline.
///
/// Submodules:
/// - `segments` — merges flagged slots into presentable warning ranges.

pub mod segments;
