use std::collections::BTreeMap;

use crate::catalog::types::{Dataset, Platform, PlatformCategory, PlatformRegion, Project, Status};

/// A named count over records matching a predicate.
pub type Slice<T> = (&'static str, fn(&T) -> bool);

pub const TOTAL: &str = "total";

/// `total` plus one counter per slice, in a single pass.
pub fn aggregate<T>(records: &[T], slices: &[Slice<T>]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        slices.iter().map(|(name, _)| (*name, 0)).collect();
    counts.insert(TOTAL, records.len());
    for record in records {
        for (name, pred) in slices {
            if pred(record) {
                *counts.entry(*name).or_default() += 1;
            }
        }
    }
    counts
}

/// `1 project found`, `3 projects found`.
pub fn result_count(n: usize, noun: &str, plural: &str) -> String {
    format!("{} {} found", n, if n == 1 { noun } else { plural })
}

pub const PROJECT_SLICES: &[Slice<Project>] = &[
    ("ongoing", |p: &Project| p.status == Status::Ongoing),
    ("completed", |p: &Project| p.status == Status::Completed),
    ("upcoming", |p: &Project| p.status == Status::Upcoming),
];

pub const PLATFORM_SLICES: &[Slice<Platform>] = &[
    ("continental", |p: &Platform| p.region == PlatformRegion::Continental),
    ("satellite", |p: &Platform| p.category == PlatformCategory::Satellite),
    ("geoportal", |p: &Platform| p.category == PlatformCategory::Geoportal),
];

pub const DATASET_SLICES: &[Slice<Dataset>] = &[];
