// src/search/constraints.rs
//! Per-site filter exclusivity rules.
//!
//! Indeed and Glassdoor only honour one of `hours_old`, `job_type`/`is_remote`
//! and `easy_apply` per query. LinkedIn cannot combine `hours_old` with
//! `easy_apply`. Lower priority filters are dropped, never rejected.

use super::types::{FilterSet, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterSlot {
    HoursOld,
    JobTypeOrRemote,
    EasyApply,
}

pub fn normalize_filters(site: Site, filters: FilterSet) -> FilterSet {
    match site {
        Site::Indeed | Site::Glassdoor => single_filter(filters),
        Site::Linkedin => hours_old_over_easy_apply(filters),
        _ => filters,
    }
}

fn single_filter(mut filters: FilterSet) -> FilterSet {
    let mut selected: Option<FilterSlot> = None;

    if filters.hours_old.is_some() {
        selected = Some(FilterSlot::HoursOld);
    }

    if filters.job_type.is_some() || filters.is_remote {
        if selected.is_some() {
            filters.job_type = None;
            filters.is_remote = false;
        } else {
            selected = Some(FilterSlot::JobTypeOrRemote);
        }
    }

    if filters.easy_apply {
        if selected.is_some() {
            filters.easy_apply = false;
        } else {
            selected = Some(FilterSlot::EasyApply);
        }
    }

    debug_assert!(selected.is_none() || active_categories(&filters) == 1);
    filters
}

fn hours_old_over_easy_apply(mut filters: FilterSet) -> FilterSet {
    if filters.hours_old.is_some() && filters.easy_apply {
        filters.easy_apply = false;
    }
    filters
}

fn active_categories(filters: &FilterSet) -> usize {
    [
        filters.hours_old.is_some(),
        filters.job_type.is_some() || filters.is_remote,
        filters.easy_apply,
    ]
    .into_iter()
    .filter(|active| *active)
    .count()
}
