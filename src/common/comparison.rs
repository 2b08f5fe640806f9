use super::{Domain, DomainRecord};

/// First domain whose id equals `id`, else whose name equals `name`, checked
/// per entry in listing order. Names compare case-insensitively, as DNS does.
/// Nothing matches when both are unset.
pub(crate) fn match_domain(
    domains: Vec<Domain>,
    id: Option<u64>,
    name: Option<&str>,
) -> Option<Domain> {
    if id.is_none() && name.is_none() {
        return None;
    }

    domains.into_iter().find(|domain| {
        (id.is_some() && domain.id == id)
            || name.is_some_and(|n| domain.name.eq_ignore_ascii_case(n))
    })
}

pub(crate) fn root_a_record(records: &[DomainRecord]) -> Option<&DomainRecord> {
    // Last match wins, same as a full scan that keeps overwriting.
    records.iter().rev().find(|record| record.is_root_a())
}
