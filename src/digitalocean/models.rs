use crate::common::{Domain, DomainRecord};

#[derive(serde::Deserialize)]
pub(crate) struct DomainsResponse {
    pub domains: Vec<Domain>,
}

#[derive(serde::Deserialize)]
pub(crate) struct DomainResponse {
    pub domain: Domain,
}

#[derive(serde::Deserialize)]
pub(crate) struct DomainRecordsResponse {
    pub domain_records: Vec<DomainRecord>,
}

#[derive(serde::Deserialize)]
pub(crate) struct DomainRecordResponse {
    pub domain_record: DomainRecord,
}

#[derive(serde::Serialize)]
pub(crate) struct CreateDomain<'a> {
    pub name: &'a str,
    pub ip_address: &'a str,
}

#[derive(serde::Serialize)]
pub(crate) struct UpdateRecord<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub name: &'a str,
    pub data: &'a str,
}
