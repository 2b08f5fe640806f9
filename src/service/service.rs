use std::net::IpAddr;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use snafu::prelude::*;

use crate::common::{
    match_domain, root_a_record, ApiResponse, DecodeSnafu, DesiredState, Domain, NotFoundSnafu,
    Outcome, Params, ProviderSnafu, Result, Transport, ValidationSnafu, ZoneRecordMissingSnafu,
    RECORD_KIND_A, ROOT_RECORD_NAME,
};
use crate::digitalocean::models::{
    CreateDomain, DomainRecordResponse, DomainRecordsResponse, DomainResponse, DomainsResponse,
    UpdateRecord,
};

const HTTP_CREATED: u16 = 201;

/// Decode a successful response body, or surface the provider's rejection.
fn expect_json<R: DeserializeOwned>(resp: ApiResponse, what: &str) -> Result<R> {
    ensure!(
        resp.is_success(),
        ProviderSnafu {
            status: resp.status,
            message: resp.message(),
        }
    );
    serde_json::from_value(resp.body)
        .boxed_local()
        .context(DecodeSnafu {
            message: format!("Failed to deserialize {what} response"),
        })
}

fn to_body(value: impl serde::Serialize) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .boxed_local()
        .context(DecodeSnafu {
            message: "Failed to serialize request body",
        })
}

/// One-shot reconciliation of a single domain against the provider.
pub struct DomainReconciler<'t> {
    transport: &'t dyn Transport,
    dry_run: bool,
}

impl<'t> DomainReconciler<'t> {
    pub fn new(transport: &'t dyn Transport) -> Self {
        Self {
            transport,
            dry_run: false,
        }
    }

    /// Perform every read but skip writes, reporting what would change.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn find(&self, id: Option<u64>, name: Option<&str>) -> Result<Option<Domain>> {
        if id.is_none() && name.is_none() {
            return Ok(None);
        }

        let resp: DomainsResponse = expect_json(self.transport.get("domains/")?, "domain list")?;
        let found = match_domain(resp.domains, id, name);

        tracing::debug!(
            id = id,
            name = name,
            found = found.is_some(),
            "Looked up domain"
        );
        Ok(found)
    }

    pub fn create(&self, name: &str, ip: &str) -> Result<Domain> {
        tracing::info!(domain = name, ip = ip, "Creating domain");

        let body = to_body(CreateDomain {
            name,
            ip_address: ip,
        })?;
        let resp = self.transport.post("domains/", body)?;

        // Anything but 201 carries the provider's reason in its body.
        ensure!(
            resp.status == HTTP_CREATED,
            ProviderSnafu {
                status: resp.status,
                message: resp.message(),
            }
        );
        let created: DomainResponse = expect_json(resp, "create domain")?;

        tracing::debug!(domain = created.domain.name, id = created.domain.id, "Created domain");
        Ok(created.domain)
    }

    /// Point the root A record of `domain` at `ip`. Returns whether a change
    /// was made and the domain as the provider now reports it.
    pub fn reconcile_a_record(&self, domain: &Domain, ip: &str) -> Result<(bool, Domain)> {
        let key = domain.key();
        let resp: DomainRecordsResponse = expect_json(
            self.transport.get(&format!("domains/{key}/records/"))?,
            "domain records",
        )?;

        let record = root_a_record(&resp.domain_records).context(ZoneRecordMissingSnafu {
            domain: domain.name.as_str(),
        })?;

        if record.data == ip {
            tracing::info!(domain = domain.name, ip = ip, "No changes detected");
            return Ok((false, domain.clone()));
        }

        if self.dry_run {
            tracing::info!(
                domain = domain.name,
                record_id = record.id,
                from = record.data,
                to = ip,
                "Dry run: would update root A record"
            );
            return Ok((true, domain.clone()));
        }

        tracing::info!(
            domain = domain.name,
            record_id = record.id,
            from = record.data,
            to = ip,
            "Updating root A record"
        );

        let body = to_body(UpdateRecord {
            kind: RECORD_KIND_A,
            name: ROOT_RECORD_NAME,
            data: ip,
        })?;
        let updated: DomainRecordResponse = expect_json(
            self.transport
                .put(&format!("domains/{key}/records/{}", record.id), body)?,
            "update record",
        )?;

        tracing::debug!(
            domain = domain.name,
            record_id = updated.domain_record.id,
            data = updated.domain_record.data,
            "Updated root A record"
        );

        let refreshed = self.find(domain.id, Some(&domain.name))?;
        Ok((true, refreshed.unwrap_or_else(|| domain.clone())))
    }

    pub fn destroy(&self, domain: &Domain) -> Result<bool> {
        tracing::info!(domain = domain.name, id = domain.id, "Deleting domain");

        let resp = self.transport.delete(&format!("domains/{}", domain.key()))?;
        ensure!(
            resp.is_success(),
            ProviderSnafu {
                status: resp.status,
                message: resp.message(),
            }
        );

        tracing::debug!(domain = domain.name, "Deleted domain");
        Ok(true)
    }

    pub fn reconcile(&self, params: &Params) -> Result<Outcome> {
        validate(params)?;

        let name = params.name.as_deref();
        let domain = self.find(params.id, name)?;

        match (params.state, domain) {
            (DesiredState::Present, None) => {
                let name = name.context(ValidationSnafu {
                    message: "name is required to create a domain",
                })?;
                // validate() guarantees an ip for state=present
                let ip = params.ip.as_deref().unwrap_or_default();

                let domain = if self.dry_run {
                    tracing::info!(domain = name, ip = ip, "Dry run: would create domain");
                    Domain {
                        id: None,
                        name: name.to_string(),
                        ip: Some(ip.to_string()),
                        ttl: None,
                    }
                } else {
                    self.create(name, ip)?
                };

                Ok(Outcome {
                    changed: true,
                    domain: Some(domain),
                })
            }
            (DesiredState::Present, Some(domain)) => {
                let ip = params.ip.as_deref().unwrap_or_default();
                let (changed, domain) = self.reconcile_a_record(&domain, ip)?;
                Ok(Outcome {
                    changed,
                    domain: Some(domain),
                })
            }
            (DesiredState::Absent, Some(domain)) => {
                let changed = if self.dry_run {
                    tracing::info!(domain = domain.name, "Dry run: would delete domain");
                    true
                } else {
                    self.destroy(&domain)?
                };
                Ok(Outcome {
                    changed,
                    domain: None,
                })
            }
            (DesiredState::Absent, None) => NotFoundSnafu {
                message: "Domain not found.",
            }
            .fail(),
        }
    }
}

/// Reject parameters that could never reconcile, before any network call.
pub fn validate(params: &Params) -> Result<()> {
    ensure!(
        params.id.is_some() || params.name.is_some(),
        ValidationSnafu {
            message: "one of the following is required: id, name",
        }
    );

    if let Some(name) = &params.name {
        let valid = matches!(url::Host::parse(name), Ok(url::Host::Domain(_)));
        ensure!(
            valid,
            ValidationSnafu {
                message: format!("name {name} is not a valid domain name"),
            }
        );
    }

    match (params.state, &params.ip) {
        (DesiredState::Present, None) => ValidationSnafu {
            message: "ip is required when state is present",
        }
        .fail(),
        (_, Some(ip)) => IpAddr::from_str(ip).map(|_| ()).map_err(|err| {
            ValidationSnafu {
                message: format!("ip {ip} is not a valid IP address: {err}"),
            }
            .build()
        }),
        (DesiredState::Absent, None) => Ok(()),
    }
}
