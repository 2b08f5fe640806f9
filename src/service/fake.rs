//! In-memory stand-in for the DigitalOcean API.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{json, Value};

use crate::common::{ApiResponse, Domain, DomainRecord, Result, Transport};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

impl Call {
    pub fn new(method: &str, path: &str, body: Option<Value>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body,
        }
    }
}

fn not_found() -> ApiResponse {
    ApiResponse {
        status: 404,
        body: json!({
            "id": "not_found",
            "message": "The resource you were accessing could not be found."
        }),
    }
}

fn rejection(status: u16, message: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: json!({"id": "rejected", "message": message}),
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    domains: RefCell<Vec<Domain>>,
    records: RefCell<HashMap<u64, Vec<DomainRecord>>>,
    calls: RefCell<Vec<Call>>,
    next_id: RefCell<u64>,
    listing: Option<ApiResponse>,
    create_rejection: Option<ApiResponse>,
    update_rejection: Option<ApiResponse>,
    delete_rejection: Option<ApiResponse>,
}

impl FakeApi {
    fn allocate_id(&self) -> u64 {
        let mut next = self.next_id.borrow_mut();
        *next += 1;
        1000 + *next
    }

    fn seed_records(&self, domain_id: u64, ip: &str) {
        let records = vec![
            DomainRecord {
                id: self.allocate_id(),
                name: "@".into(),
                kind: "NS".into(),
                data: "ns1.digitalocean.com".into(),
                ttl: Some(1800),
            },
            DomainRecord {
                id: self.allocate_id(),
                name: "@".into(),
                kind: "A".into(),
                data: ip.into(),
                ttl: Some(1800),
            },
        ];
        self.records.borrow_mut().insert(domain_id, records);
    }

    pub fn with_domain(self, id: u64, name: &str, ip: &str) -> Self {
        self.domains.borrow_mut().push(Domain {
            id: Some(id),
            name: name.into(),
            ip: None,
            ttl: Some(1800),
        });
        self.seed_records(id, ip);
        self
    }

    pub fn with_listing(mut self, body: Value) -> Self {
        self.listing = Some(ApiResponse { status: 200, body });
        self
    }

    pub fn with_listing_status(mut self, status: u16, message: &str) -> Self {
        self.listing = Some(rejection(status, message));
        self
    }

    pub fn reject_create(mut self, status: u16, message: &str) -> Self {
        self.create_rejection = Some(rejection(status, message));
        self
    }

    pub fn reject_update(mut self, status: u16, message: &str) -> Self {
        self.update_rejection = Some(rejection(status, message));
        self
    }

    pub fn reject_delete(mut self, status: u16, message: &str) -> Self {
        self.delete_rejection = Some(rejection(status, message));
        self
    }

    pub fn set_records(&self, domain_id: u64, records: Vec<DomainRecord>) {
        self.records.borrow_mut().insert(domain_id, records);
    }

    pub fn root_record(&self, domain_id: u64) -> Option<DomainRecord> {
        self.records
            .borrow()
            .get(&domain_id)?
            .iter()
            .find(|r| r.is_root_a())
            .cloned()
    }

    pub fn domain_names(&self) -> Vec<String> {
        self.domains.borrow().iter().map(|d| d.name.clone()).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != "GET")
            .collect()
    }

    /// Resolve a path segment (id or name) to a domain id.
    fn resolve(&self, key: &str) -> Option<u64> {
        self.domains
            .borrow()
            .iter()
            .find(|d| d.key() == key || d.name == key)
            .and_then(|d| d.id)
    }

    fn record(&self, method: &str, path: &str, body: Option<&Value>) {
        self.calls
            .borrow_mut()
            .push(Call::new(method, path, body.cloned()));
    }

    fn segments(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

impl Transport for FakeApi {
    fn get(&self, path: &str) -> Result<ApiResponse> {
        self.record("GET", path, None);

        Ok(match Self::segments(path).as_slice() {
            ["domains"] => match &self.listing {
                Some(listing) => listing.clone(),
                None => {
                    let domains = self.domains.borrow().clone();
                    ApiResponse {
                        status: 200,
                        body: json!({ "domains": domains }),
                    }
                }
            },
            ["domains", key, "records"] => match self.resolve(key) {
                Some(id) => {
                    let records = self.records.borrow().get(&id).cloned().unwrap_or_default();
                    ApiResponse {
                        status: 200,
                        body: json!({ "domain_records": records }),
                    }
                }
                None => not_found(),
            },
            _ => not_found(),
        })
    }

    fn post(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.record("POST", path, Some(&body));

        if let Some(rejection) = &self.create_rejection {
            return Ok(rejection.clone());
        }

        let name = body["name"].as_str().unwrap_or_default().to_string();
        let ip = body["ip_address"].as_str().unwrap_or_default().to_string();
        let id = self.allocate_id();
        let domain = Domain {
            id: Some(id),
            name,
            ip: None,
            ttl: Some(1800),
        };
        self.domains.borrow_mut().push(domain.clone());
        self.seed_records(id, &ip);

        Ok(ApiResponse {
            status: 201,
            body: json!({ "domain": domain }),
        })
    }

    fn put(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.record("PUT", path, Some(&body));

        if let Some(rejection) = &self.update_rejection {
            return Ok(rejection.clone());
        }

        let segments = Self::segments(path);
        let ["domains", key, "records", record_id] = segments.as_slice() else {
            return Ok(not_found());
        };
        let Some(domain_id) = self.resolve(key) else {
            return Ok(not_found());
        };

        let mut records = self.records.borrow_mut();
        let record = records
            .get_mut(&domain_id)
            .and_then(|rs| rs.iter_mut().find(|r| r.id.to_string() == *record_id));
        Ok(match record {
            Some(record) => {
                if let Some(data) = body["data"].as_str() {
                    record.data = data.to_string();
                }
                if let Some(name) = body["name"].as_str() {
                    record.name = name.to_string();
                }
                ApiResponse {
                    status: 200,
                    body: json!({ "domain_record": record }),
                }
            }
            None => not_found(),
        })
    }

    fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.record("DELETE", path, None);

        if let Some(rejection) = &self.delete_rejection {
            return Ok(rejection.clone());
        }

        let segments = Self::segments(path);
        let ["domains", key] = segments.as_slice() else {
            return Ok(not_found());
        };
        let Some(domain_id) = self.resolve(key) else {
            return Ok(not_found());
        };

        self.domains.borrow_mut().retain(|d| d.id != Some(domain_id));
        self.records.borrow_mut().remove(&domain_id);

        Ok(ApiResponse {
            status: 204,
            body: Value::Null,
        })
    }
}
