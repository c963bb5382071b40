//! The tenant-scoped entity catalog.
//!
//! Exactly these six record types carry a tenant id and are subject to
//! interception. The enum is the allow-list; adding an entity type means
//! adding a variant, a record struct, and a `ScopedEntity` impl - all of
//! which the compiler checks.

use chrono::{DateTime, Utc};
use quota_enforcer::ResourceKind;
use uuid::Uuid;

/// The fixed set of tenant-scoped entity types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Station,
    Contractor,
    AuditRun,
    FormTemplate,
    Incident,
    Permit,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Station => "station",
            EntityKind::Contractor => "contractor",
            EntityKind::AuditRun => "audit_run",
            EntityKind::FormTemplate => "form_template",
            EntityKind::Incident => "incident",
            EntityKind::Permit => "permit",
        }
    }

    /// The quota counter this entity type consumes.
    #[must_use]
    pub fn resource_kind(self) -> ResourceKind {
        match self {
            EntityKind::Station => ResourceKind::Station,
            EntityKind::Contractor => ResourceKind::Contractor,
            EntityKind::AuditRun => ResourceKind::AuditRun,
            EntityKind::FormTemplate => ResourceKind::FormTemplate,
            EntityKind::Incident => ResourceKind::Incident,
            EntityKind::Permit => ResourceKind::Permit,
        }
    }
}

/// A persisted record that carries a tenant id.
///
/// The tenant id is immutable after creation: the repository injects it
/// on create and re-asserts it on every update, so no caller-supplied
/// value can move a row between tenants.
pub trait ScopedEntity:
    Clone + Send + Sync + serde::Serialize + serde::de::DeserializeOwned + 'static
{
    const KIND: EntityKind;

    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
    fn tenant_id(&self) -> Uuid;
    fn set_tenant_id(&mut self, tenant_id: Uuid);
    fn created_at(&self) -> DateTime<Utc>;
    fn set_updated_at(&mut self, at: DateTime<Utc>);
}

macro_rules! impl_scoped_entity {
    ($ty:ty, $kind:expr) => {
        impl ScopedEntity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> Uuid {
                self.id
            }

            fn set_id(&mut self, id: Uuid) {
                self.id = id;
            }

            fn tenant_id(&self) -> Uuid {
                self.tenant_id
            }

            fn set_tenant_id(&mut self, tenant_id: Uuid) {
                self.tenant_id = tenant_id;
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn set_updated_at(&mut self, at: DateTime<Utc>) {
                self.updated_at = at;
            }
        }
    };
}

/// A monitored site (fuel station, depot, plant).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Station {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub site_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    /// A draft row. The tenant id is a placeholder; the repository
    /// overwrites it from the bound context on create.
    #[must_use]
    pub fn new(name: impl Into<String>, site_code: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            name: name.into(),
            site_code: site_code.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// An external contractor admitted to tenant sites.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Contractor {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub company: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contractor {
    #[must_use]
    pub fn new(name: impl Into<String>, company: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            name: name.into(),
            company: company.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditRunStatus {
    Draft,
    InProgress,
    Completed,
}

/// One execution of an audit checklist.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditRun {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub status: AuditRunStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditRun {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            title: title.into(),
            status: AuditRunStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A reusable checklist/form definition. The schema body is opaque here;
/// form semantics live upstream.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormTemplate {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub schema: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormTemplate {
    #[must_use]
    pub fn new(title: impl Into<String>, schema: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            title: title.into(),
            schema,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A reported safety or compliance incident.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    #[must_use]
    pub fn new(title: impl Into<String>, severity: Severity) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            title: title.into(),
            severity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A work permit with an optional expiry.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Permit {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Permit {
    #[must_use]
    pub fn new(title: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            title: title.into(),
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }
}

impl_scoped_entity!(Station, EntityKind::Station);
impl_scoped_entity!(Contractor, EntityKind::Contractor);
impl_scoped_entity!(AuditRun, EntityKind::AuditRun);
impl_scoped_entity!(FormTemplate, EntityKind::FormTemplate);
impl_scoped_entity!(Incident, EntityKind::Incident);
impl_scoped_entity!(Permit, EntityKind::Permit);
