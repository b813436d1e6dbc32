//! The automation-platform fixture domain.
//!
//! A realistic closed set of record kinds in the shape the mapping
//! layer was built for: a global owning kind (projects), scoped
//! resource kinds (environments, inventories, repositories), a scoped
//! kind referencing the others (templates), a scheduling kind resolved
//! one hop further by the reference aggregator, a string-keyed kind
//! (access tokens), and a system-keyed inverted-sequence kind (events).

use schemadb_core::{
    FieldKind, FieldSpec, FieldValue, IndirectReferrer, ObjectStore, Record, ReferrerConfig,
    Schema,
};
use schemadb_kv::MemoryEngine;

/// Builds an [`ObjectStore`] over a fresh in-memory engine with the
/// platform's integrity guards and referrer configuration.
#[must_use]
pub fn platform_store() -> ObjectStore {
    ObjectStore::new(Box::new(MemoryEngine::new()))
        .with_integrity_guards(&[&TEMPLATE, &ENVIRONMENT, &INVENTORY, &REPOSITORY])
        .with_referrer_config(platform_referrers())
}

/// The platform's referrer configuration: templates, repositories, and
/// inventories are summarized directly; schedules resolve to the
/// template they schedule.
#[must_use]
pub fn platform_referrers() -> ReferrerConfig {
    ReferrerConfig {
        direct: vec![&TEMPLATE, &REPOSITORY, &INVENTORY],
        indirect: vec![IndirectReferrer {
            via: &SCHEDULE,
            hop_field: "template_id",
            target: &TEMPLATE,
        }],
    }
}

/// A top-level owning container. Global; everything else is scoped to
/// a project id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    /// Primary identifier (0 = assign on create).
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Creation timestamp, seconds since the epoch.
    pub created: i64,
}

/// Schema for [`Project`].
pub static PROJECT: Schema = Schema {
    namespace: "project",
    global: true,
    primary: Some("id"),
    inverted_sequence: false,
    sortable: &["name", "created"],
    reference_suffix: Some("project_id"),
    display_field: Some("name"),
    fields: &[
        FieldSpec {
            wire: "id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "name",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "created",
            kind: FieldKind::Int,
        },
    ],
};

impl Record for Project {
    fn schema() -> &'static Schema {
        &PROJECT
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "id" => Some(FieldValue::Int(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "created" => Some(FieldValue::Int(self.created)),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "id" => {
                if let Some(n) = value.as_int() {
                    self.id = n;
                }
            }
            "name" => {
                if let Some(s) = value.into_text() {
                    self.name = s;
                }
            }
            "created" => {
                if let Some(n) = value.as_int() {
                    self.created = n;
                }
            }
            _ => {}
        }
    }
}

/// A set of variables templates run against. Scoped to a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    /// Primary identifier (0 = assign on create).
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Display name.
    pub name: String,
    /// Serialized variable payload.
    pub payload: String,
}

/// Schema for [`Environment`].
pub static ENVIRONMENT: Schema = Schema {
    namespace: "environment",
    global: false,
    primary: Some("id"),
    inverted_sequence: false,
    sortable: &["name"],
    reference_suffix: Some("environment_id"),
    display_field: Some("name"),
    fields: &[
        FieldSpec {
            wire: "id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "project_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "name",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "payload",
            kind: FieldKind::Text,
        },
    ],
};

impl Record for Environment {
    fn schema() -> &'static Schema {
        &ENVIRONMENT
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "id" => Some(FieldValue::Int(self.id)),
            "project_id" => Some(FieldValue::Int(self.project_id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "payload" => Some(FieldValue::Text(self.payload.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "id" => {
                if let Some(n) = value.as_int() {
                    self.id = n;
                }
            }
            "project_id" => {
                if let Some(n) = value.as_int() {
                    self.project_id = n;
                }
            }
            "name" => {
                if let Some(s) = value.into_text() {
                    self.name = s;
                }
            }
            "payload" => {
                if let Some(s) = value.into_text() {
                    self.payload = s;
                }
            }
            _ => {}
        }
    }
}

/// A host inventory. Scoped to a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    /// Primary identifier (0 = assign on create).
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Display name.
    pub name: String,
    /// Inventory source kind (static, file, ...).
    pub kind: String,
    /// Inventory contents.
    pub inventory: String,
}

/// Schema for [`Inventory`].
pub static INVENTORY: Schema = Schema {
    namespace: "inventory",
    global: false,
    primary: Some("id"),
    inverted_sequence: false,
    sortable: &["name"],
    reference_suffix: Some("inventory_id"),
    display_field: Some("name"),
    fields: &[
        FieldSpec {
            wire: "id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "project_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "name",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "type",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "inventory",
            kind: FieldKind::Text,
        },
    ],
};

impl Record for Inventory {
    fn schema() -> &'static Schema {
        &INVENTORY
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "id" => Some(FieldValue::Int(self.id)),
            "project_id" => Some(FieldValue::Int(self.project_id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "type" => Some(FieldValue::Text(self.kind.clone())),
            "inventory" => Some(FieldValue::Text(self.inventory.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "id" => {
                if let Some(n) = value.as_int() {
                    self.id = n;
                }
            }
            "project_id" => {
                if let Some(n) = value.as_int() {
                    self.project_id = n;
                }
            }
            "name" => {
                if let Some(s) = value.into_text() {
                    self.name = s;
                }
            }
            "type" => {
                if let Some(s) = value.into_text() {
                    self.kind = s;
                }
            }
            "inventory" => {
                if let Some(s) = value.into_text() {
                    self.inventory = s;
                }
            }
            _ => {}
        }
    }
}

/// Authentication settings embedded in a repository. No wire key of its
/// own; its fields flatten into the repository document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryAuth {
    /// Authentication method (none, key, password).
    pub method: String,
    /// Key record referenced by the method, if any.
    pub key_id: Option<i64>,
}

/// A source-control repository. Scoped to a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repository {
    /// Primary identifier (0 = assign on create).
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Display name.
    pub name: String,
    /// Clone URL.
    pub git_url: String,
    /// Embedded authentication settings.
    pub auth: RepositoryAuth,
}

static REPOSITORY_AUTH: &[FieldSpec] = &[
    FieldSpec {
        wire: "auth_method",
        kind: FieldKind::Text,
    },
    FieldSpec {
        wire: "auth_key_id",
        kind: FieldKind::Int,
    },
];

/// Schema for [`Repository`].
pub static REPOSITORY: Schema = Schema {
    namespace: "repository",
    global: false,
    primary: Some("id"),
    inverted_sequence: false,
    sortable: &["name"],
    reference_suffix: Some("repository_id"),
    display_field: Some("name"),
    fields: &[
        FieldSpec {
            wire: "id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "project_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "name",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "git_url",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "auth",
            kind: FieldKind::Embedded(REPOSITORY_AUTH),
        },
    ],
};

impl Record for Repository {
    fn schema() -> &'static Schema {
        &REPOSITORY
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "id" => Some(FieldValue::Int(self.id)),
            "project_id" => Some(FieldValue::Int(self.project_id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "git_url" => Some(FieldValue::Text(self.git_url.clone())),
            "auth_method" => Some(FieldValue::Text(self.auth.method.clone())),
            "auth_key_id" => Some(self.auth.key_id.into()),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "id" => {
                if let Some(n) = value.as_int() {
                    self.id = n;
                }
            }
            "project_id" => {
                if let Some(n) = value.as_int() {
                    self.project_id = n;
                }
            }
            "name" => {
                if let Some(s) = value.into_text() {
                    self.name = s;
                }
            }
            "git_url" => {
                if let Some(s) = value.into_text() {
                    self.git_url = s;
                }
            }
            "auth_method" => {
                if let Some(s) = value.into_text() {
                    self.auth.method = s;
                }
            }
            "auth_key_id" => self.auth.key_id = value.as_int(),
            _ => {}
        }
    }
}

/// A runnable workflow definition tying the other kinds together.
/// Scoped to a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    /// Primary identifier (0 = assign on create).
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Display name.
    pub name: String,
    /// Playbook path within the repository.
    pub playbook: String,
    /// Environment the template runs against, if any.
    pub environment_id: Option<i64>,
    /// Inventory the template runs against, if any.
    pub inventory_id: Option<i64>,
    /// Repository the playbook comes from, if any.
    pub repository_id: Option<i64>,
    /// Template whose build artifact this template deploys, if any.
    pub build_template_id: Option<i64>,
}

/// Schema for [`Template`].
pub static TEMPLATE: Schema = Schema {
    namespace: "template",
    global: false,
    primary: Some("id"),
    inverted_sequence: false,
    sortable: &["name", "playbook"],
    reference_suffix: Some("template_id"),
    display_field: Some("name"),
    fields: &[
        FieldSpec {
            wire: "id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "project_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "name",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "playbook",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "environment_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "inventory_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "repository_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "build_template_id",
            kind: FieldKind::Int,
        },
    ],
};

impl Record for Template {
    fn schema() -> &'static Schema {
        &TEMPLATE
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "id" => Some(FieldValue::Int(self.id)),
            "project_id" => Some(FieldValue::Int(self.project_id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "playbook" => Some(FieldValue::Text(self.playbook.clone())),
            "environment_id" => Some(self.environment_id.into()),
            "inventory_id" => Some(self.inventory_id.into()),
            "repository_id" => Some(self.repository_id.into()),
            "build_template_id" => Some(self.build_template_id.into()),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "id" => {
                if let Some(n) = value.as_int() {
                    self.id = n;
                }
            }
            "project_id" => {
                if let Some(n) = value.as_int() {
                    self.project_id = n;
                }
            }
            "name" => {
                if let Some(s) = value.into_text() {
                    self.name = s;
                }
            }
            "playbook" => {
                if let Some(s) = value.into_text() {
                    self.playbook = s;
                }
            }
            "environment_id" => self.environment_id = value.as_int(),
            "inventory_id" => self.inventory_id = value.as_int(),
            "repository_id" => self.repository_id = value.as_int(),
            "build_template_id" => self.build_template_id = value.as_int(),
            _ => {}
        }
    }
}

/// A recurring run of a template. Scoped to a project. The reference
/// aggregator resolves schedules one hop further, to the template they
/// schedule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    /// Primary identifier (0 = assign on create).
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Cron expression.
    pub cron_format: String,
    /// The template this schedule runs.
    pub template_id: i64,
}

/// Schema for [`Schedule`].
pub static SCHEDULE: Schema = Schema {
    namespace: "schedule",
    global: false,
    primary: Some("id"),
    inverted_sequence: false,
    sortable: &[],
    reference_suffix: None,
    display_field: None,
    fields: &[
        FieldSpec {
            wire: "id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "project_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "cron_format",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "template_id",
            kind: FieldKind::Int,
        },
    ],
};

impl Record for Schedule {
    fn schema() -> &'static Schema {
        &SCHEDULE
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "id" => Some(FieldValue::Int(self.id)),
            "project_id" => Some(FieldValue::Int(self.project_id)),
            "cron_format" => Some(FieldValue::Text(self.cron_format.clone())),
            "template_id" => Some(FieldValue::Int(self.template_id)),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "id" => {
                if let Some(n) = value.as_int() {
                    self.id = n;
                }
            }
            "project_id" => {
                if let Some(n) = value.as_int() {
                    self.project_id = n;
                }
            }
            "cron_format" => {
                if let Some(s) = value.into_text() {
                    self.cron_format = s;
                }
            }
            "template_id" => {
                if let Some(n) = value.as_int() {
                    self.template_id = n;
                }
            }
            _ => {}
        }
    }
}

/// An API access token, keyed by its opaque string value. Global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessToken {
    /// The token string; the primary key, supplied by the caller.
    pub id: String,
    /// Owning user.
    pub user_id: i64,
    /// Whether the token has been revoked.
    pub expired: bool,
}

/// Schema for [`AccessToken`].
pub static ACCESS_TOKEN: Schema = Schema {
    namespace: "token",
    global: true,
    primary: Some("id"),
    inverted_sequence: false,
    sortable: &[],
    reference_suffix: None,
    display_field: None,
    fields: &[
        FieldSpec {
            wire: "id",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "user_id",
            kind: FieldKind::Int,
        },
        FieldSpec {
            wire: "expired",
            kind: FieldKind::Bool,
        },
    ],
};

impl Record for AccessToken {
    fn schema() -> &'static Schema {
        &ACCESS_TOKEN
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "user_id" => Some(FieldValue::Int(self.user_id)),
            "expired" => Some(FieldValue::Bool(self.expired)),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "id" => {
                if let Some(s) = value.into_text() {
                    self.id = s;
                }
            }
            "user_id" => {
                if let Some(n) = value.as_int() {
                    self.user_id = n;
                }
            }
            "expired" => {
                if let Some(b) = value.as_bool() {
                    self.expired = b;
                }
            }
            _ => {}
        }
    }
}

/// An audit-log entry. Global, system-keyed, inverted sequence so the
/// newest entries come first in iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    /// Kind of object the event concerns.
    pub object_type: String,
    /// Human-readable description.
    pub description: String,
}

/// Schema for [`Event`].
pub static EVENT: Schema = Schema {
    namespace: "event",
    global: true,
    primary: None,
    inverted_sequence: true,
    sortable: &[],
    reference_suffix: None,
    display_field: None,
    fields: &[
        FieldSpec {
            wire: "object_type",
            kind: FieldKind::Text,
        },
        FieldSpec {
            wire: "description",
            kind: FieldKind::Text,
        },
    ],
};

impl Record for Event {
    fn schema() -> &'static Schema {
        &EVENT
    }

    fn field(&self, wire: &str) -> Option<FieldValue> {
        match wire {
            "object_type" => Some(FieldValue::Text(self.object_type.clone())),
            "description" => Some(FieldValue::Text(self.description.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, wire: &str, value: FieldValue) {
        match wire {
            "object_type" => {
                if let Some(s) = value.into_text() {
                    self.object_type = s;
                }
            }
            "description" => {
                if let Some(s) = value.into_text() {
                    self.description = s;
                }
            }
            _ => {}
        }
    }
}
