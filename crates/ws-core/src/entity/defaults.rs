//! Built-in entity configurations.
//!
//! Used when no entity config file is supplied. Field lists are
//! intentionally small; deployments are expected to ship their own file.

use std::collections::{BTreeMap, BTreeSet};

use super::config::{
    ActionMethod, ActionSpec, DeleteMode, EntityConfig, Feature, FieldGroups, FieldRender,
    FieldSpec, FieldType, FilterSpec, FilterType, ProfileSpec, SelectOption,
};
use crate::undo::UndoPolicy;
use crate::widget::ProfileKind;

pub fn builtin_configs() -> Vec<EntityConfig> {
    vec![
        contacts(),
        leads(),
        companies(),
        deals(),
        sales(),
        tickets(),
        tasks(),
    ]
}

fn base(entity_type: &str, title: &str, profile: Option<(ProfileKind, &str, &str)>) -> EntityConfig {
    EntityConfig {
        entity_type: entity_type.to_string(),
        title: title.to_string(),
        api_endpoint: entity_type.to_string(),
        data_key: entity_type.to_string(),
        id_field: "id".to_string(),
        default_filters: BTreeMap::new(),
        features: BTreeSet::new(),
        fields: FieldGroups::default(),
        filters: BTreeMap::new(),
        custom_actions: Vec::new(),
        delete_mode: DeleteMode::Hard,
        profile: profile.map(|(kind, stem, id_field)| ProfileSpec {
            kind,
            stem: stem.to_string(),
            id_field: id_field.to_string(),
        }),
        undo_policy: UndoPolicy::Generic,
        undo_window_secs: None,
        items_per_page: 10,
    }
}

fn status_filter(options: &[(&str, &str)]) -> FilterSpec {
    FilterSpec {
        label: "Status".to_string(),
        filter_type: FilterType::Select,
        options: options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect(),
        source: None,
    }
}

fn features(list: &[Feature]) -> BTreeSet<Feature> {
    list.iter().copied().collect()
}

pub fn contacts() -> EntityConfig {
    let statuses = [("active", "Active"), ("inactive", "Inactive")];
    let mut config = base("contacts", "Contacts", Some((ProfileKind::Contact, "contact", "contactId")));
    config.default_filters.insert("status".to_string(), String::new());
    config.features = features(&[
        Feature::ListManagement,
        Feature::BulkSelection,
        Feature::Filtering,
        Feature::FilterOptions,
        Feature::UndoDelete,
        Feature::Tags,
    ]);
    config.fields = FieldGroups {
        display: vec![
            FieldSpec::new("name", FieldType::Text, "Name"),
            FieldSpec::new("email", FieldType::Email, "Email"),
            FieldSpec::new("companyId", FieldType::Select, "Company")
                .with_source("companies", "name"),
            FieldSpec::new("status", FieldType::Status, "Status")
                .with_status_colors(&[("active", "green"), ("inactive", "gray")]),
            FieldSpec::new("tags", FieldType::Tags, "Tags").with_render(FieldRender::Join),
        ],
        form: vec![
            FieldSpec::new("name", FieldType::Text, "Name").required(),
            FieldSpec::new("email", FieldType::Email, "Email"),
            FieldSpec::new("phone", FieldType::Phone, "Phone"),
            FieldSpec::new("companyId", FieldType::Select, "Company")
                .with_source("companies", "name"),
            FieldSpec::new("status", FieldType::Select, "Status").with_options(&statuses),
            FieldSpec::new("tags", FieldType::Tags, "Tags"),
        ],
    };
    config
        .filters
        .insert("status".to_string(), status_filter(&statuses));
    config
}

pub fn leads() -> EntityConfig {
    let statuses = [("new", "New"), ("qualified", "Qualified"), ("lost", "Lost")];
    let mut config = base("leads", "Leads", Some((ProfileKind::Lead, "lead", "leadId")));
    config.features = features(&[
        Feature::ListManagement,
        Feature::BulkSelection,
        Feature::Filtering,
        Feature::UndoDelete,
        Feature::CustomActions,
    ]);
    config.fields = FieldGroups {
        display: vec![
            FieldSpec::new("name", FieldType::Text, "Name"),
            FieldSpec::new("source", FieldType::Text, "Source").with_render(FieldRender::Capitalize),
            FieldSpec::new("status", FieldType::Status, "Status").with_status_colors(&[
                ("new", "blue"),
                ("qualified", "green"),
                ("lost", "red"),
            ]),
            FieldSpec::new("createdAt", FieldType::Date, "Created"),
        ],
        form: vec![
            FieldSpec::new("name", FieldType::Text, "Name").required(),
            FieldSpec::new("email", FieldType::Email, "Email"),
            FieldSpec::new("source", FieldType::Text, "Source"),
            FieldSpec::new("status", FieldType::Select, "Status").with_options(&statuses),
            FieldSpec::new("notes", FieldType::Textarea, "Notes"),
        ],
    };
    config
        .filters
        .insert("status".to_string(), status_filter(&statuses));
    config.custom_actions.push(ActionSpec {
        key: "convert".to_string(),
        label: "Convert to contact".to_string(),
        path: "convert".to_string(),
        method: ActionMethod::Post,
        confirm: Some("Convert this lead into a contact?".to_string()),
    });
    config
}

pub fn companies() -> EntityConfig {
    let mut config = base(
        "companies",
        "Companies",
        Some((ProfileKind::Company, "company", "companyId")),
    );
    config.features = features(&[Feature::ListManagement, Feature::BulkSelection]);
    config.fields = FieldGroups {
        display: vec![
            FieldSpec::new("name", FieldType::Text, "Name"),
            FieldSpec::new("industry", FieldType::Text, "Industry"),
            FieldSpec::new("website", FieldType::Text, "Website"),
        ],
        form: vec![
            FieldSpec::new("name", FieldType::Text, "Name").required(),
            FieldSpec::new("industry", FieldType::Text, "Industry"),
            FieldSpec::new("website", FieldType::Text, "Website"),
        ],
    };
    config
}

pub fn deals() -> EntityConfig {
    let stages = [("open", "Open"), ("won", "Won"), ("lost", "Lost")];
    let mut config = base("deals", "Deals", Some((ProfileKind::Deal, "deal", "dealId")));
    config.features = features(&[Feature::Filtering, Feature::UndoDelete]);
    config.fields = FieldGroups {
        display: vec![
            FieldSpec::new("title", FieldType::Text, "Title"),
            FieldSpec::new("value", FieldType::Currency, "Value"),
            FieldSpec::new("stage", FieldType::Status, "Stage"),
            FieldSpec::new("closeDate", FieldType::Date, "Close date"),
        ],
        form: vec![
            FieldSpec::new("title", FieldType::Text, "Title").required(),
            FieldSpec::new("value", FieldType::Currency, "Value"),
            FieldSpec::new("stage", FieldType::Select, "Stage").with_options(&stages),
            FieldSpec::new("closeDate", FieldType::Date, "Close date"),
        ],
    };
    config.filters.insert(
        "stage".to_string(),
        FilterSpec {
            label: "Stage".to_string(),
            filter_type: FilterType::Select,
            options: status_filter(&stages).options,
            source: None,
        },
    );
    config
}

/// The sales profile id field is `saleId`, not `salesId`.
pub fn sales() -> EntityConfig {
    let mut config = base("sales", "Sales", Some((ProfileKind::Sale, "sales", "saleId")));
    config.features = features(&[Feature::UndoDelete]);
    config.fields = FieldGroups {
        display: vec![
            FieldSpec::new("reference", FieldType::Text, "Reference"),
            FieldSpec::new("total", FieldType::Currency, "Total"),
            FieldSpec::new("soldAt", FieldType::Date, "Date"),
        ],
        form: vec![
            FieldSpec::new("reference", FieldType::Text, "Reference").required(),
            FieldSpec::new("contactId", FieldType::Select, "Customer")
                .with_source("contacts", "name"),
            FieldSpec::new("total", FieldType::Currency, "Total").required(),
            FieldSpec::new("soldAt", FieldType::Date, "Date"),
        ],
    };
    config
}

pub fn tickets() -> EntityConfig {
    let statuses = [("open", "Open"), ("pending", "Pending"), ("closed", "Closed")];
    let mut config = base("tickets", "Tickets", Some((ProfileKind::Ticket, "ticket", "ticketId")));
    config.delete_mode = DeleteMode::Archive;
    config.features = features(&[Feature::Filtering, Feature::FilterOptions, Feature::UndoDelete]);
    config.fields = FieldGroups {
        display: vec![
            FieldSpec::new("subject", FieldType::Text, "Subject").with_render(FieldRender::Truncate(60)),
            FieldSpec::new("priority", FieldType::Text, "Priority").with_render(FieldRender::Uppercase),
            FieldSpec::new("status", FieldType::Status, "Status"),
            FieldSpec::new("updatedAt", FieldType::Date, "Updated").with_render(FieldRender::DateTime),
        ],
        form: vec![
            FieldSpec::new("subject", FieldType::Text, "Subject").required(),
            FieldSpec::new("description", FieldType::Textarea, "Description"),
            FieldSpec::new("priority", FieldType::Select, "Priority")
                .with_options(&[("low", "Low"), ("normal", "Normal"), ("high", "High")]),
            FieldSpec::new("status", FieldType::Select, "Status").with_options(&statuses),
        ],
    };
    config
        .filters
        .insert("status".to_string(), status_filter(&statuses));
    config
}

/// Tasks use a shorter undo window than the generic path.
pub fn tasks() -> EntityConfig {
    let mut config = base("tasks", "Tasks", Some((ProfileKind::Task, "task", "taskId")));
    config.delete_mode = DeleteMode::Archive;
    config.features = features(&[Feature::UndoDelete, Feature::BulkSelection]);
    config.undo_policy = UndoPolicy::Tasks;
    config.fields = FieldGroups {
        display: vec![
            FieldSpec::new("title", FieldType::Text, "Title"),
            FieldSpec::new("dueDate", FieldType::Date, "Due"),
            FieldSpec::new("done", FieldType::Checkbox, "Done"),
        ],
        form: vec![
            FieldSpec::new("title", FieldType::Text, "Title").required(),
            FieldSpec::new("dueDate", FieldType::Date, "Due"),
            FieldSpec::new("assigneeId", FieldType::Select, "Assignee")
                .with_source("users", "fullName"),
            FieldSpec::new("done", FieldType::Checkbox, "Done"),
        ],
    };
    config
}
